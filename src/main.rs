mod app;
mod draw;
mod export;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::SortKey;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use anyhow::Context;
use crossterm::event::{self as crossterm_event, Event, KeyEventKind};
use crossterm::{cursor, execute, terminal};
use log::{LevelFilter, error};
use nba_dfs_api::GameDate;
use nba_dfs_api::slate::{ScoreboardOutcome, Slate};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, PartialEq)]
enum CliAction {
    Help,
    Version,
    /// `csv` set means headless: fetch once, write, exit.
    Run { date: Option<GameDate>, csv: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let action = match parse_args(std::env::args().skip(1)) {
        Ok(action) => action,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    let (date, csv) = match action {
        CliAction::Help => {
            println!("{}", usage_text());
            return Ok(());
        }
        CliAction::Version => {
            println!("dfs-scores {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        CliAction::Run { date, csv } => (date.unwrap_or_else(GameDate::today), csv),
    };

    let settings = AppSettings::load();

    if let Some(target) = csv {
        return run_export(&settings, date, &target).await;
    }

    run_tui(settings, date).await
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliAction, String> {
    let mut date = None;
    let mut csv = None;
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(CliAction::Help),
            "-V" | "--version" => return Ok(CliAction::Version),
            "-d" | "--date" => {
                let value = args.next().ok_or("--date needs a value (YYYYMMDD)")?;
                date = Some(value.parse::<GameDate>().map_err(|e| e.to_string())?);
            }
            "--csv" => {
                csv = Some(args.next().ok_or("--csv needs a path, or - for stdout")?);
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }

    Ok(CliAction::Run { date, csv })
}

fn usage_text() -> &'static str {
    "dfs-scores - NBA FanDuel and DraftKings scores from ESPN box scores

Usage:
  dfs-scores [--date YYYYMMDD]
  dfs-scores [--date YYYYMMDD] --csv PATH|-
  dfs-scores --help
  dfs-scores --version

Without --csv an interactive terminal UI starts on the given date (default today).
With --csv the slate is fetched once and written as CSV to PATH, or stdout for -.

Environment:
  DFS_SCORES_API_BASE          ESPN NBA base URL override
  DFS_SCORES_CACHE_TTL_SECS    Slate cache lifetime in seconds (default 60)
  DFS_SCORES_REQUEST_PAUSE_MS  Pause between box score requests (default 100)
  DFS_SCORES_EXPORT_DIR        Directory for CSV exports from the UI (default .)
  DFS_SCORES_LOG               Log level: error, warn, info, debug, trace"
}

/// Headless mode: one slate, sorted by FanDuel score, written as CSV.
async fn run_export(settings: &AppSettings, date: GameDate, target: &str) -> anyhow::Result<()> {
    init_stderr_logger(settings.log_level.unwrap_or(LevelFilter::Warn));

    let mut slate = settings.api().fetch_slate(date).await;
    SortKey::FanDuel.sort(&mut slate.players);

    if target == "-" {
        export::write_csv(io::stdout().lock(), &slate.players)?;
    } else {
        let file = std::fs::File::create(target).with_context(|| format!("could not create {target}"))?;
        export::write_csv(file, &slate.players)?;
    }

    eprintln!("{}", export_summary(&slate));
    Ok(())
}

/// Pipeline warnings (skipped games and teams) go to stderr beside the CSV.
fn init_stderr_logger(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .try_init();
}

fn export_summary(slate: &Slate) -> String {
    let date = slate.date;
    match &slate.scoreboard {
        ScoreboardOutcome::Failed(err) => format!("{date}: scoreboard unavailable: {err}"),
        ScoreboardOutcome::NoGames => format!("{date}: no games scheduled"),
        ScoreboardOutcome::Games(total) if slate.is_empty() => format!(
            "{date}: no players found ({} of {total} games skipped)",
            slate.games_skipped
        ),
        ScoreboardOutcome::Games(total) => format!(
            "{date}: {} players, top FanDuel {:.2}, top DraftKings {:.2}, {} of {total} games skipped",
            slate.players.len(),
            slate.top_fanduel().unwrap_or_default(),
            slate.top_draftkings().unwrap_or_default(),
            slate.games_skipped,
        ),
    }
}

async fn run_tui(settings: AppSettings, date: GameDate) -> anyhow::Result<()> {
    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(LevelFilter::Trace)?;
    tui_logger::set_default_level(LevelFilter::Info);

    let fetcher = settings.slate_fetcher();
    let app = Arc::new(Mutex::new(App::new(settings, date)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(fetcher, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Load the starting date right away
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                handle_ui_event(ui_event, &app, &network_requests).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard, loading);
            }

            Some(response) = network_responses.recv() => {
                handle_network_response(response, &app, &mut loading).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard, loading);
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    match ui_event {
        UiEvent::AppStarted => {
            let mut guard = app.lock().await;
            let date = guard.state.date;
            guard.on_fetch_started();
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadSlate { date }).await;
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
        }
        UiEvent::Resize => {}
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::SlateProgress { progress } => {
            app.lock().await.on_progress(progress);
        }
        NetworkResponse::SlateLoaded { slate } => {
            if let Some(err) = slate.fetch_error() {
                error!("Network error: {err}");
            }
            app.lock().await.on_slate_loaded(slate);
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    Some(UiEvent::KeyPressed(key_event))
                }
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: runs on quit and from the panic hook.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
