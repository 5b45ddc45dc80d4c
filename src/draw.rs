use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Clear, Gauge, Paragraph, Row, Table, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::app_state::SortKey;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use nba_dfs_api::{GameDate, ScoredPlayer};
use nba_dfs_api::slate::SlateProgress;

static TABS: &[&str; 2] = &["Players", "Top Performers"];

const NO_DATA: &str = "No data found. Games may not have started yet or the date is incorrect.";
const TOP_N: usize = 10;

const HELP_LINES: &[(&str, &str)] = &[
    ("h / ←", "previous day"),
    ("l / →", "next day"),
    ("t", "jump to today"),
    ("Enter / f", "fetch scores for the selected day"),
    ("s", "cycle sort column"),
    ("j / k", "scroll players"),
    ("e", "export CSV"),
    ("1 / 2", "Players / Top Performers"),
    ("L", "toggle logs"),
    ("F", "toggle full screen"),
    ("Esc", "close help"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_date_bar(f, layout.date_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Players => draw_players(f, layout.main, app),
            MenuItem::TopPerformers => draw_top_performers(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(progress) = app.state.progress {
            draw_progress(f, layout.main, progress);
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Players => 0,
        MenuItem::TopPerformers => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Selected date, slate metrics and the latest status message.
fn draw_date_bar(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let dim = Style::default().fg(Color::Gray);
    let mut spans = vec![
        Span::styled("◀ ", dim),
        Span::styled(
            app.state.date.label(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▶", dim),
        Span::styled(format!("  ({})", app.state.date), dim),
    ];

    let players = &app.state.players;
    if let Some(slate) = players.slate.as_ref()
        && slate.date == app.state.date
        && !slate.is_empty()
    {
        spans.push(Span::raw(format!("  |  Players: {}", slate.players.len())));
        if let Some(top) = slate.top_fanduel() {
            spans.push(Span::raw(format!("  Top FD: {top:.2}")));
        }
        if let Some(top) = slate.top_draftkings() {
            spans.push(Span::raw(format!("  Top DK: {top:.2}")));
        }
    }
    spans.push(Span::styled(format!("  |  Sort: {}", players.sort.label()), dim));

    if let Some(status) = app.state.status.as_deref() {
        spans.push(Span::styled(format!("  {status}"), Style::default().fg(Color::Cyan)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn draw_players(f: &mut Frame, area: Rect, app: &App) {
    let players = &app.state.players;
    let block = default_border(Color::White).title(players_title(app));

    if players.players().is_empty() {
        draw_empty(f, area, block, app);
        return;
    }

    let visible = area.height.saturating_sub(3) as usize;
    let rows: Vec<Row> = players
        .players()
        .iter()
        .enumerate()
        .skip(players.scroll_offset)
        .take(visible)
        .map(|(rank, p)| player_row(rank + 1, p))
        .collect();

    let header = Row::new(
        ["#", "Player", "Pos", "Team", "PTS", "REB", "AST", "STL", "BLK", "3PM", "TO", "FD", "DK"]
            .into_iter()
            .map(|h| Cell::from(header_label(h, players.sort))),
    )
    .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(2),
        Constraint::Length(4),
        Constraint::Fill(2),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(7),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths).header(header).block(block).column_spacing(1);
    f.render_widget(table, area);
}

/// Date of the loaded slate when the date bar has moved away from it.
fn stale_slate_date(app: &App) -> Option<GameDate> {
    let slate = app.state.players.slate.as_ref()?;
    (slate.date != app.state.date).then_some(slate.date)
}

fn players_title(app: &App) -> String {
    match stale_slate_date(app) {
        Some(loaded) => format!(" Players for {loaded} (press Enter to fetch {}) ", app.state.date),
        None => format!(" Players (sorted by {}) ", app.state.players.sort.label()),
    }
}

fn header_label(column: &str, sort: SortKey) -> String {
    let active = matches!(
        (column, sort),
        ("FD", SortKey::FanDuel)
            | ("DK", SortKey::DraftKings)
            | ("PTS", SortKey::Points)
            | ("REB", SortKey::Rebounds)
            | ("AST", SortKey::Assists)
            | ("Player", SortKey::Player)
    );
    match (active, sort) {
        (false, _) => column.to_string(),
        (true, SortKey::Player) => format!("{column}▲"),
        (true, _) => format!("{column}▼"),
    }
}

fn player_row(rank: usize, p: &ScoredPlayer) -> Row<'_> {
    Row::new(vec![
        Cell::from(rank.to_string()),
        Cell::from(p.player.as_str()),
        Cell::from(p.position.as_str()),
        Cell::from(p.team.as_str()),
        Cell::from(p.pts.to_string()),
        Cell::from(p.reb.to_string()),
        Cell::from(p.ast.to_string()),
        Cell::from(p.stl.to_string()),
        Cell::from(p.blk.to_string()),
        Cell::from(p.three_pm.to_string()),
        Cell::from(p.turnovers.to_string()),
        score_cell(p.fanduel_score),
        score_cell(p.draftkings_score),
    ])
}

fn draw_top_performers(f: &mut Frame, area: Rect, app: &App) {
    let players = &app.state.players;
    if players.players().is_empty() {
        draw_empty(f, area, default_border(Color::White).title(" Top Performers "), app);
        return;
    }

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    let fanduel: Vec<Row> = players
        .top(SortKey::FanDuel, TOP_N)
        .into_iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.player.as_str()),
                Cell::from(p.position.as_str()),
                score_cell(p.fanduel_score),
                Cell::from(p.pts.to_string()),
                Cell::from(p.reb.to_string()),
                Cell::from(p.ast.to_string()),
            ])
        })
        .collect();
    let suffix = stale_slate_date(app).map(|d| format!("for {d} ")).unwrap_or_default();
    draw_top_table(
        f,
        left,
        &format!(" Top 10 FanDuel {suffix}"),
        &["Player", "Pos", "FanDuel", "PTS", "REB", "AST"],
        fanduel,
    );

    let draftkings: Vec<Row> = players
        .top(SortKey::DraftKings, TOP_N)
        .into_iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.player.as_str()),
                Cell::from(p.position.as_str()),
                score_cell(p.draftkings_score),
                Cell::from(p.pts.to_string()),
                Cell::from(p.three_pm.to_string()),
                Cell::from(p.reb.to_string()),
                Cell::from(p.ast.to_string()),
            ])
        })
        .collect();
    draw_top_table(
        f,
        right,
        &format!(" Top 10 DraftKings {suffix}"),
        &["Player", "Pos", "DraftKings", "PTS", "3PM", "REB", "AST"],
        draftkings,
    );
}

fn score_cell<'a>(score: f64) -> Cell<'a> {
    Cell::from(format!("{score:.2}")).style(Style::default().fg(Color::Green))
}

/// Player name fills, the score column is wide enough for its header, the
/// rest are counts.
fn draw_top_table(f: &mut Frame, area: Rect, title: &str, columns: &[&str], rows: Vec<Row>) {
    let widths: Vec<Constraint> = columns
        .iter()
        .enumerate()
        .map(|(i, name)| match i {
            0 => Constraint::Fill(1),
            2 => Constraint::Length(name.len() as u16),
            _ => Constraint::Length(4),
        })
        .collect();

    let header = Row::new(columns.iter().map(|c| Cell::from(*c)))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(default_border(Color::White).title(title.to_string()))
        .column_spacing(1);
    f.render_widget(table, area);
}

fn draw_empty(f: &mut Frame, area: Rect, block: Block, app: &App) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = Vec::new();
    if app.state.players.slate.is_none() {
        lines.push(Line::from(format!(
            "Press Enter to fetch scores for {}.",
            app.state.date.label()
        )));
    } else {
        lines.push(Line::from(NO_DATA));
        if let Some(err) = app.state.last_error.as_deref() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(Color::Red))));
        }
    }

    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>12}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

/// Overlay gauge centered in `area` while a slate loads.
fn draw_progress(f: &mut Frame, area: Rect, progress: SlateProgress) {
    let width = area.width.saturating_sub(4).min(60);
    let gauge_area = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + area.height.saturating_sub(3) / 2,
        width,
        3.min(area.height),
    );

    let label = if progress.total == 0 {
        "Loading scoreboard...".to_string()
    } else {
        format!("Box scores {}/{}", progress.done, progress.total)
    };
    let ratio = if progress.total == 0 { 0.0 } else { progress.ratio() };

    f.render_widget(Clear, gauge_area);
    f.render_widget(
        Gauge::default()
            .block(default_border(Color::Yellow))
            .gauge_style(Style::default().fg(Color::Yellow))
            .ratio(ratio.clamp(0.0, 1.0))
            .label(label),
        gauge_area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray))
        .output_target(false)
        .output_file(false)
        .output_line(false);
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
