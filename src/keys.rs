use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Players),
        (_, Char('2'), _) => guard.update_tab(MenuItem::TopPerformers),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Date selection
        (_, Char('h') | KeyCode::Left, _) => guard.prev_date(),
        (_, Char('l') | KeyCode::Right, _) => guard.next_date(),
        (_, Char('t'), _) => guard.reset_date(),
        (_, KeyCode::Enter | Char('f'), _) => {
            let date = guard.state.date;
            guard.on_fetch_started();
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadSlate { date }).await;
        }

        // Player table
        (MenuItem::Players, Char('j') | KeyCode::Down, _) => guard.scroll_down(),
        (MenuItem::Players, Char('k') | KeyCode::Up, _) => guard.scroll_up(),
        (MenuItem::Players | MenuItem::TopPerformers, Char('s'), _) => guard.cycle_sort(),
        (_, Char('e'), _) => guard.export_csv(),

        // Global
        (_, Char('F'), _) => guard.toggle_full_screen(),
        (_, Char('L'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
