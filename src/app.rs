use crate::export;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use log::{error, info};
use nba_dfs_api::GameDate;
use nba_dfs_api::slate::{Slate, SlateProgress};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Players,
    TopPerformers,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings, date: GameDate) -> Self {
        let app = Self {
            state: AppState::new(date),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Marks the start of a fetch for the selected date.
    pub fn on_fetch_started(&mut self) {
        self.state.progress = Some(SlateProgress { done: 0, total: 0 });
        self.state.status = Some(format!("Fetching {}...", self.state.date));
    }

    pub fn on_progress(&mut self, progress: SlateProgress) {
        self.state.progress = Some(progress);
    }

    pub fn on_slate_loaded(&mut self, slate: Slate) {
        self.state.progress = None;
        self.state.status = None;
        self.state.last_error = slate.fetch_error().map(str::to_owned);
        info!("{}: {} players loaded", slate.date, slate.players.len());
        self.state.players.load(slate);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Date selection
    // -----------------------------------------------------------------------

    pub fn prev_date(&mut self) {
        self.state.date = self.state.date.prev();
    }

    pub fn next_date(&mut self) {
        self.state.date = self.state.date.next();
    }

    pub fn reset_date(&mut self) {
        self.state.date = GameDate::today();
    }

    // -----------------------------------------------------------------------
    // Player table
    // -----------------------------------------------------------------------

    pub fn cycle_sort(&mut self) {
        self.state.players.cycle_sort();
    }

    pub fn scroll_down(&mut self) {
        self.state.players.scroll_down();
    }

    pub fn scroll_up(&mut self) {
        self.state.players.scroll_up();
    }

    /// Write the loaded slate, in table order, to the export directory.
    pub fn export_csv(&mut self) {
        let Some(slate) = self.state.players.slate.as_ref() else {
            self.state.status = Some("Nothing to export yet. Press Enter to fetch.".into());
            return;
        };
        if slate.is_empty() {
            self.state.status = Some("No players to export.".into());
            return;
        }

        match export::write_csv_file(&self.settings.export_dir, slate.date, &slate.players) {
            Ok(path) => {
                info!("exported {} players to {}", slate.players.len(), path.display());
                self.state.status = Some(format!("Exported to {}", path.display()));
            }
            Err(e) => {
                error!("CSV export failed: {e:#}");
                self.state.status = Some(format!("Export failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nba_dfs_api::slate::ScoreboardOutcome;
    use nba_dfs_api::{ScoredPlayer, StatLine};

    fn app() -> App {
        let settings = AppSettings {
            export_dir: std::env::temp_dir(),
            ..Default::default()
        };
        App::new(settings, "20250115".parse().unwrap())
    }

    fn slate(scoreboard: ScoreboardOutcome, players: Vec<ScoredPlayer>) -> Slate {
        Slate { date: "20250115".parse().unwrap(), scoreboard, players, games_skipped: 0 }
    }

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = app();
        app.update_tab(MenuItem::TopPerformers);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::TopPerformers);
    }

    #[test]
    fn date_navigation_moves_one_day() {
        let mut app = app();
        app.prev_date();
        assert_eq!(app.state.date.to_string(), "20250114");
        app.next_date();
        app.next_date();
        assert_eq!(app.state.date.to_string(), "20250116");
    }

    #[test]
    fn slate_load_clears_progress_and_records_failure() {
        let mut app = app();
        app.on_fetch_started();
        app.on_progress(SlateProgress { done: 1, total: 2 });
        assert!(app.state.progress.is_some());

        app.on_slate_loaded(slate(ScoreboardOutcome::Failed("503".into()), vec![]));
        assert!(app.state.progress.is_none());
        assert_eq!(app.state.last_error.as_deref(), Some("503"));

        app.on_slate_loaded(slate(ScoreboardOutcome::NoGames, vec![]));
        assert!(app.state.last_error.is_none());
    }

    #[test]
    fn export_without_slate_sets_status() {
        let mut app = app();
        app.export_csv();
        assert!(app.state.status.as_deref().unwrap().starts_with("Nothing to export"));
    }

    #[test]
    fn export_writes_file_to_export_dir() {
        let mut app = app();
        let dir = std::env::temp_dir().join(format!("dfs-scores-app-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        app.settings.export_dir = dir.clone();
        let line = StatLine { pts: 20, ..Default::default() };
        let player = ScoredPlayer::new("A".into(), "G".into(), "T".into(), line);
        app.on_slate_loaded(slate(ScoreboardOutcome::Games(1), vec![player]));

        app.export_csv();

        let path = dir.join("dfs_scores_20250115.csv");
        assert!(path.exists(), "status: {:?}", app.state.status);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
