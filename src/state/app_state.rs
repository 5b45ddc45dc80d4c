use crate::app::MenuItem;
use nba_dfs_api::slate::{Slate, SlateProgress};
use nba_dfs_api::{GameDate, ScoredPlayer};
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    FanDuel,
    DraftKings,
    Points,
    Rebounds,
    Assists,
    Player,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::FanDuel => "FanDuel",
            SortKey::DraftKings => "DraftKings",
            SortKey::Points => "PTS",
            SortKey::Rebounds => "REB",
            SortKey::Assists => "AST",
            SortKey::Player => "Player",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortKey::FanDuel => SortKey::DraftKings,
            SortKey::DraftKings => SortKey::Points,
            SortKey::Points => SortKey::Rebounds,
            SortKey::Rebounds => SortKey::Assists,
            SortKey::Assists => SortKey::Player,
            SortKey::Player => SortKey::FanDuel,
        }
    }

    /// Numeric keys sort high to low, names A to Z. Ties keep slate order.
    pub fn compare(&self, a: &ScoredPlayer, b: &ScoredPlayer) -> Ordering {
        match self {
            SortKey::FanDuel => b.fanduel_score.total_cmp(&a.fanduel_score),
            SortKey::DraftKings => b.draftkings_score.total_cmp(&a.draftkings_score),
            SortKey::Points => b.pts.cmp(&a.pts),
            SortKey::Rebounds => b.reb.cmp(&a.reb),
            SortKey::Assists => b.ast.cmp(&a.ast),
            SortKey::Player => a.player.cmp(&b.player),
        }
    }

    pub fn sort(&self, players: &mut [ScoredPlayer]) {
        players.sort_by(|a, b| self.compare(a, b));
    }
}

// ---------------------------------------------------------------------------
// Player table state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PlayersState {
    /// Players are kept sorted by `sort`.
    pub slate: Option<Slate>,
    pub sort: SortKey,
    pub scroll_offset: usize,
}

impl PlayersState {
    pub fn load(&mut self, mut slate: Slate) {
        self.sort.sort(&mut slate.players);
        self.slate = Some(slate);
        self.scroll_offset = 0;
    }

    pub fn players(&self) -> &[ScoredPlayer] {
        self.slate.as_ref().map(|s| s.players.as_slice()).unwrap_or_default()
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        if let Some(slate) = &mut self.slate {
            self.sort.sort(&mut slate.players);
        }
        self.scroll_offset = 0;
    }

    /// Best `n` players by `key`, regardless of the table's active sort.
    pub fn top(&self, key: SortKey, n: usize) -> Vec<&ScoredPlayer> {
        let mut ranked: Vec<&ScoredPlayer> = self.players().iter().collect();
        ranked.sort_by(|a, b| key.compare(a, b));
        ranked.truncate(n);
        ranked
    }

    pub fn scroll_down(&mut self) {
        let max = self.players().len().saturating_sub(1);
        if self.scroll_offset < max {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Top-level state
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    /// Date shown in the date bar; only fetched on request.
    pub date: GameDate,
    pub players: PlayersState,
    /// Set while a slate is loading.
    pub progress: Option<SlateProgress>,
    pub last_error: Option<String>,
    /// One-line feedback such as "exported to ...".
    pub status: Option<String>,
    pub show_logs: bool,
}

impl AppState {
    pub fn new(date: GameDate) -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            date,
            players: PlayersState::default(),
            progress: None,
            last_error: None,
            status: None,
            show_logs: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nba_dfs_api::StatLine;
    use nba_dfs_api::slate::ScoreboardOutcome;

    fn player(name: &str, pts: u32, reb: u32, ast: u32, three_pm: u32) -> ScoredPlayer {
        let line = StatLine { pts, reb, ast, three_pm, ..Default::default() };
        ScoredPlayer::new(name.into(), "G".into(), "Team".into(), line)
    }

    fn slate(players: Vec<ScoredPlayer>) -> Slate {
        Slate {
            date: "20250115".parse().unwrap(),
            scoreboard: ScoreboardOutcome::Games(1),
            players,
            games_skipped: 0,
        }
    }

    fn names(players: &[ScoredPlayer]) -> Vec<&str> {
        players.iter().map(|p| p.player.as_str()).collect()
    }

    #[test]
    fn load_sorts_by_fanduel_descending() {
        let mut state = PlayersState::default();
        state.load(slate(vec![
            player("Bench", 4, 1, 0, 0),
            player("Star", 30, 8, 6, 4),
            player("Big", 12, 14, 2, 0),
        ]));
        assert_eq!(names(state.players()), ["Star", "Big", "Bench"]);
    }

    #[test]
    fn sort_cycle_visits_every_key() {
        let mut key = SortKey::FanDuel;
        let mut seen = vec![key];
        for _ in 0..5 {
            key = key.next();
            seen.push(key);
        }
        assert_eq!(key.next(), SortKey::FanDuel);
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn cycle_sort_resorts_and_resets_scroll() {
        let mut state = PlayersState::default();
        state.load(slate(vec![
            player("Shooter", 20, 2, 1, 6),
            player("Big", 12, 14, 2, 0),
        ]));
        state.scroll_down();
        state.cycle_sort(); // DraftKings
        assert_eq!(state.sort, SortKey::DraftKings);
        assert_eq!(state.scroll_offset, 0);
        // Shooter 20 + 3 + 2.5 + 1.5 = 27, Big 12 + 17.5 + 3 + 1.5 = 34
        assert_eq!(names(state.players()), ["Big", "Shooter"]);
        state.cycle_sort(); // PTS
        assert_eq!(names(state.players()), ["Shooter", "Big"]);
    }

    #[test]
    fn player_sort_is_alphabetical() {
        let mut players = vec![player("Zion", 1, 0, 0, 0), player("Anthony", 0, 0, 0, 0)];
        SortKey::Player.sort(&mut players);
        assert_eq!(names(&players), ["Anthony", "Zion"]);
    }

    #[test]
    fn top_ignores_active_sort_and_truncates() {
        let mut state = PlayersState::default();
        state.load(slate((0..15).map(|i| player(&format!("P{i}"), i, 0, 0, 0)).collect()));
        state.cycle_sort();
        let top = state.top(SortKey::Points, 10);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].player, "P14");
        assert_eq!(top[9].player, "P5");
    }

    #[test]
    fn scroll_is_clamped() {
        let mut state = PlayersState::default();
        state.scroll_down();
        assert_eq!(state.scroll_offset, 0);
        state.load(slate(vec![player("A", 1, 0, 0, 0), player("B", 2, 0, 0, 0)]));
        state.scroll_down();
        state.scroll_down();
        assert_eq!(state.scroll_offset, 1);
        state.scroll_up();
        state.scroll_up();
        assert_eq!(state.scroll_offset, 0);
    }
}
