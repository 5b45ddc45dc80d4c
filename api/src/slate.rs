//! A slate is every scored player for one date: scoreboard first, then one
//! box score per game, strictly in order.
use crate::boxscore::{TeamOutcome, normalize_box_score};
use crate::cache::TtlCache;
use crate::client::NbaApi;
use crate::{Game, GameDate, ScoredPlayer};
use log::{debug, error, info, warn};
use std::time::Duration;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// What the scoreboard said about the date. `NoGames` and `Failed` both
/// leave the slate empty; consumers that only care about players can ignore
/// the difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreboardOutcome {
    Games(usize),
    NoGames,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slate {
    pub date: GameDate,
    pub scoreboard: ScoreboardOutcome,
    pub players: Vec<ScoredPlayer>,
    /// Games whose box score could not be fetched or had no players section.
    pub games_skipped: usize,
}

impl Slate {
    fn without_players(date: GameDate, scoreboard: ScoreboardOutcome) -> Self {
        Self { date, scoreboard, players: Vec::new(), games_skipped: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn fetch_error(&self) -> Option<&str> {
        match &self.scoreboard {
            ScoreboardOutcome::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn top_fanduel(&self) -> Option<f64> {
        self.players.iter().map(|p| p.fanduel_score).reduce(f64::max)
    }

    pub fn top_draftkings(&self) -> Option<f64> {
        self.players.iter().map(|p| p.draftkings_score).reduce(f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlateProgress {
    pub done: usize,
    pub total: usize,
}

impl SlateProgress {
    pub fn ratio(&self) -> f64 {
        if self.total == 0 { 1.0 } else { self.done as f64 / self.total as f64 }
    }
}

impl NbaApi {
    pub async fn fetch_slate(&self, date: GameDate) -> Slate {
        self.fetch_slate_with_progress(date, |_| {}).await
    }

    /// Build the slate for `date`. Never fails: a scoreboard error yields an
    /// empty slate marked `Failed`, and any game that cannot be scored is
    /// skipped. `on_progress` is called once per game.
    pub async fn fetch_slate_with_progress<F>(&self, date: GameDate, mut on_progress: F) -> Slate
    where
        F: FnMut(SlateProgress),
    {
        let games = match self.fetch_scoreboard(date).await {
            Ok(games) => games,
            Err(e) => {
                error!("Error fetching scoreboard for {date}: {e}");
                return Slate::without_players(date, ScoreboardOutcome::Failed(e.to_string()));
            }
        };

        if games.is_empty() {
            info!("no games scheduled on {date}");
            return Slate::without_players(date, ScoreboardOutcome::NoGames);
        }

        let total = games.len();
        let mut players = Vec::new();
        let mut games_skipped = 0;

        for (i, game) in games.iter().enumerate() {
            match self.score_game(game).await {
                Some(mut scored) => players.append(&mut scored),
                None => games_skipped += 1,
            }
            on_progress(SlateProgress { done: i + 1, total });
            if !self.request_pause.is_zero() {
                tokio::time::sleep(self.request_pause).await;
            }
        }

        info!(
            "{date}: {} players from {total} games ({games_skipped} skipped)",
            players.len()
        );
        Slate { date, scoreboard: ScoreboardOutcome::Games(total), players, games_skipped }
    }

    async fn score_game(&self, game: &Game) -> Option<Vec<ScoredPlayer>> {
        let summary = match self.fetch_summary(&game.id).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Error scraping game {}: {e}", game.id);
                return None;
            }
        };

        let Some(teams) = normalize_box_score(&summary) else {
            debug!("{} [{}]: no box score players yet", game.name, game.status.label());
            return None;
        };

        let mut players = Vec::new();
        for outcome in teams {
            match outcome {
                TeamOutcome::Scored { team, players: mut scored, rejected } => {
                    if rejected > 0 {
                        debug!("{}: {team}: dropped {rejected} athlete rows", game.id);
                    }
                    players.append(&mut scored);
                }
                TeamOutcome::Skipped { team, reason } => {
                    warn!("{}: skipping {team}: {reason}", game.id);
                }
            }
        }
        Some(players)
    }
}

/// Slate loader with a per-date result cache in front of the network.
#[derive(Debug)]
pub struct SlateFetcher {
    api: NbaApi,
    cache: TtlCache<GameDate, Slate>,
}

impl SlateFetcher {
    pub fn new(api: NbaApi, ttl: Duration) -> Self {
        Self { api, cache: TtlCache::new(ttl) }
    }

    pub fn api(&self) -> &NbaApi {
        &self.api
    }

    /// Serve `date` from cache when fresh, else fetch it. Slates whose
    /// scoreboard request failed are returned but not cached.
    pub async fn load<F>(&mut self, date: GameDate, on_progress: F) -> Slate
    where
        F: FnMut(SlateProgress),
    {
        if let Some(slate) = self.cache.get(&date) {
            debug!("{date}: served from cache");
            return slate.clone();
        }

        let slate = self.api.fetch_slate_with_progress(date, on_progress).await;
        if slate.fetch_error().is_none() {
            self.cache.insert(date, slate.clone());
        }
        slate
    }
}

impl Default for SlateFetcher {
    fn default() -> Self {
        Self::new(NbaApi::default(), DEFAULT_CACHE_TTL)
    }
}
