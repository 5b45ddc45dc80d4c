pub mod boxscore;
pub mod cache;
pub mod client;
pub mod espn;
pub mod scoring;
pub mod slate;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::client::ApiError;

// ---------------------------------------------------------------------------
// Domain types, independent of the ESPN wire format
// ---------------------------------------------------------------------------

/// A calendar day on the NBA schedule. ESPN addresses days as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameDate(NaiveDate);

impl GameDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// The day before, or the same day at the calendar's lower bound.
    pub fn prev(self) -> Self {
        self.0.pred_opt().map(Self).unwrap_or(self)
    }

    pub fn next(self) -> Self {
        self.0.succ_opt().map(Self).unwrap_or(self)
    }

    /// Human label for headers, e.g. "Wed Jan 15 2025".
    pub fn label(&self) -> String {
        self.0.format("%a %b %d %Y").to_string()
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl FromStr for GameDate {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ApiError::InvalidDate(format!("expected YYYYMMDD, got {s:?}")));
        }
        NaiveDate::parse_from_str(s, "%Y%m%d")
            .map(Self)
            .map_err(|e| ApiError::InvalidDate(format!("{s}: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    pub name: String, // "Boston Celtics at New York Knicks"
    pub status: GameStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Pre,
    In,
    Post,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Pre => "SCH",
            GameStatus::In => "LIVE",
            GameStatus::Post => "FNL",
        }
    }
}

/// The counting stats that feed both fantasy formulas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatLine {
    pub pts: u32,
    pub reb: u32,
    pub ast: u32,
    pub stl: u32,
    pub blk: u32,
    pub three_pm: u32,
    pub turnovers: u32,
}

impl StatLine {
    pub fn fanduel(&self) -> f64 {
        scoring::fanduel(self)
    }

    pub fn draftkings(&self) -> f64 {
        scoring::draftkings(self)
    }
}

/// One athlete's line for one game with both fantasy scores attached.
/// Serialized field names double as the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredPlayer {
    pub player: String,
    pub position: String,
    pub team: String,
    pub pts: u32,
    pub reb: u32,
    pub ast: u32,
    pub stl: u32,
    pub blk: u32,
    #[serde(rename = "threePM")]
    pub three_pm: u32,
    pub turnovers: u32,
    pub fanduel_score: f64,
    pub draftkings_score: f64,
}

impl ScoredPlayer {
    pub fn new(player: String, position: String, team: String, line: StatLine) -> Self {
        Self {
            player,
            position,
            team,
            pts: line.pts,
            reb: line.reb,
            ast: line.ast,
            stl: line.stl,
            blk: line.blk,
            three_pm: line.three_pm,
            turnovers: line.turnovers,
            fanduel_score: line.fanduel(),
            draftkings_score: line.draftkings(),
        }
    }

    pub fn stat_line(&self) -> StatLine {
        StatLine {
            pts: self.pts,
            reb: self.reb,
            ast: self.ast,
            stl: self.stl,
            blk: self.blk,
            three_pm: self.three_pm,
            turnovers: self.turnovers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_date_round_trips_espn_format() {
        let date: GameDate = "20250115".parse().unwrap();
        assert_eq!(date.to_string(), "20250115");
        assert_eq!(date.naive(), NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn game_date_rejects_malformed_input() {
        assert!("2025-01-15".parse::<GameDate>().is_err());
        assert!("2025011".parse::<GameDate>().is_err());
        assert!("20250230".parse::<GameDate>().is_err());
        assert!("".parse::<GameDate>().is_err());
    }

    #[test]
    fn game_date_steps_across_month_and_year() {
        let date: GameDate = "20241231".parse().unwrap();
        assert_eq!(date.next().to_string(), "20250101");
        assert_eq!(date.next().prev(), date);
        let march: GameDate = "20240301".parse().unwrap();
        assert_eq!(march.prev().to_string(), "20240229");
    }

    #[test]
    fn scored_player_carries_line_and_scores() {
        let line = StatLine { pts: 20, reb: 10, ast: 5, stl: 2, blk: 1, three_pm: 2, turnovers: 3 };
        let p = ScoredPlayer::new("Jayson Tatum".into(), "SF".into(), "Boston Celtics".into(), line);
        assert_eq!(p.stat_line(), line);
        assert_eq!(p.fanduel_score, 45.5);
        assert_eq!(p.draftkings_score, line.draftkings());
    }
}
