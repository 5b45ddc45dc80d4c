//! Box score normalization: ESPN's label-indexed stat rows → [`ScoredPlayer`].
//!
//! ESPN ships each team's box score as a list of column labels plus one
//! string row per athlete. Column order is not fixed, so every team's labels
//! are resolved into a [`StatIndex`] before any row is read. A team that is
//! missing one of the required columns is skipped outright.
use crate::espn::{EspnAthleteStats, EspnTeamPlayers, SummaryResponse};
use crate::{ScoredPlayer, StatLine};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

const UNKNOWN_TEAM: &str = "Unknown";
const UNKNOWN_PLAYER: &str = "Unknown";
const UNKNOWN_POSITION: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatCategory {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Turnovers,
    ThreePointers, // "made-attempted"
}

impl StatCategory {
    pub const REQUIRED: [StatCategory; 7] = [
        StatCategory::Points,
        StatCategory::Rebounds,
        StatCategory::Assists,
        StatCategory::Steals,
        StatCategory::Blocks,
        StatCategory::Turnovers,
        StatCategory::ThreePointers,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StatCategory::Points => "PTS",
            StatCategory::Rebounds => "REB",
            StatCategory::Assists => "AST",
            StatCategory::Steals => "STL",
            StatCategory::Blocks => "BLK",
            StatCategory::Turnovers => "TO",
            StatCategory::ThreePointers => "3PT",
        }
    }
}

/// Column positions of every required category within one team's labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatIndex {
    positions: [usize; 7],
    width: usize,
}

impl StatIndex {
    /// Resolve all required labels, or name the first one that is missing.
    /// Duplicate labels resolve to their first occurrence.
    pub fn resolve(labels: &[String]) -> Result<Self, StatCategory> {
        let mut positions = [0; 7];
        for (slot, category) in positions.iter_mut().zip(StatCategory::REQUIRED) {
            *slot = labels
                .iter()
                .position(|l| l == category.label())
                .ok_or(category)?;
        }
        Ok(Self { positions, width: labels.len() })
    }

    pub fn position(&self, category: StatCategory) -> usize {
        let slot = StatCategory::REQUIRED
            .iter()
            .position(|c| *c == category)
            .unwrap_or_default();
        self.positions[slot]
    }

    /// Number of labels the index was resolved against.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Read a stat line from one athlete's row. Rows shorter than the label
    /// set are rejected; malformed cells read as zero.
    pub fn read(&self, values: &[String]) -> Option<StatLine> {
        if values.is_empty() || values.len() < self.width {
            return None;
        }
        let cell = |category: StatCategory| {
            values
                .get(self.position(category))
                .map(String::as_str)
                .unwrap_or_default()
        };
        Some(StatLine {
            pts: parse_count(cell(StatCategory::Points)),
            reb: parse_count(cell(StatCategory::Rebounds)),
            ast: parse_count(cell(StatCategory::Assists)),
            stl: parse_count(cell(StatCategory::Steals)),
            blk: parse_count(cell(StatCategory::Blocks)),
            turnovers: parse_count(cell(StatCategory::Turnovers)),
            three_pm: parse_made(cell(StatCategory::ThreePointers)),
        })
    }
}

/// Plain counting stat ("12"). Anything that is not all ASCII digits is 0.
pub fn parse_count(token: &str) -> u32 {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    token.parse().unwrap_or_default()
}

/// Makes from a "made-attempted" cell ("3-7" → 3). A bare count is accepted.
pub fn parse_made(token: &str) -> u32 {
    match token.split_once('-') {
        Some((made, _attempted)) => parse_count(made),
        None => parse_count(token),
    }
}

/// One athlete's row as ESPN sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPlayerEntry {
    pub name: String,
    pub position: String,
    pub raw_values: Vec<String>,
}

impl From<EspnAthleteStats> for RawPlayerEntry {
    fn from(a: EspnAthleteStats) -> Self {
        let (name, position) = match a.athlete {
            Some(ath) => (
                ath.display_name,
                ath.position.and_then(|p| p.abbreviation),
            ),
            None => (None, None),
        };
        Self {
            name: name.unwrap_or_else(|| UNKNOWN_PLAYER.to_owned()),
            position: position.unwrap_or_else(|| UNKNOWN_POSITION.to_owned()),
            raw_values: a.stats.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Undecodable(String),
    NoStatistics,
    MissingLabel(StatCategory),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Undecodable(e) => write!(f, "unreadable team entry: {e}"),
            SkipReason::NoStatistics => write!(f, "no statistics block"),
            SkipReason::MissingLabel(c) => write!(f, "missing {} column", c.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TeamOutcome {
    Scored {
        team: String,
        players: Vec<ScoredPlayer>,
        /// Athlete rows dropped for being unreadable or too short.
        rejected: usize,
    },
    Skipped {
        team: String,
        reason: SkipReason,
    },
}

impl TeamOutcome {
    pub fn team(&self) -> &str {
        match self {
            TeamOutcome::Scored { team, .. } | TeamOutcome::Skipped { team, .. } => team,
        }
    }

    pub fn into_players(self) -> Vec<ScoredPlayer> {
        match self {
            TeamOutcome::Scored { players, .. } => players,
            TeamOutcome::Skipped { .. } => Vec::new(),
        }
    }
}

/// Normalize every team in a game summary. `None` when the response has no
/// box score players section at all (game not started, wrong event id).
pub fn normalize_box_score(summary: &SummaryResponse) -> Option<Vec<TeamOutcome>> {
    let teams = summary.boxscore.as_ref()?.players.as_ref()?;
    Some(teams.iter().map(normalize_team).collect())
}

pub fn normalize_team(raw: &Value) -> TeamOutcome {
    let team_data = match EspnTeamPlayers::deserialize(raw) {
        Ok(t) => t,
        Err(e) => {
            let team = raw
                .pointer("/team/displayName")
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN_TEAM)
                .to_owned();
            return TeamOutcome::Skipped { team, reason: SkipReason::Undecodable(e.to_string()) };
        }
    };

    let team = team_data
        .team
        .and_then(|t| t.display_name)
        .unwrap_or_else(|| UNKNOWN_TEAM.to_owned());

    let Some(block) = team_data.statistics.unwrap_or_default().into_iter().next() else {
        return TeamOutcome::Skipped { team, reason: SkipReason::NoStatistics };
    };

    let labels = block.labels.unwrap_or_default();
    let index = match StatIndex::resolve(&labels) {
        Ok(index) => index,
        Err(missing) => {
            return TeamOutcome::Skipped { team, reason: SkipReason::MissingLabel(missing) };
        }
    };

    let mut rejected = 0;
    let players = block
        .athletes
        .unwrap_or_default()
        .iter()
        .filter_map(|raw_athlete| {
            let scored = score_athlete(raw_athlete, &index, &team);
            if scored.is_none() {
                rejected += 1;
            }
            scored
        })
        .collect();

    TeamOutcome::Scored { team, players, rejected }
}

fn score_athlete(raw: &Value, index: &StatIndex, team: &str) -> Option<ScoredPlayer> {
    let entry: RawPlayerEntry = EspnAthleteStats::deserialize(raw).ok()?.into();
    let line = index.read(&entry.raw_values)?;
    Some(ScoredPlayer::new(entry.name, entry.position, team.to_owned(), line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LABELS: [&str; 14] = [
        "MIN", "FG", "3PT", "FT", "OREB", "DREB", "REB", "AST", "STL", "BLK", "TO", "PF", "+/-",
        "PTS",
    ];

    fn labels() -> Vec<String> {
        LABELS.iter().map(|s| s.to_string()).collect()
    }

    fn row(three: &str, reb: &str, ast: &str, stl: &str, blk: &str, to: &str, pts: &str) -> Vec<String> {
        ["34", "9-18", three, "4-4", "1", "7", reb, ast, stl, blk, to, "2", "+6", pts]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn athlete(name: &str, pos: &str, stats: Vec<String>) -> Value {
        json!({
            "athlete": { "displayName": name, "position": { "abbreviation": pos } },
            "stats": stats,
        })
    }

    fn team(name: &str, labels: Vec<String>, athletes: Vec<Value>) -> Value {
        json!({
            "team": { "displayName": name },
            "statistics": [{ "labels": labels, "athletes": athletes }],
        })
    }

    #[test]
    fn parse_count_accepts_digits_only() {
        assert_eq!(parse_count("12"), 12);
        assert_eq!(parse_count("0"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("--"), 0);
        assert_eq!(parse_count("-3"), 0);
        assert_eq!(parse_count(" 4"), 0);
        assert_eq!(parse_count("DNP"), 0);
        assert_eq!(parse_count("99999999999"), 0);
    }

    #[test]
    fn parse_made_reads_made_half() {
        assert_eq!(parse_made("3-7"), 3);
        assert_eq!(parse_made("0-1"), 0);
        assert_eq!(parse_made("12-20"), 12);
        assert_eq!(parse_made("5"), 5);
        assert_eq!(parse_made(""), 0);
        assert_eq!(parse_made("x-4"), 0);
        assert_eq!(parse_made("-"), 0);
        assert_eq!(parse_made("three"), 0);
    }

    #[test]
    fn stat_index_resolves_by_name_not_position() {
        let index = StatIndex::resolve(&labels()).unwrap();
        assert_eq!(index.position(StatCategory::ThreePointers), 2);
        assert_eq!(index.position(StatCategory::Rebounds), 6);
        assert_eq!(index.position(StatCategory::Points), 13);
        assert_eq!(index.width(), 14);
    }

    #[test]
    fn stat_index_names_missing_label() {
        let without_blk: Vec<String> = labels().into_iter().filter(|l| l != "BLK").collect();
        assert_eq!(StatIndex::resolve(&without_blk), Err(StatCategory::Blocks));
        assert_eq!(StatIndex::resolve(&[]), Err(StatCategory::Points));
    }

    #[test]
    fn stat_index_uses_first_duplicate() {
        let mut dup = labels();
        dup.push("PTS".into());
        let index = StatIndex::resolve(&dup).unwrap();
        assert_eq!(index.position(StatCategory::Points), 13);
    }

    #[test]
    fn stat_index_reads_row() {
        let index = StatIndex::resolve(&labels()).unwrap();
        let line = index.read(&row("3-7", "10", "5", "2", "1", "3", "20")).unwrap();
        assert_eq!(
            line,
            StatLine { pts: 20, reb: 10, ast: 5, stl: 2, blk: 1, three_pm: 3, turnovers: 3 }
        );
    }

    #[test]
    fn stat_index_rejects_short_and_empty_rows() {
        let index = StatIndex::resolve(&labels()).unwrap();
        let mut short = row("3-7", "10", "5", "2", "1", "3", "20");
        short.pop();
        assert!(index.read(&short).is_none());
        assert!(index.read(&[]).is_none());
    }

    #[test]
    fn malformed_cells_read_as_zero() {
        let index = StatIndex::resolve(&labels()).unwrap();
        let line = index.read(&row("--", "", "x", "2", "1", "0", "DNP")).unwrap();
        assert_eq!(line.pts, 0);
        assert_eq!(line.reb, 0);
        assert_eq!(line.ast, 0);
        assert_eq!(line.three_pm, 0);
        assert_eq!(line.stl, 2);
    }

    #[test]
    fn raw_entry_defaults_missing_identity() {
        let a: EspnAthleteStats = serde_json::from_value(json!({ "stats": ["1"] })).unwrap();
        let entry = RawPlayerEntry::from(a);
        assert_eq!(entry.name, "Unknown");
        assert_eq!(entry.position, "N/A");
        assert_eq!(entry.raw_values, vec!["1".to_string()]);
    }

    #[test]
    fn team_is_scored_with_every_valid_athlete() {
        let raw = team(
            "Boston Celtics",
            labels(),
            vec![
                athlete("Jayson Tatum", "SF", row("3-7", "10", "5", "2", "1", "3", "20")),
                athlete("Jrue Holiday", "PG", row("1-4", "4", "6", "1", "0", "1", "9")),
            ],
        );
        let TeamOutcome::Scored { team, players, rejected } = normalize_team(&raw) else {
            panic!("team should be scored");
        };
        assert_eq!(team, "Boston Celtics");
        assert_eq!(rejected, 0);
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].player, "Jayson Tatum");
        assert_eq!(players[0].position, "SF");
        assert_eq!(players[0].team, "Boston Celtics");
        assert_eq!(players[0].fanduel_score, 45.5);
        assert_eq!(players[1].three_pm, 1);
    }

    #[test]
    fn short_and_unreadable_athletes_are_dropped_individually() {
        let mut short = row("3-7", "10", "5", "2", "1", "3", "20");
        short.truncate(5);
        let raw = team(
            "Miami Heat",
            labels(),
            vec![
                athlete("Short Row", "C", short),
                json!({ "athlete": { "displayName": "No Stats" } }),
                json!({ "athlete": "not an object", "stats": 7 }),
                athlete("Bam Adebayo", "C", row("0-0", "12", "4", "1", "2", "2", "18")),
            ],
        );
        let TeamOutcome::Scored { players, rejected, .. } = normalize_team(&raw) else {
            panic!("team should be scored");
        };
        assert_eq!(rejected, 3);
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].player, "Bam Adebayo");
    }

    #[test]
    fn team_missing_required_label_is_skipped() {
        let without_blk: Vec<String> = labels().into_iter().filter(|l| l != "BLK").collect();
        let raw = team("Utah Jazz", without_blk, vec![athlete("A", "G", vec!["1".into(); 13])]);
        assert_eq!(
            normalize_team(&raw),
            TeamOutcome::Skipped {
                team: "Utah Jazz".into(),
                reason: SkipReason::MissingLabel(StatCategory::Blocks),
            }
        );
    }

    #[test]
    fn team_without_statistics_is_skipped() {
        let empty = json!({ "team": { "displayName": "Orlando Magic" }, "statistics": [] });
        let missing = json!({ "team": { "displayName": "Orlando Magic" } });
        for raw in [empty, missing] {
            assert_eq!(
                normalize_team(&raw),
                TeamOutcome::Skipped { team: "Orlando Magic".into(), reason: SkipReason::NoStatistics }
            );
        }
    }

    #[test]
    fn undecodable_team_keeps_its_name() {
        let raw = json!({ "team": { "displayName": "Denver Nuggets" }, "statistics": "oops" });
        let outcome = normalize_team(&raw);
        assert_eq!(outcome.team(), "Denver Nuggets");
        assert!(matches!(
            outcome,
            TeamOutcome::Skipped { reason: SkipReason::Undecodable(_), .. }
        ));
    }

    #[test]
    fn bad_team_does_not_discard_sibling() {
        let without_blk: Vec<String> = labels().into_iter().filter(|l| l != "BLK").collect();
        let summary: SummaryResponse = serde_json::from_value(json!({
            "boxscore": { "players": [
                team("Utah Jazz", without_blk, vec![]),
                team("Phoenix Suns", labels(), vec![
                    athlete("Devin Booker", "SG", row("4-9", "5", "7", "1", "0", "3", "31")),
                ]),
            ]}
        }))
        .unwrap();
        let outcomes = normalize_box_score(&summary).unwrap();
        assert_eq!(outcomes.len(), 2);
        let players: Vec<ScoredPlayer> =
            outcomes.into_iter().flat_map(TeamOutcome::into_players).collect();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].team, "Phoenix Suns");
    }

    #[test]
    fn summary_without_players_section_is_none() {
        let no_boxscore: SummaryResponse = serde_json::from_value(json!({})).unwrap();
        let no_players: SummaryResponse =
            serde_json::from_value(json!({ "boxscore": { "teams": [] } })).unwrap();
        assert!(normalize_box_score(&no_boxscore).is_none());
        assert!(normalize_box_score(&no_players).is_none());
    }
}
