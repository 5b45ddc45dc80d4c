/// ESPN API raw wire types: serde shapes for deserializing ESPN responses.
/// These map to our clean domain types in client.rs and boxscore.rs.
///
/// Box score teams and athletes stay as raw `Value`s at this layer so that a
/// single malformed entry can be decoded (and rejected) on its own.
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Scoreboard  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScoreboardResponse {
    pub events: Option<Vec<EspnEvent>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnEvent {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<EspnStatus>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatus {
    #[serde(rename = "type")]
    pub status_type: Option<EspnStatusType>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatusType {
    pub state: Option<String>, // "pre", "in", "post"
    pub name: Option<String>,  // "STATUS_SCHEDULED", "STATUS_FINAL", ...
}

// ---------------------------------------------------------------------------
// Game summary  (site v2 API)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SummaryResponse {
    pub boxscore: Option<EspnBoxscore>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EspnBoxscore {
    /// One entry per team, decoded lazily into [`EspnTeamPlayers`].
    pub players: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnTeamPlayers {
    pub team: Option<EspnTeam>,
    pub statistics: Option<Vec<EspnStatCategory>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnTeam {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnStatCategory {
    pub labels: Option<Vec<String>>,
    /// Decoded lazily into [`EspnAthleteStats`].
    pub athletes: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnAthleteStats {
    pub athlete: Option<EspnAthlete>,
    pub stats: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnAthlete {
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub position: Option<EspnPosition>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EspnPosition {
    pub abbreviation: Option<String>,
}
