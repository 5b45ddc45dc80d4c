use crate::espn::{EspnEvent, ScoreboardResponse, SummaryResponse};
use crate::{Game, GameDate, GameStatus};
use log::{debug, warn};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const ESPN_NBA_SITE_V2: &str = "https://site.api.espn.com/apis/site/v2/sports/basketball/nba";

/// Pause after each box score request to stay polite with ESPN.
pub const DEFAULT_REQUEST_PAUSE: Duration = Duration::from_millis(100);

/// NBA API client backed by ESPN's public site endpoints.
#[derive(Debug, Clone)]
pub struct NbaApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    pub(crate) request_pause: Duration,
}

impl Default for NbaApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("dfs-scores/0.1 (terminal fantasy scoreboard)")
                .build()
                .unwrap_or_default(),
            base_url: ESPN_NBA_SITE_V2.to_owned(),
            timeout: Duration::from_secs(10),
            request_pause: DEFAULT_REQUEST_PAUSE,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    InvalidDate(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::InvalidDate(msg) => write!(f, "Invalid date: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NbaApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host serving ESPN-shaped responses.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_request_pause(mut self, pause: Duration) -> Self {
        self.request_pause = pause;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the games scheduled on `date`, in ESPN's order.
    pub async fn fetch_scoreboard(&self, date: GameDate) -> ApiResult<Vec<Game>> {
        let url = format!("{}/scoreboard?dates={date}&limit=100", self.base_url);
        let raw: ScoreboardResponse = self.get(&url).await?;
        let games = raw
            .events
            .unwrap_or_default()
            .iter()
            .filter_map(|event| {
                let game = map_event_to_game(event);
                if game.is_none() {
                    warn!("scoreboard {date}: skipping event without id");
                }
                game
            })
            .collect();
        Ok(games)
    }

    /// Fetch the game summary that carries the box score.
    pub async fn fetch_summary(&self, game_id: &str) -> ApiResult<SummaryResponse> {
        let url = format!("{}/summary?event={game_id}", self.base_url);
        self.get(&url).await
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: ESPN wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_event_to_game(event: &EspnEvent) -> Option<Game> {
    let id = event.id.clone().filter(|id| !id.is_empty())?;

    let status = event
        .status
        .as_ref()
        .and_then(|s| s.status_type.as_ref())
        .and_then(|t| t.state.as_deref())
        .map(parse_status)
        .unwrap_or_default();

    Some(Game {
        name: event.name.clone().unwrap_or_else(|| format!("Game {id}")),
        id,
        status,
    })
}

fn parse_status(state: &str) -> GameStatus {
    match state {
        "in" => GameStatus::In,
        "post" => GameStatus::Post,
        _ => GameStatus::Pre,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::espn::{EspnStatus, EspnStatusType};

    fn event(id: Option<&str>, state: Option<&str>) -> EspnEvent {
        EspnEvent {
            id: id.map(str::to_owned),
            name: Some("Boston Celtics at New York Knicks".into()),
            status: Some(EspnStatus {
                status_type: Some(EspnStatusType {
                    state: state.map(str::to_owned),
                    name: None,
                }),
            }),
        }
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("pre"), GameStatus::Pre);
        assert_eq!(parse_status("in"), GameStatus::In);
        assert_eq!(parse_status("post"), GameStatus::Post);
        assert_eq!(parse_status("delayed"), GameStatus::Pre);
    }

    #[test]
    fn event_maps_to_game() {
        let game = map_event_to_game(&event(Some("401705123"), Some("post"))).unwrap();
        assert_eq!(game.id, "401705123");
        assert_eq!(game.name, "Boston Celtics at New York Knicks");
        assert_eq!(game.status, GameStatus::Post);
    }

    #[test]
    fn event_without_state_is_pre() {
        let game = map_event_to_game(&event(Some("1"), None)).unwrap();
        assert_eq!(game.status, GameStatus::Pre);
        let bare = EspnEvent { id: Some("2".into()), ..Default::default() };
        let game = map_event_to_game(&bare).unwrap();
        assert_eq!(game.status, GameStatus::Pre);
        assert_eq!(game.name, "Game 2");
    }

    #[test]
    fn event_without_id_is_dropped() {
        assert!(map_event_to_game(&event(None, Some("in"))).is_none());
        assert!(map_event_to_game(&event(Some(""), Some("in"))).is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = NbaApi::new().with_base_url("http://127.0.0.1:1234/");
        assert_eq!(api.base_url(), "http://127.0.0.1:1234");
    }
}
