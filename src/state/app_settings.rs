use log::LevelFilter;
use nba_dfs_api::client::{DEFAULT_REQUEST_PAUSE, NbaApi};
use nba_dfs_api::slate::{DEFAULT_CACHE_TTL, SlateFetcher};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Overrides the ESPN base URL, e.g. for a local mirror.
    pub api_base: Option<String>,
    pub cache_ttl: Duration,
    pub request_pause: Duration,
    pub export_dir: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            api_base: None,
            cache_ttl: DEFAULT_CACHE_TTL,
            request_pause: DEFAULT_REQUEST_PAUSE,
            export_dir: PathBuf::from("."),
        }
    }
}

impl AppSettings {
    /// Read `DFS_SCORES_*` environment variables. Unparseable values keep
    /// their defaults.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| get(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            full_screen: false,
            log_level: get("DFS_SCORES_LOG").and_then(|v| LevelFilter::from_str(&v).ok()),
            api_base: get("DFS_SCORES_API_BASE"),
            cache_ttl: get("DFS_SCORES_CACHE_TTL_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            request_pause: get("DFS_SCORES_REQUEST_PAUSE_MS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_pause),
            export_dir: get("DFS_SCORES_EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
        }
    }

    pub fn api(&self) -> NbaApi {
        let api = NbaApi::new().with_request_pause(self.request_pause);
        match &self.api_base {
            Some(base) => api.with_base_url(base.as_str()),
            None => api,
        }
    }

    pub fn slate_fetcher(&self) -> SlateFetcher {
        SlateFetcher::new(self.api(), self.cache_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let s = settings(&[]);
        assert_eq!(s.cache_ttl, Duration::from_secs(60));
        assert_eq!(s.request_pause, Duration::from_millis(100));
        assert_eq!(s.export_dir, PathBuf::from("."));
        assert!(s.api_base.is_none());
        assert!(s.log_level.is_none());
        assert_eq!(s.api().base_url(), nba_dfs_api::client::ESPN_NBA_SITE_V2);
    }

    #[test]
    fn environment_overrides_apply() {
        let s = settings(&[
            ("DFS_SCORES_LOG", "debug"),
            ("DFS_SCORES_API_BASE", "http://localhost:9000/nba/"),
            ("DFS_SCORES_CACHE_TTL_SECS", "5"),
            ("DFS_SCORES_REQUEST_PAUSE_MS", "0"),
            ("DFS_SCORES_EXPORT_DIR", "/tmp/dfs"),
        ]);
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
        assert_eq!(s.cache_ttl, Duration::from_secs(5));
        assert_eq!(s.request_pause, Duration::ZERO);
        assert_eq!(s.export_dir, PathBuf::from("/tmp/dfs"));
        assert_eq!(s.api().base_url(), "http://localhost:9000/nba");
    }

    #[test]
    fn invalid_values_fall_back() {
        let s = settings(&[
            ("DFS_SCORES_LOG", "loud"),
            ("DFS_SCORES_CACHE_TTL_SECS", "-1"),
            ("DFS_SCORES_REQUEST_PAUSE_MS", "fast"),
            ("DFS_SCORES_API_BASE", "   "),
        ]);
        assert!(s.log_level.is_none());
        assert_eq!(s.cache_ttl, Duration::from_secs(60));
        assert_eq!(s.request_pause, Duration::from_millis(100));
        assert!(s.api_base.is_none());
    }
}
