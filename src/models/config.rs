//! Configuration model.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "ko-KR";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB configuration.
    pub tmdb: TmdbSettings,
    /// Query cache configuration.
    pub cache: CacheSettings,
    /// Directory holding memos and favorite ids.
    pub data_dir: PathBuf,
}

/// TMDB configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbSettings {
    /// API base URL.
    pub base_url: String,
    /// Bearer access token.
    pub access_token: Option<String>,
    /// Account id owning the favorites list.
    pub account_id: Option<String>,
    /// Session id authorizing account writes.
    pub session_id: Option<String>,
    /// Language for responses.
    pub language: String,
    /// Whether search returns adult titles.
    pub include_adult: bool,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Query cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// How long a movie detail stays fresh.
    pub detail_stale_secs: u64,
    /// How long list results (popular, search, favorites) stay fresh.
    pub list_stale_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb: TmdbSettings::default(),
            cache: CacheSettings::default(),
            data_dir: dirs_data_path(),
        }
    }
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
            account_id: None,
            session_id: None,
            language: DEFAULT_LANGUAGE.to_string(),
            include_adult: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            detail_stale_secs: 60 * 60,
            list_stale_secs: 0,
        }
    }
}

impl TmdbSettings {
    /// Overlay `TMDB_*` environment variables on top of file values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("TMDB_API_BASE_URL") {
            self.base_url = url;
        }
        if let Some(token) = lookup("TMDB_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        if let Some(account) = lookup("TMDB_ACCOUNT_ID") {
            self.account_id = Some(account);
        }
        if let Some(session) = lookup("TMDB_SESSION_ID") {
            self.session_id = Some(session);
        }
    }
}

/// Get the configuration directory path.
pub fn dirs_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("movie_memo")
}

fn dirs_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("movie_memo")
}

/// Load configuration from file, then apply environment overrides.
pub fn load_config() -> Config {
    let config_path = dirs_config_path().join("config.toml");

    let mut config = match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid {}: {}", config_path.display(), e);
                Config::default()
            }
        },
        Err(_) => Config::default(),
    };

    config.tmdb.apply_env();
    config
}
