//! Error types for movie memo.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for movie memo.
///
/// Cloneable so one coalesced request outcome can be handed to every waiter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Input errors
    #[error("Invalid input: {0}")]
    Validation(String),

    // Configuration errors
    #[error("{0} not configured. Set it in config.toml or the environment")]
    ConfigMissing(String),

    // Remote catalog errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Not found on TMDB: {0}")]
    NotFound(String),

    #[error("TMDB rejected the credentials: {0}")]
    Auth(String),

    // Local store errors (never escape the store)
    #[error("Storage error: {0}")]
    Storage(String),

    // Favorite transitions
    #[error("A favorite change for movie {0} is already in progress")]
    TransitionInProgress(u64),

    #[error("Movie {movie_id} cannot change favorite state while {state}")]
    InvalidTransition { movie_id: u64, state: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(String),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a validation error from a string.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Error::Validation(msg.into())
    }

    /// Whether this error came from bad user input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Error::Http {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None if e.is_decode() => Error::Json(e.to_string()),
            None => Error::Network(e.to_string()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::other(format!("Invalid config.toml: {}", e))
    }
}
