//! Error types for the risk engine

use thiserror::Error;

/// Main error type for wellbeing-risk
#[derive(Error, Debug)]
pub enum Error {
    /// An enum value coming from outside the crate (mood, sender, category)
    /// that does not name a known variant.
    #[error("invalid {field}: {value:?}")]
    InvalidInput { field: &'static str, value: String },

    /// A chat transcript with nothing for the user side to score.
    #[error("no user message in transcript {0}")]
    NoUserMessage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(field: &'static str, value: &str) -> Self {
        Error::InvalidInput {
            field,
            value: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type for wellbeing-risk operations
pub type Result<T> = std::result::Result<T, Error>;
