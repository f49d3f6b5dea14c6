//! Error types for the blop build.

use thiserror::Error;

/// Errors that can escape the core.
///
/// The transform stages (date parsing, grouping, dedup, calendar files)
/// never produce these: they degrade per event instead.
#[derive(Error, Debug)]
pub enum BlopError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for BlopError {
    fn from(e: serde_json::Error) -> Self {
        BlopError::Serialization(e.to_string())
    }
}

/// Result type alias for blop operations.
pub type BlopResult<T> = Result<T, BlopError>;
