//! Error types for the ladders crate.

use thiserror::Error;

use crate::constants::Cell;

/// Main error type for the ladders crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid transition {from} -> {to}: {reason}")]
    InvalidTransition { from: i64, to: i64, reason: String },

    #[error("cell {cell} is off the board (must be 1-100)")]
    InvalidCell { cell: i64 },

    #[error("die value {value} is out of range (must be 1-6)")]
    InvalidDieValue { value: u8 },

    #[error("a scripted die needs at least one face")]
    EmptyDie,

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("player {index} has an empty name")]
    EmptyPlayerName { index: usize },

    #[error("username required")]
    MissingUsername,

    #[error("no path from cell {from} to 100")]
    PathNotFound { from: Cell },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("history request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("history service answered {status}")]
    RemoteStatus { status: u16 },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True for faults caused by bad input rather than a failing backend.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::InvalidTransition { .. }
                | Error::InvalidCell { .. }
                | Error::InvalidDieValue { .. }
                | Error::EmptyDie
                | Error::NoPlayers
                | Error::EmptyPlayerName { .. }
                | Error::MissingUsername
        )
    }

    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            operation: operation.into(),
            source,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
