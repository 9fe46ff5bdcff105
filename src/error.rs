//! Error types shared by the decoder, the activity store, the dataset fetch
//! and the configuration loader.

use thiserror::Error;

use crate::data_types::common::ActivityId;

/// Why an encoded path could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPathReason {
    /// The input ended in the middle of a varint chunk
    Truncated,
    /// A byte outside of the `?`..=`~` alphabet
    InvalidCharacter(char),
    /// A latitude delta without its longitude delta
    UnpairedCoordinate,
    /// A single delta spread over more chunks than any coordinate needs
    Overlong,
    /// Decoded coordinates outside of the valid latitude/longitude range
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed path at byte {position}: {reason:?}")]
pub struct MalformedPathError {
    pub position: usize,
    pub reason: MalformedPathReason,
}

impl MalformedPathError {
    pub fn new(position: usize, reason: MalformedPathReason) -> Self {
        Self { position, reason }
    }
}

/// Reasons a dataset record is skipped by the activity store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("activity {id}: {source}")]
    MalformedPath {
        id: ActivityId,
        #[source]
        source: MalformedPathError,
    },
    #[error("activity {id} has no points")]
    EmptyGeometry { id: ActivityId },
    #[error("activity {id} has an unreadable date '{date}'")]
    InvalidDate { id: ActivityId, date: String },
}

impl LoadError {
    pub fn activity_id(&self) -> ActivityId {
        match self {
            LoadError::MalformedPath { id, .. }
            | LoadError::EmptyGeometry { id }
            | LoadError::InvalidDate { id, .. } => *id,
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] curl::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u32),
    #[error("response is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("response is not a stats document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("fetch task failed: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_keeps_activity_id() {
        let err = LoadError::MalformedPath {
            id: 42,
            source: MalformedPathError::new(7, MalformedPathReason::Truncated),
        };
        assert_eq!(err.activity_id(), 42);
        assert!(err.to_string().contains("activity 42"));
        assert!(err.to_string().contains("byte 7"));
    }

    #[test]
    fn fetch_error_from_status() {
        let err = FetchError::Status(404);
        assert_eq!(err.to_string(), "unexpected HTTP status 404");
    }
}
