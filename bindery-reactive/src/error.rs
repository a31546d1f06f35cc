//! Error types for reactive operations

/// Error types for reads, writes and notification passes
#[derive(Debug, thiserror::Error)]
pub enum ReactiveError {
    #[error("Key not found: {0}")]
    MissingKey(String),

    #[error("Cannot read `{segment}` of {found} in path `{path}`")]
    NotARecord {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("Expected a record, found {0}")]
    ExpectedRecord(&'static str),

    #[error("Invalid key path: {0:?}")]
    InvalidPath(String),

    #[error("Active reader slot is already occupied")]
    ReaderBusy,

    #[error("Notification depth exceeded on `{key}` (limit {limit})")]
    NotifyDepthExceeded { key: String, limit: usize },

    #[error("Update callback failed: {0}")]
    Callback(String),
}

pub type ReactiveResult<T> = Result<T, ReactiveError>;
