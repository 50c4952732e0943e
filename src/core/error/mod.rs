use thiserror::Error;

/// Outcome of a blocking pop that could not deliver an item.
///
/// Emptiness on the non-blocking paths is reported as `None`, never
/// through this type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("queue is closed and drained")]
    Closed,
    #[error("timed out waiting for an item")]
    Timeout,
}

/// Failure while persisting or reading back an operation journal.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("journal io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("journal entry (de)serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure while loading the demo configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("unknown log level {0:?}")]
    Level(String),
}
