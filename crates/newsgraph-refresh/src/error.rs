//! Error types for the refresh loop

use std::path::PathBuf;

/// Feed could not be retrieved or decoded
///
/// The whole cycle becomes a no-op; the store is left untouched and the next
/// tick retries.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("feed request to {url} returned HTTP {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Local feed file unreadable
    #[error("cannot read feed file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Body is not JSON
    #[error("feed is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// Body is JSON but not an array of records
    #[error("feed document is not an array of records")]
    NotAFeed,
}

impl FetchError {
    /// Check if the failure came from the network layer
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read config {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Value out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Errors building a [`NewsGraph`](crate::NewsGraph)
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    /// Bad configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client could not be built
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
