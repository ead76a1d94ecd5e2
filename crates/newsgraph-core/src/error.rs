//! Error types for the graph core

/// A single feed record could not be resolved to an author and a story
///
/// Recovered locally: the reconciler skips the record and carries on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// Required field absent, empty, or not a string
    #[error("record is missing `{0}`")]
    MissingField(&'static str),

    /// Story link is not a valid absolute URL
    #[error("invalid story url {url:?}: {source}")]
    InvalidUrl {
        /// The offending link
        url: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// Story link parses but carries no host name
    #[error("story url {url:?} has no host")]
    MissingHost {
        /// The offending link
        url: String,
    },
}
