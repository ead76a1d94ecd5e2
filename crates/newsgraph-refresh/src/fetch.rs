//! Feed fetch collaborators
//!
//! A fetcher turns a feed location into raw [`StoryRecord`]s. Timeouts are
//! the fetcher's business; the scheduler never imposes its own.

use crate::error::FetchError;
use async_trait::async_trait;
use newsgraph_core::StoryRecord;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Asynchronous feed source
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetch and decode the feed at `url`
    ///
    /// # Errors
    /// Any [`FetchError`]; the caller treats the cycle as a no-op.
    async fn fetch(&self, url: &str) -> Result<Vec<StoryRecord>, FetchError>;
}

/// Decode a feed document
///
/// # Errors
/// [`FetchError::Decode`] for invalid JSON, [`FetchError::NotAFeed`] when the
/// top level is not an array.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<StoryRecord>, FetchError> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(items) => Ok(items.into_iter().map(StoryRecord::new).collect()),
        _ => Err(FetchError::NotAFeed),
    }
}

/// HTTP(S) feed fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher with a request timeout and user agent
    ///
    /// # Errors
    /// [`FetchError::Transport`] if the client cannot be built.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<StoryRecord>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(url, bytes = body.len(), "fetched feed");
        parse_feed(&body)
    }
}

/// Local file feed fetcher
///
/// Accepts plain paths and `file://` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

#[async_trait]
impl FeedFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<StoryRecord>, FetchError> {
        let path = PathBuf::from(url.strip_prefix("file://").unwrap_or(url));
        let body = tokio::fs::read(&path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.clone(),
                source,
            })?;
        debug!(path = %path.display(), bytes = body.len(), "read feed file");
        parse_feed(&body)
    }
}

/// Pick a fetcher for a feed location
///
/// `http://` and `https://` go over the network, anything else is read from
/// disk.
///
/// # Errors
/// [`FetchError::Transport`] if the HTTP client cannot be built.
pub fn fetcher_for(
    url: &str,
    timeout: Duration,
    user_agent: &str,
) -> Result<Arc<dyn FeedFetcher>, FetchError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(Arc::new(HttpFetcher::new(timeout, user_agent)?))
    } else {
        Ok(Arc::new(FileFetcher))
    }
}
