//! newsgraph refresh loop
//!
//! Keeps a [`newsgraph_core::GraphStore`] in step with a live feed:
//!
//! - [`FeedFetcher`]: pulls the feed (HTTP or file)
//! - [`RefreshScheduler`]: immediate cycle on start, then fixed-rate ticks,
//!   never overlapping, stale results discarded after stop
//! - [`RenderAdapter`]: receives each reconciled graph
//! - [`NewsGraph`]: lifecycle surface tying them together
//!
//! # Example
//!
//! ```rust,ignore
//! use newsgraph_refresh::{NewsGraph, NewsGraphConfig};
//!
//! let graph = NewsGraph::with_defaults(NewsGraphConfig::default())?;
//! graph.start();
//! // ...
//! graph.stop();
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod clock;
pub mod config;
pub mod error;
pub mod fetch;
mod graph;
pub mod render;
pub mod scheduler;

// Re-exports
pub use clock::{Clock, TokioClock};
pub use config::{NewsGraphConfig, DEFAULT_FEED_URL};
pub use error::{ConfigError, FetchError, RefreshError};
pub use fetch::{fetcher_for, parse_feed, FeedFetcher, FileFetcher, HttpFetcher};
pub use graph::NewsGraph;
pub use render::{JsonRenderer, LogRenderer, RenderAdapter, RenderTarget};
pub use scheduler::{CycleOutcome, RefreshScheduler, SchedulerState, SchedulerStats};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
