//! newsgraph core
//!
//! Incremental author/story graph over a refreshed news feed.
//!
//! # Overview
//!
//! - **identity**: stable keys for authors, story domains and links
//! - **GraphStore**: nodes and links with key indices, owned across cycles
//! - **Reconciler**: mark-and-sweep merge of a fetched feed into the store
//!
//! # Example
//!
//! ```rust
//! use newsgraph_core::{GraphStore, Reconciler, StoryRecord};
//! use serde_json::json;
//!
//! let feed: Vec<StoryRecord> = vec![
//!     json!({ "author": { "username": "alice" }, "link": "http://www.cnn.com/x" }).into(),
//!     json!({ "author": { "username": "bob" }, "link": "https://cnn.com/y" }).into(),
//! ];
//!
//! let mut store = GraphStore::new();
//! let report = Reconciler::new().reconcile(&mut store, &feed);
//!
//! assert_eq!(report.node_count, 3);
//! assert!(store.link("alice-cnn.com").is_some());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod identity;
pub mod model;
pub mod reconcile;
pub mod record;
pub mod store;

// Re-exports
pub use error::RecordError;
pub use identity::ResolvedRecord;
pub use model::{GraphSnapshot, Link, LinkSnapshot, Node, NodeKey, NodeKind, NodeSnapshot};
pub use reconcile::{ReconcileReport, Reconciler, SkippedRecord};
pub use record::StoryRecord;
pub use store::{GraphStore, GraphView, PruneStats};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for graph operations
    pub use crate::{
        GraphSnapshot, GraphStore, GraphView, NodeKey, NodeKind, ReconcileReport, Reconciler,
        RecordError, StoryRecord,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
