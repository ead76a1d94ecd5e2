//! Mark-and-sweep reconciliation
//!
//! One pass per fetch cycle:
//! 1. mark every node and link outdated (weights reset)
//! 2. upsert each record's author, story and link, rebuilding weights
//! 3. prune whatever is still outdated
//!
//! Identity survives across passes for anything present in both fetches.

use crate::error::RecordError;
use crate::identity::{self, ResolvedRecord};
use crate::record::StoryRecord;
use crate::store::GraphStore;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A record skipped during a pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the fetched feed
    pub index: usize,
    /// Why it was skipped
    pub error: RecordError,
}

/// Summary of one reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Records in the fetched feed
    pub records: usize,
    /// Records merged into the graph
    pub applied: usize,
    /// Malformed records
    pub skipped: Vec<SkippedRecord>,
    /// Nodes created this pass
    pub nodes_added: usize,
    /// Nodes removed this pass
    pub nodes_pruned: usize,
    /// Links created this pass
    pub links_added: usize,
    /// Links removed this pass
    pub links_pruned: usize,
    /// Nodes after the pass
    pub node_count: usize,
    /// Links after the pass
    pub link_count: usize,
}

impl ReconcileReport {
    /// True when no record was skipped
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// True when the pass added or removed anything
    #[inline]
    #[must_use]
    pub fn changed_shape(&self) -> bool {
        self.nodes_added + self.nodes_pruned + self.links_added + self.links_pruned > 0
    }
}

/// Merges fetched records into a [`GraphStore`]
///
/// Weights after a pass:
/// - author: distinct story URLs attributed to the author; two URLs on the
///   same domain count twice
/// - story: records pointing at the domain
/// - link: records for the (author, domain) pair
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler;

impl Reconciler {
    /// Create reconciler
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Run one full pass over `records`
    ///
    /// An empty `records` slice prunes the whole graph; that is a valid
    /// result, not an error.
    pub fn reconcile(&self, store: &mut GraphStore, records: &[StoryRecord]) -> ReconcileReport {
        let nodes_before = store.node_count();
        let links_before = store.link_count();
        debug!(records = records.len(), nodes = nodes_before, links = links_before, "reconciling feed");

        store.mark_all_outdated();

        let mut report = ReconcileReport {
            records: records.len(),
            ..ReconcileReport::default()
        };
        // (author, story) pairs already counted toward author weight this pass
        let mut seen_stories: HashSet<(String, String)> = HashSet::new();

        for (index, record) in records.iter().enumerate() {
            match identity::resolve(record) {
                Ok(resolved) => {
                    apply(store, resolved, &mut seen_stories);
                    report.applied += 1;
                }
                Err(error) => {
                    warn!(index, %error, "skipping malformed feed record");
                    report.skipped.push(SkippedRecord { index, error });
                }
            }
        }

        let pruned = store.prune_outdated();

        report.node_count = store.node_count();
        report.link_count = store.link_count();
        report.nodes_pruned = pruned.nodes;
        report.links_pruned = pruned.links;
        // before + added - pruned = after
        report.nodes_added = report.node_count + pruned.nodes - nodes_before;
        report.links_added = report.link_count + pruned.links - links_before;

        debug!(
            applied = report.applied,
            skipped = report.skipped.len(),
            nodes = report.node_count,
            links = report.link_count,
            nodes_added = report.nodes_added,
            nodes_pruned = report.nodes_pruned,
            links_added = report.links_added,
            links_pruned = report.links_pruned,
            "reconciliation complete"
        );

        report
    }
}

fn apply(store: &mut GraphStore, resolved: ResolvedRecord, seen_stories: &mut HashSet<(String, String)>) {
    let ResolvedRecord {
        author_key,
        image_url,
        story_key,
        story_url,
        link_key,
    } = resolved;

    let author = store.upsert_author(&author_key, image_url.as_deref());
    let source = author.id().clone();
    if seen_stories.insert((author_key, story_url)) {
        author.increment_weight();
    }

    let story = store.upsert_story(&story_key);
    story.increment_weight();
    let target = story.id().clone();

    store.upsert_link(&link_key, &source, &target).increment_weight();
}
