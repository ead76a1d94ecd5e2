//! Graph state store
//!
//! Single source of truth between refresh cycles. Nodes and links live in
//! insertion-ordered maps that double as key indices, so lookups are O(1)
//! and iteration order is stable across passes.
//!
//! Links are indexed by their endpoint pair. The `author-story` key is for
//! display only: usernames and host names may both contain `-`, so two
//! different pairs can share one.

use crate::model::{GraphSnapshot, Link, Node, NodeKey, NodeKind};
use indexmap::map::Entry;
use indexmap::IndexMap;

/// Items removed by [`GraphStore::prune_outdated`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneStats {
    /// Nodes removed
    pub nodes: usize,
    /// Links removed
    pub links: usize,
}

/// Nodes and links owned by one graph
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: IndexMap<NodeKey, Node>,
    links: IndexMap<(NodeKey, NodeKey), Link>,
}

impl GraphStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every node and link
    pub fn clear(&mut self) {
        self.links.clear();
        self.nodes.clear();
    }

    /// Existing author with `outdated` cleared, or a new one with weight 0
    ///
    /// A supplied picture replaces the stored one.
    pub fn upsert_author(&mut self, key: &str, image_url: Option<&str>) -> &mut Node {
        let node = self.upsert_node(NodeKey::author(key));
        if let Some(url) = image_url {
            node.set_image_url(url);
        }
        node
    }

    /// Existing story with `outdated` cleared, or a new one with weight 0
    pub fn upsert_story(&mut self, key: &str) -> &mut Node {
        self.upsert_node(NodeKey::story(key))
    }

    fn upsert_node(&mut self, id: NodeKey) -> &mut Node {
        match self.nodes.entry(id) {
            Entry::Occupied(entry) => {
                let node = entry.into_mut();
                node.outdated = false;
                node
            }
            Entry::Vacant(entry) => {
                let node = Node::new(entry.key().clone());
                entry.insert(node)
            }
        }
    }

    /// Existing link between `source` and `target` with `outdated` cleared,
    /// or a new one with weight 0
    ///
    /// Both endpoints must already be in the store.
    pub fn upsert_link(&mut self, key: &str, source: &NodeKey, target: &NodeKey) -> &mut Link {
        debug_assert!(self.nodes.contains_key(source), "link source {source} not in store");
        debug_assert!(self.nodes.contains_key(target), "link target {target} not in store");
        debug_assert_eq!(source.kind, NodeKind::Author);
        debug_assert_eq!(target.kind, NodeKind::Story);

        match self.links.entry((source.clone(), target.clone())) {
            Entry::Occupied(entry) => {
                let link = entry.into_mut();
                link.outdated = false;
                link
            }
            Entry::Vacant(entry) => {
                let (source, target) = entry.key().clone();
                entry.insert(Link::new(key.to_owned(), source, target))
            }
        }
    }

    /// Flag every node and link as outdated and zero its weight
    ///
    /// Called once at the start of a reconciliation pass.
    pub fn mark_all_outdated(&mut self) {
        for node in self.nodes.values_mut() {
            node.mark_outdated();
        }
        for link in self.links.values_mut() {
            link.mark_outdated();
        }
    }

    /// Remove everything still flagged outdated
    ///
    /// Links go first. A node revisited in the pass is never outdated, and a
    /// link is only revisited together with both its endpoints, so no
    /// surviving link can point at a removed node.
    pub fn prune_outdated(&mut self) -> PruneStats {
        let links_before = self.links.len();
        self.links.retain(|_, link| !link.outdated);

        let nodes_before = self.nodes.len();
        self.nodes.retain(|_, node| !node.outdated);

        debug_assert!(
            self.dangling_links().next().is_none(),
            "prune left dangling links"
        );

        PruneStats {
            nodes: nodes_before - self.nodes.len(),
            links: links_before - self.links.len(),
        }
    }

    /// Links whose source or target is not in the store
    pub fn dangling_links(&self) -> impl Iterator<Item = &Link> + '_ {
        self.links.values().filter(|link| {
            !self.nodes.contains_key(link.source()) || !self.nodes.contains_key(link.target())
        })
    }

    /// Lookup node by identity
    #[inline]
    #[must_use]
    pub fn node(&self, id: &NodeKey) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Lookup author node
    #[must_use]
    pub fn author(&self, key: &str) -> Option<&Node> {
        self.nodes.get(&NodeKey::author(key))
    }

    /// Lookup story node
    #[must_use]
    pub fn story(&self, key: &str) -> Option<&Node> {
        self.nodes.get(&NodeKey::story(key))
    }

    /// Lookup link by endpoints
    #[must_use]
    pub fn link_between(&self, source: &NodeKey, target: &NodeKey) -> Option<&Link> {
        self.links.get(&(source.clone(), target.clone()))
    }

    /// First link with display key `key`
    ///
    /// Keys are not unique when names contain `-`; prefer
    /// [`GraphStore::link_between`].
    #[must_use]
    pub fn link(&self, key: &str) -> Option<&Link> {
        self.links.values().find(|link| link.key() == key)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links
    #[inline]
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// True when the store holds nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }

    /// Borrowed read-only view for renderers
    #[inline]
    #[must_use]
    pub fn view(&self) -> GraphView<'_> {
        GraphView { store: self }
    }

    /// Owned copy of the current graph
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        self.view().to_snapshot()
    }
}

/// Read-only view of a [`GraphStore`]
///
/// Borrowed for the duration of one render call. Pruning in a later pass may
/// remove entries, so anything kept longer must be copied out with
/// [`GraphView::to_snapshot`].
#[derive(Debug, Clone, Copy)]
pub struct GraphView<'a> {
    store: &'a GraphStore,
}

impl<'a> GraphView<'a> {
    /// Nodes in store order
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = &'a Node> + 'a {
        let store: &'a GraphStore = self.store;
        store.nodes.values()
    }

    /// Links in store order
    pub fn links(&self) -> impl ExactSizeIterator<Item = &'a Link> + 'a {
        let store: &'a GraphStore = self.store;
        store.links.values()
    }

    /// Resolve a link endpoint
    #[inline]
    #[must_use]
    pub fn resolve(&self, id: &NodeKey) -> Option<&'a Node> {
        let store: &'a GraphStore = self.store;
        store.nodes.get(id)
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Number of links
    #[inline]
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.store.link_count()
    }

    /// Owned copy of the viewed graph
    #[must_use]
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes().map(Node::snapshot).collect(),
            links: self.links().map(Link::snapshot).collect(),
        }
    }
}
