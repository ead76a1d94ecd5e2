//! Graph data model
//!
//! Nodes are either authors or story domains; links join one author to one
//! story. Both are owned by [`GraphStore`](crate::GraphStore); links refer to
//! their endpoints by [`NodeKey`] only.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Feed author, keyed by username
    Author,
    /// Story domain, keyed by normalized host name
    Story,
}

impl NodeKind {
    /// Lowercase name used in logs and serialized output
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a node: key partitioned by kind
///
/// An author called `cnn.com` and the story domain `cnn.com` are different
/// nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    /// Node kind
    pub kind: NodeKind,
    /// Key within the kind
    pub key: String,
}

impl NodeKey {
    /// Author identity
    #[inline]
    pub fn author(key: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Author,
            key: key.into(),
        }
    }

    /// Story identity
    #[inline]
    pub fn story(key: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Story,
            key: key.into(),
        }
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.key)
    }
}

/// Author or story node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeKey,
    weight: u32,
    image_url: Option<String>,
    pub(crate) outdated: bool,
}

impl Node {
    pub(crate) fn new(id: NodeKey) -> Self {
        Self {
            id,
            weight: 0,
            image_url: None,
            outdated: false,
        }
    }

    /// Full identity (kind and key)
    #[inline]
    #[must_use]
    pub fn id(&self) -> &NodeKey {
        &self.id
    }

    /// Key within the node's kind
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.id.key
    }

    /// Node kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.id.kind
    }

    /// Weight from the latest reconciliation pass
    ///
    /// Authors count distinct stories, story domains count records.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    /// Author picture, if the feed supplied one
    #[inline]
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub(crate) fn set_image_url(&mut self, url: &str) {
        if self.image_url.as_deref() != Some(url) {
            self.image_url = Some(url.to_owned());
        }
    }

    pub(crate) fn increment_weight(&mut self) {
        self.weight = self.weight.saturating_add(1);
    }

    pub(crate) fn mark_outdated(&mut self) {
        self.outdated = true;
        self.weight = 0;
    }

    /// Owned copy for serialization
    #[must_use]
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            key: self.id.key.clone(),
            kind: self.id.kind,
            weight: self.weight,
            image_url: self.image_url.clone(),
        }
    }
}

/// Authored-by link between an author node and a story node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    key: String,
    source: NodeKey,
    target: NodeKey,
    weight: u32,
    pub(crate) outdated: bool,
}

impl Link {
    pub(crate) fn new(key: String, source: NodeKey, target: NodeKey) -> Self {
        Self {
            key,
            source,
            target,
            weight: 0,
            outdated: false,
        }
    }

    /// Display key, `author-story`
    ///
    /// Not unique: identity is the endpoint pair.
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Author endpoint
    #[inline]
    #[must_use]
    pub fn source(&self) -> &NodeKey {
        &self.source
    }

    /// Story endpoint
    #[inline]
    #[must_use]
    pub fn target(&self) -> &NodeKey {
        &self.target
    }

    /// Co-occurrences of the endpoint pair in the latest pass
    #[inline]
    #[must_use]
    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub(crate) fn increment_weight(&mut self) {
        self.weight = self.weight.saturating_add(1);
    }

    pub(crate) fn mark_outdated(&mut self) {
        self.outdated = true;
        self.weight = 0;
    }

    /// Owned copy for serialization
    #[must_use]
    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            key: self.key.clone(),
            source: self.source.clone(),
            target: self.target.clone(),
            weight: self.weight,
        }
    }
}

/// Serializable copy of a [`Node`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    /// Key within the kind
    pub key: String,
    /// Node kind
    pub kind: NodeKind,
    /// Weight at snapshot time
    pub weight: u32,
    /// Author picture
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Serializable copy of a [`Link`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSnapshot {
    /// Display key
    pub key: String,
    /// Author endpoint
    pub source: NodeKey,
    /// Story endpoint
    pub target: NodeKey,
    /// Weight at snapshot time
    pub weight: u32,
}

/// Owned copy of the whole graph after a pass
///
/// Renderers that need to keep data across cycles hold one of these instead
/// of references into the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Nodes in store order
    pub nodes: Vec<NodeSnapshot>,
    /// Links in store order
    pub links: Vec<LinkSnapshot>,
}

impl GraphSnapshot {
    /// Find a node by kind and key
    #[must_use]
    pub fn node(&self, kind: NodeKind, key: &str) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|n| n.kind == kind && n.key == key)
    }

    /// Find an author node
    #[must_use]
    pub fn author(&self, key: &str) -> Option<&NodeSnapshot> {
        self.node(NodeKind::Author, key)
    }

    /// Find a story node
    #[must_use]
    pub fn story(&self, key: &str) -> Option<&NodeSnapshot> {
        self.node(NodeKind::Story, key)
    }

    /// Find the first link with display key `key`
    #[must_use]
    pub fn link(&self, key: &str) -> Option<&LinkSnapshot> {
        self.links.iter().find(|l| l.key == key)
    }

    /// Find a link by endpoints
    #[must_use]
    pub fn link_between(&self, source: &NodeKey, target: &NodeKey) -> Option<&LinkSnapshot> {
        self.links
            .iter()
            .find(|l| &l.source == source && &l.target == target)
    }

    /// True when the graph has no nodes and no links
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}
