//! Raw feed records
//!
//! The feed is a JSON array of story objects. Each element is kept as an
//! untyped [`serde_json::Value`] so a single badly shaped record is skipped
//! instead of failing the whole document.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One story record from the news feed
///
/// Expected shape (extra fields ignored):
///
/// ```json
/// { "author": { "username": "alice", "picture": "https://..." }, "link": "https://..." }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryRecord(Value);

impl StoryRecord {
    /// Wrap a raw JSON value
    #[inline]
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// `author.username`, if present and a string
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.0.pointer("/author/username").and_then(Value::as_str)
    }

    /// `author.picture`, if present and a string
    #[must_use]
    pub fn picture(&self) -> Option<&str> {
        self.0.pointer("/author/picture").and_then(Value::as_str)
    }

    /// Story `link`, if present and a string
    #[must_use]
    pub fn link(&self) -> Option<&str> {
        self.0.get("link").and_then(Value::as_str)
    }

    /// Underlying JSON
    #[inline]
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<Value> for StoryRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
