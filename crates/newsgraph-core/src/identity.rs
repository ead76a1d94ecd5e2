//! Identity resolution
//!
//! Derives stable keys from raw feed records:
//! - author key: the username, verbatim (case sensitive, no normalization)
//! - story key: the story URL's host name without a leading `www.`
//! - link key: `author-story`

use crate::error::RecordError;
use crate::record::StoryRecord;
use url::Url;

const USERNAME_FIELD: &str = "author.username";
const LINK_FIELD: &str = "link";

/// Keys resolved from one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecord {
    /// Author node key
    pub author_key: String,
    /// Author picture, when present and non-empty
    pub image_url: Option<String>,
    /// Story node key (normalized host)
    pub story_key: String,
    /// Distinct-story identity: host plus path and query, fragment dropped
    pub story_url: String,
    /// Link key joining the two
    pub link_key: String,
}

/// Author key for a record
///
/// # Errors
/// [`RecordError::MissingField`] when `author.username` is absent or empty.
pub fn author_key(record: &StoryRecord) -> Result<String, RecordError> {
    match record.username() {
        Some(name) if !name.is_empty() => Ok(name.to_owned()),
        _ => Err(RecordError::MissingField(USERNAME_FIELD)),
    }
}

/// Story key for a record
///
/// # Errors
/// Fails when the link is missing, unparseable, or has no host.
pub fn story_key(record: &StoryRecord) -> Result<String, RecordError> {
    let url = parse_link(record)?;
    host_key(&url)
}

/// Distinct-story identity for a record
///
/// Two records point at the same story when their links differ only in
/// scheme, a leading `www.`, or fragment.
///
/// # Errors
/// Same conditions as [`story_key`].
pub fn story_url(record: &StoryRecord) -> Result<String, RecordError> {
    let url = parse_link(record)?;
    let host = host_key(&url)?;
    Ok(story_identity(&host, &url))
}

/// Link key for an author/story pair
#[inline]
#[must_use]
pub fn link_key(author_key: &str, story_key: &str) -> String {
    let mut key = String::with_capacity(author_key.len() + story_key.len() + 1);
    key.push_str(author_key);
    key.push('-');
    key.push_str(story_key);
    key
}

/// Resolve every key for a record in one pass
///
/// # Errors
/// The first [`RecordError`] found; the author is checked before the link.
pub fn resolve(record: &StoryRecord) -> Result<ResolvedRecord, RecordError> {
    let author_key = author_key(record)?;
    let url = parse_link(record)?;
    let story_key = host_key(&url)?;
    let story_url = story_identity(&story_key, &url);
    let link_key = link_key(&author_key, &story_key);
    let image_url = record
        .picture()
        .filter(|p| !p.is_empty())
        .map(str::to_owned);

    Ok(ResolvedRecord {
        author_key,
        image_url,
        story_key,
        story_url,
        link_key,
    })
}

fn parse_link(record: &StoryRecord) -> Result<Url, RecordError> {
    let link = record
        .link()
        .filter(|l| !l.trim().is_empty())
        .ok_or(RecordError::MissingField(LINK_FIELD))?;

    Url::parse(link.trim()).map_err(|source| RecordError::InvalidUrl {
        url: link.to_owned(),
        source,
    })
}

fn host_key(url: &Url) -> Result<String, RecordError> {
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| RecordError::MissingHost {
            url: url.to_string(),
        })?;

    let host = host.strip_prefix("www.").unwrap_or(host);
    Ok(host.to_ascii_lowercase())
}

fn story_identity(host: &str, url: &Url) -> String {
    let mut identity = String::with_capacity(host.len() + url.path().len());
    identity.push_str(host);
    identity.push_str(url.path());
    if let Some(query) = url.query() {
        identity.push('?');
        identity.push_str(query);
    }
    identity
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(username: &str, link: &str) -> StoryRecord {
        StoryRecord::new(json!({
            "author": { "username": username, "picture": "http://img/p.png" },
            "link": link,
        }))
    }

    #[test]
    fn story_key_strips_www_and_scheme() {
        let a = record("alice", "http://www.example.com/a");
        let b = record("bob", "https://example.com/b");

        assert_eq!(story_key(&a).unwrap(), "example.com");
        assert_eq!(story_key(&b).unwrap(), "example.com");
    }

    #[test]
    fn story_key_lowercases_host() {
        let r = record("alice", "HTTP://WWW.CNN.COM/Politics");
        assert_eq!(story_key(&r).unwrap(), "cnn.com");
    }

    #[test]
    fn story_key_keeps_other_subdomains() {
        let r = record("alice", "https://edition.cnn.com/x");
        assert_eq!(story_key(&r).unwrap(), "edition.cnn.com");
    }

    #[test]
    fn author_key_is_verbatim() {
        let upper = record("Alice", "http://cnn.com");
        let lower = record("alice", "http://cnn.com");

        assert_eq!(author_key(&upper).unwrap(), "Alice");
        assert_ne!(author_key(&upper).unwrap(), author_key(&lower).unwrap());
    }

    #[test]
    fn missing_username_is_malformed() {
        let r = StoryRecord::new(json!({ "author": {}, "link": "http://cnn.com" }));
        assert_eq!(
            author_key(&r),
            Err(RecordError::MissingField("author.username"))
        );

        let empty = record("", "http://cnn.com");
        assert!(author_key(&empty).is_err());
    }

    #[test]
    fn missing_or_bad_link_is_malformed() {
        let missing = StoryRecord::new(json!({ "author": { "username": "alice" } }));
        assert_eq!(story_key(&missing), Err(RecordError::MissingField("link")));

        let relative = record("alice", "/news/story");
        assert!(matches!(
            story_key(&relative),
            Err(RecordError::InvalidUrl { .. })
        ));

        let hostless = record("alice", "mailto:alice@example.com");
        assert!(matches!(
            story_key(&hostless),
            Err(RecordError::MissingHost { .. })
        ));
    }

    #[test]
    fn link_key_concatenates() {
        assert_eq!(link_key("alice", "cnn.com"), "alice-cnn.com");
    }

    #[test]
    fn story_url_ignores_scheme_www_and_fragment() {
        let a = record("alice", "http://www.cnn.com/x?id=1#top");
        let b = record("alice", "https://cnn.com/x?id=1");
        let c = record("alice", "https://cnn.com/y");

        assert_eq!(story_url(&a).unwrap(), "cnn.com/x?id=1");
        assert_eq!(story_url(&a).unwrap(), story_url(&b).unwrap());
        assert_ne!(story_url(&a).unwrap(), story_url(&c).unwrap());
    }

    #[test]
    fn resolve_collects_all_keys() {
        let resolved = resolve(&record("alice", "http://www.cnn.com/x")).unwrap();

        assert_eq!(resolved.author_key, "alice");
        assert_eq!(resolved.story_key, "cnn.com");
        assert_eq!(resolved.link_key, "alice-cnn.com");
        assert_eq!(resolved.story_url, "cnn.com/x");
        assert_eq!(resolved.image_url.as_deref(), Some("http://img/p.png"));
    }

    #[test]
    fn resolve_drops_empty_picture() {
        let r = StoryRecord::new(json!({
            "author": { "username": "alice", "picture": "" },
            "link": "http://cnn.com/x",
        }));
        assert_eq!(resolve(&r).unwrap().image_url, None);
    }
}
