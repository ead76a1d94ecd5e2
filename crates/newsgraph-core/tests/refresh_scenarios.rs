//! Multi-cycle reconciliation scenarios

use newsgraph_core::prelude::*;
use newsgraph_core::identity;
use pretty_assertions::assert_eq;
use serde_json::json;

fn story(author: &str, link: &str) -> StoryRecord {
    StoryRecord::new(json!({
        "author": { "username": author, "picture": format!("http://img/{author}.png") },
        "link": link,
    }))
}

#[test]
fn test_news_feed_two_cycles() {
    let reconciler = Reconciler::new();
    let mut store = GraphStore::new();

    let first = vec![
        story("alice", "http://www.cnn.com/x"),
        story("alice", "http://cnn.com/y"),
        story("bob", "http://cnn.com/y"),
    ];
    reconciler.reconcile(&mut store, &first);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.nodes.len(), 3);
    assert_eq!(snapshot.author("alice").unwrap().weight, 2);
    assert_eq!(snapshot.author("bob").unwrap().weight, 1);
    assert!(snapshot.story("cnn.com").is_some());
    assert_eq!(snapshot.link("alice-cnn.com").unwrap().weight, 2);
    assert_eq!(snapshot.link("bob-cnn.com").unwrap().weight, 1);
    assert_eq!(
        snapshot.author("alice").unwrap().image_url.as_deref(),
        Some("http://img/alice.png")
    );

    reconciler.reconcile(&mut store, &[story("bob", "http://cnn.com/y")]);

    let snapshot = store.snapshot();
    assert!(snapshot.author("alice").is_none());
    assert!(snapshot.link("alice-cnn.com").is_none());
    assert_eq!(snapshot.author("bob").unwrap().weight, 1);
    assert_eq!(snapshot.link("bob-cnn.com").unwrap().weight, 1);
    assert!(snapshot.story("cnn.com").is_some());
    assert_eq!(snapshot.nodes.len(), 2);
    assert_eq!(snapshot.links.len(), 1);
}

#[test]
fn test_story_key_determinism() {
    let a = story("alice", "http://www.example.com/a");
    let b = story("bob", "https://example.com/b");

    assert_eq!(identity::story_key(&a).unwrap(), "example.com");
    assert_eq!(identity::story_key(&a).unwrap(), identity::story_key(&b).unwrap());
}

#[test]
fn test_link_key_independent_of_fetch_order() {
    let reconciler = Reconciler::new();
    let records = vec![
        story("alice", "http://cnn.com/x"),
        story("bob", "http://bbc.co.uk/y"),
        story("alice", "http://www.cnn.com/z"),
    ];
    let mut reversed = records.clone();
    reversed.reverse();

    let mut forward_store = GraphStore::new();
    reconciler.reconcile(&mut forward_store, &records);
    let mut reverse_store = GraphStore::new();
    reconciler.reconcile(&mut reverse_store, &reversed);

    let mut forward: Vec<_> = forward_store.snapshot().links;
    let mut backward: Vec<_> = reverse_store.snapshot().links;
    forward.sort_by(|a, b| a.key.cmp(&b.key));
    backward.sort_by(|a, b| a.key.cmp(&b.key));
    assert_eq!(forward, backward);
}

#[test]
fn test_identity_survives_refresh() {
    let reconciler = Reconciler::new();
    let mut store = GraphStore::new();

    reconciler.reconcile(&mut store, &[story("alice", "http://cnn.com/x")]);
    let report = reconciler.reconcile(
        &mut store,
        &[
            story("alice", "http://cnn.com/x"),
            story("carol", "http://bbc.co.uk/news"),
        ],
    );

    // alice, cnn.com and their link carried over; carol and bbc.co.uk are new
    assert_eq!(report.nodes_added, 2);
    assert_eq!(report.links_added, 1);
    assert_eq!(report.nodes_pruned, 0);

    let keys: Vec<_> = store.view().nodes().map(|n| n.key().to_owned()).collect();
    assert_eq!(keys, vec!["alice", "cnn.com", "carol", "bbc.co.uk"]);
}

#[test]
fn test_partial_failure_keeps_good_records() {
    let reconciler = Reconciler::new();
    let mut store = GraphStore::new();
    let records = vec![
        story("alice", "http://cnn.com/x"),
        StoryRecord::new(json!({ "author": { "username": "bob" } })),
        story("carol", "ftp://"),
    ];

    let report = reconciler.reconcile(&mut store, &records);

    assert_eq!(report.applied, 1);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(report.skipped[0].error, RecordError::MissingField("link"));
    assert_eq!(store.snapshot().nodes.len(), 2);
}
