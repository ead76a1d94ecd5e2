//! Testing utilities for newsgraph
//!
//! - [`story`]: feed record fixture
//! - [`ScriptedFetcher`]: fetcher replaying queued results, with a gate to
//!   hold fetches in flight
//! - [`RecordingRenderer`]: renderer keeping a snapshot of every graph

use async_trait::async_trait;
use newsgraph_core::{GraphSnapshot, GraphView, StoryRecord};
use newsgraph_refresh::{FeedFetcher, FetchError, RenderAdapter, RenderTarget};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

/// Feed record for `author` linking to `link`
pub fn story(author: &str, link: &str) -> StoryRecord {
    StoryRecord::new(json!({
        "author": {
            "username": author,
            "picture": format!("https://img.example.com/{author}.png"),
        },
        "link": link,
        "headline": format!("{author} on {link}"),
    }))
}

/// Feed from `(author, link)` pairs
pub fn feed(pairs: &[(&str, &str)]) -> Vec<StoryRecord> {
    pairs.iter().map(|(author, link)| story(author, link)).collect()
}

/// The two-author, one-domain feed used across tests
pub fn cnn_feed() -> Vec<StoryRecord> {
    feed(&[
        ("alice", "http://www.cnn.com/x"),
        ("alice", "http://cnn.com/y"),
        ("bob", "http://cnn.com/y"),
    ])
}

enum Scripted {
    Feed(Vec<StoryRecord>),
    Failure,
}

/// Fetcher that replays queued results
///
/// Once the queue is empty the last successful feed repeats (empty if none).
#[derive(Default)]
pub struct ScriptedFetcher {
    queue: Mutex<VecDeque<Scripted>>,
    last_feed: Mutex<Vec<StoryRecord>>,
    urls: Mutex<Vec<String>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    gate: Mutex<Option<Arc<Semaphore>>>,
    started: Notify,
}

impl ScriptedFetcher {
    /// Empty script
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful fetch
    pub fn push_feed(&self, records: Vec<StoryRecord>) {
        self.queue.lock().push_back(Scripted::Feed(records));
    }

    /// Queue a failed fetch
    pub fn push_failure(&self) {
        self.queue.lock().push_back(Scripted::Failure);
    }

    /// Block fetches at their start until [`ScriptedFetcher::release`] or
    /// [`ScriptedFetcher::open`]
    pub fn hold(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let one held fetch through
    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().as_ref() {
            gate.add_permits(1);
        }
    }

    /// Let every held and future fetch through
    pub fn open(&self) {
        if let Some(gate) = self.gate.lock().take() {
            gate.close();
        }
    }

    /// Resolve once a fetch has started (including one that already has)
    pub async fn wait_for_fetch(&self) {
        self.started.notified().await;
    }

    /// Fetches started
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent fetches seen
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// URLs requested, in order
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

#[async_trait]
impl FeedFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<StoryRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.started.notify_one();

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            // closed gate means open(); either way proceed
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        let next = self.queue.lock().pop_front();
        let result = match next {
            Some(Scripted::Feed(records)) => {
                *self.last_feed.lock() = records.clone();
                Ok(records)
            }
            Some(Scripted::Failure) => Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            }),
            None => Ok(self.last_feed.lock().clone()),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Renderer that records everything it is given
#[derive(Default)]
pub struct RecordingRenderer {
    graphs: Mutex<Vec<GraphSnapshot>>,
    mounts: Mutex<Vec<RenderTarget>>,
    resizes: Mutex<Vec<(u32, u32)>>,
}

impl RecordingRenderer {
    /// Empty recorder
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every graph received, oldest first
    pub fn graphs(&self) -> Vec<GraphSnapshot> {
        self.graphs.lock().clone()
    }

    /// Latest graph received
    pub fn last(&self) -> Option<GraphSnapshot> {
        self.graphs.lock().last().cloned()
    }

    /// Number of `set_graph` calls
    pub fn render_count(&self) -> usize {
        self.graphs.lock().len()
    }

    /// Mount calls
    pub fn mounts(&self) -> Vec<RenderTarget> {
        self.mounts.lock().clone()
    }

    /// Resize calls
    pub fn resizes(&self) -> Vec<(u32, u32)> {
        self.resizes.lock().clone()
    }
}

impl RenderAdapter for RecordingRenderer {
    fn mount(&self, target: &RenderTarget) {
        self.mounts.lock().push(target.clone());
    }

    fn set_graph(&self, graph: GraphView<'_>) {
        self.graphs.lock().push(graph.to_snapshot());
    }

    fn resize(&self, width: u32, height: u32) {
        self.resizes.lock().push((width, height));
    }
}
