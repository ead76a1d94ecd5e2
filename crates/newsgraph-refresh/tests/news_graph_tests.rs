use newsgraph_refresh::{
    ConfigError, JsonRenderer, NewsGraph, NewsGraphConfig, RenderTarget, SchedulerState,
    TokioClock,
};
use newsgraph_test_utils::{cnn_feed, feed, RecordingRenderer, ScriptedFetcher};
use std::sync::Arc;
use std::time::Duration;

fn config() -> NewsGraphConfig {
    NewsGraphConfig {
        feed_url: "https://news.example.com/hot".to_string(),
        container: "#news".to_string(),
        width: 640,
        height: 480,
        refresh_interval_secs: 30,
        ..NewsGraphConfig::default()
    }
}

fn graph(
    config: NewsGraphConfig,
    fetcher: &Arc<ScriptedFetcher>,
    renderer: &Arc<RecordingRenderer>,
) -> Result<NewsGraph, ConfigError> {
    NewsGraph::init(
        config,
        Arc::clone(fetcher) as _,
        Arc::clone(renderer) as _,
        Arc::new(TokioClock),
    )
}

#[test]
fn test_init_mounts_renderer() {
    let fetcher = ScriptedFetcher::new();
    let renderer = RecordingRenderer::new();

    let graph = graph(config(), &fetcher, &renderer).unwrap();

    let expected = RenderTarget {
        container: "#news".to_string(),
        width: 640,
        height: 480,
    };
    assert_eq!(renderer.mounts(), vec![expected.clone()]);
    assert_eq!(graph.target(), expected);
    assert_eq!(graph.state(), SchedulerState::Idle);
    assert_eq!(fetcher.calls(), 0);
}

#[test]
fn test_init_rejects_invalid_config() {
    let fetcher = ScriptedFetcher::new();
    let renderer = RecordingRenderer::new();
    let bad = NewsGraphConfig {
        refresh_interval_secs: 0,
        ..config()
    };

    let result = graph(bad, &fetcher, &renderer);

    assert!(matches!(result, Err(ConfigError::Invalid(_))));
    assert!(renderer.mounts().is_empty());
}

#[test]
fn test_resize_forwards_changes_only() {
    let fetcher = ScriptedFetcher::new();
    let renderer = RecordingRenderer::new();
    let graph = graph(config(), &fetcher, &renderer).unwrap();

    graph.resize(1024, 768);
    graph.resize(1024, 768);
    graph.resize(0, 768);

    assert_eq!(renderer.resizes(), vec![(1024, 768)]);
    assert_eq!((graph.target().width, graph.target().height), (1024, 768));
}

#[tokio::test(start_paused = true)]
async fn test_start_stop_lifecycle() {
    let fetcher = ScriptedFetcher::new();
    fetcher.push_feed(cnn_feed());
    let renderer = RecordingRenderer::new();
    let graph = graph(config(), &fetcher, &renderer).unwrap();

    assert!(graph.start());
    assert!(!graph.start());
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(graph.snapshot().nodes.len(), 3);
    assert_eq!(fetcher.urls(), vec!["https://news.example.com/hot".to_string()]);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(fetcher.calls(), 2);

    assert!(graph.stop());
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(graph.stats().applied, 2);
}

#[tokio::test(start_paused = true)]
async fn test_independent_graphs() {
    let first_fetcher = ScriptedFetcher::new();
    first_fetcher.push_feed(cnn_feed());
    let second_fetcher = ScriptedFetcher::new();
    second_fetcher.push_feed(feed(&[("carol", "https://www.bbc.co.uk/news/1")]));
    let first_renderer = RecordingRenderer::new();
    let second_renderer = RecordingRenderer::new();

    let first = graph(config(), &first_fetcher, &first_renderer).unwrap();
    let second = graph(config(), &second_fetcher, &second_renderer).unwrap();

    first.refresh_now().await;
    second.refresh_now().await;

    assert!(first.snapshot().author("alice").is_some());
    assert!(first.snapshot().author("carol").is_none());
    assert!(second.snapshot().author("carol").is_some());
    assert!(second.snapshot().story("bbc.co.uk").is_some());
    assert_eq!(first_renderer.render_count(), 1);
    assert_eq!(second_renderer.render_count(), 1);
}

#[tokio::test]
async fn test_file_feed_with_json_renderer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hot.json");
    let records = serde_json::to_vec(&cnn_feed()).unwrap();
    std::fs::write(&path, records).unwrap();

    let config = NewsGraphConfig {
        feed_url: path.to_string_lossy().into_owned(),
        ..NewsGraphConfig::default()
    };
    let renderer = Arc::new(JsonRenderer::new(Vec::new()));
    let graph = NewsGraph::with_renderer(config, Arc::clone(&renderer) as _).unwrap();

    let outcome = graph.refresh_now().await;
    assert!(outcome.is_applied());
    drop(graph);

    let renderer = Arc::try_unwrap(renderer).ok().unwrap();
    let out = String::from_utf8(renderer.into_inner()).unwrap();
    let snapshot: newsgraph_core::GraphSnapshot =
        serde_json::from_str(out.lines().next().unwrap()).unwrap();
    assert_eq!(snapshot.author("alice").unwrap().weight, 2);
    assert_eq!(snapshot.link("bob-cnn.com").unwrap().weight, 1);
}
