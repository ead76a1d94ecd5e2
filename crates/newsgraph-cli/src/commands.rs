//! Subcommand handlers

use anyhow::{bail, Context};
use clap::ArgMatches;
use newsgraph_refresh::{
    CycleOutcome, JsonRenderer, LogRenderer, NewsGraph, NewsGraphConfig, RenderAdapter,
};
use std::sync::Arc;
use tracing::info;

/// Config file (or defaults) with command line overrides applied
pub(crate) fn resolve_config(args: &ArgMatches) -> anyhow::Result<NewsGraphConfig> {
    let mut config = match args.get_one::<String>("config") {
        Some(path) => NewsGraphConfig::load(path)
            .with_context(|| format!("loading config from {path}"))?,
        None => NewsGraphConfig::default(),
    };

    if let Some(url) = args.get_one::<String>("url") {
        config.feed_url.clone_from(url);
    }
    if let Ok(Some(interval)) = args.try_get_one::<u64>("interval") {
        config.refresh_interval_secs = *interval;
    }

    config.validate()?;
    Ok(config)
}

pub(crate) async fn watch(args: &ArgMatches) -> anyhow::Result<()> {
    let config = resolve_config(args)?;
    let renderer: Arc<dyn RenderAdapter> = match args.get_one::<String>("format").map(String::as_str) {
        Some("json") => Arc::new(JsonRenderer::new(std::io::stdout())),
        _ => Arc::new(LogRenderer),
    };

    let graph = NewsGraph::with_renderer(config, renderer)?;
    graph.start();

    tokio::signal::ctrl_c()
        .await
        .context("waiting for ctrl-c")?;

    graph.stop();
    let stats = graph.stats();
    info!(
        cycles = stats.cycles,
        applied = stats.applied,
        failed = stats.failed,
        discarded = stats.discarded,
        "shutting down"
    );
    Ok(())
}

pub(crate) async fn snapshot(args: &ArgMatches) -> anyhow::Result<()> {
    let config = resolve_config(args)?;
    let url = config.feed_url.clone();
    let graph = NewsGraph::with_renderer(config, Arc::new(LogRenderer))?;

    match graph.refresh_now().await {
        CycleOutcome::Applied(_) => {}
        CycleOutcome::FetchFailed(err) => {
            return Err(err).with_context(|| format!("fetching {url}"));
        }
        CycleOutcome::Discarded => bail!("refresh of {url} was discarded"),
    }

    let snapshot = graph.snapshot();
    let json = if args.get_flag("compact") {
        serde_json::to_string(&snapshot)?
    } else {
        serde_json::to_string_pretty(&snapshot)?
    };
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli;

    fn snapshot_args(argv: &[&str]) -> ArgMatches {
        let mut full = vec!["newsgraph", "snapshot"];
        full.extend_from_slice(argv);
        let matches = cli().try_get_matches_from(full).unwrap();
        matches.subcommand_matches("snapshot").unwrap().clone()
    }

    #[test]
    fn defaults_without_config() {
        let config = resolve_config(&snapshot_args(&[])).unwrap();
        assert_eq!(config, NewsGraphConfig::default());
    }

    #[test]
    fn url_flag_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsgraph.toml");
        std::fs::write(&path, "feed_url = \"https://a.example.com\"\nwidth = 300\n").unwrap();
        let path = path.to_str().unwrap();

        let from_file = resolve_config(&snapshot_args(&["--config", path])).unwrap();
        assert_eq!(from_file.feed_url, "https://a.example.com");
        assert_eq!(from_file.width, 300);

        let overridden =
            resolve_config(&snapshot_args(&["--config", path, "--url", "feed.json"])).unwrap();
        assert_eq!(overridden.feed_url, "feed.json");
        assert_eq!(overridden.width, 300);
    }

    #[test]
    fn missing_config_file_errors() {
        let err = resolve_config(&snapshot_args(&["--config", "/no/such/newsgraph.toml"]))
            .unwrap_err();
        assert!(err.to_string().contains("loading config"));
    }

    #[tokio::test]
    async fn snapshot_from_file_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot.json");
        std::fs::write(
            &path,
            r#"[{"author": {"username": "alice"}, "link": "http://www.cnn.com/x"}]"#,
        )
        .unwrap();

        let args = snapshot_args(&["--url", path.to_str().unwrap(), "--compact"]);
        snapshot(&args).await.unwrap();
    }

    #[tokio::test]
    async fn snapshot_missing_feed_fails() {
        let args = snapshot_args(&["--url", "/no/such/feed.json"]);
        let err = snapshot(&args).await.unwrap_err();
        assert!(err.to_string().contains("fetching /no/such/feed.json"));
    }
}
