//! News graph instance
//!
//! One [`NewsGraph`] owns one store, one scheduler and one render target.
//! Several can run side by side; nothing is global.

use crate::clock::{Clock, TokioClock};
use crate::config::NewsGraphConfig;
use crate::error::{ConfigError, RefreshError};
use crate::fetch::{fetcher_for, FeedFetcher};
use crate::render::{LogRenderer, RenderAdapter, RenderTarget};
use crate::scheduler::{CycleOutcome, RefreshScheduler, SchedulerState, SchedulerStats};
use newsgraph_core::GraphSnapshot;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Live author/story graph for one feed
pub struct NewsGraph {
    config: NewsGraphConfig,
    scheduler: RefreshScheduler,
    renderer: Arc<dyn RenderAdapter>,
    target: Mutex<RenderTarget>,
}

impl NewsGraph {
    /// Validate `config`, mount the renderer and build an idle graph
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] for out of range values.
    pub fn init(
        config: NewsGraphConfig,
        fetcher: Arc<dyn FeedFetcher>,
        renderer: Arc<dyn RenderAdapter>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let target = config.render_target();
        renderer.mount(&target);

        let scheduler = RefreshScheduler::new(
            config.feed_url.clone(),
            fetcher,
            Arc::clone(&renderer),
            clock,
        );

        info!(
            url = %config.feed_url,
            container = %target.container,
            interval_secs = config.refresh_interval_secs,
            "news graph initialised"
        );

        Ok(Self {
            config,
            scheduler,
            renderer,
            target: Mutex::new(target),
        })
    }

    /// Build with the stock fetcher for the feed URL, [`LogRenderer`] and
    /// [`TokioClock`]
    ///
    /// # Errors
    /// Invalid config or an HTTP client that cannot be built.
    pub fn with_defaults(config: NewsGraphConfig) -> Result<Self, RefreshError> {
        Self::with_renderer(config, Arc::new(LogRenderer))
    }

    /// Build with the stock fetcher and clock and a caller-supplied renderer
    ///
    /// # Errors
    /// Invalid config or an HTTP client that cannot be built.
    pub fn with_renderer(
        config: NewsGraphConfig,
        renderer: Arc<dyn RenderAdapter>,
    ) -> Result<Self, RefreshError> {
        config.validate()?;
        let fetcher = fetcher_for(&config.feed_url, config.fetch_timeout(), &config.user_agent)?;
        Ok(Self::init(config, fetcher, renderer, Arc::new(TokioClock))?)
    }

    /// Start periodic refresh at the configured interval
    ///
    /// Returns `false` if already running.
    pub fn start(&self) -> bool {
        self.scheduler.start(self.config.refresh_interval())
    }

    /// Stop periodic refresh
    ///
    /// Returns `false` if already stopped.
    pub fn stop(&self) -> bool {
        self.scheduler.stop()
    }

    /// Change the render area; zero sizes are ignored
    pub fn resize(&self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            warn!(width, height, "ignoring resize to empty area");
            return;
        }
        {
            let mut target = self.target.lock();
            if target.width == width && target.height == height {
                return;
            }
            target.width = width;
            target.height = height;
        }
        self.renderer.resize(width, height);
    }

    /// Fetch and reconcile once, outside the timer
    pub async fn refresh_now(&self) -> CycleOutcome {
        self.scheduler.run_cycle().await
    }

    /// Owned copy of the current graph
    #[must_use]
    pub fn snapshot(&self) -> GraphSnapshot {
        self.scheduler.snapshot()
    }

    /// Scheduler state
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Cycle counters
    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Current render target
    #[must_use]
    pub fn target(&self) -> RenderTarget {
        self.target.lock().clone()
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &NewsGraphConfig {
        &self.config
    }
}
