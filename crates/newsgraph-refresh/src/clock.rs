//! Time source for the refresh timer

use async_trait::async_trait;
use tokio::time::Instant;

/// Clock driving the refresh timer
///
/// Injected so tests can run against tokio's paused time or a custom source.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> Instant;

    /// Resolve at or after `deadline`
    async fn sleep_until(&self, deadline: Instant);
}

/// Tokio timer clock
///
/// Follows `tokio::time::pause`, so `#[tokio::test(start_paused = true)]`
/// tests are deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn tokio_clock_follows_paused_time() {
        let clock = TokioClock;
        let start = clock.now();

        clock.sleep_until(start + Duration::from_secs(30)).await;

        assert!(clock.now() >= start + Duration::from_secs(30));
    }
}
