//! Timer seam for the inter-attempt delay.

use async_trait::async_trait;
use std::time::Duration;

/// Source of the suspension between attempts.
///
/// The orchestrator sleeps through this trait so tests can observe or skip
/// the waits. The default is [`TokioSleeper`].
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
