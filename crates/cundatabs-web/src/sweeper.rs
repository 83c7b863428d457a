use std::sync::Arc;
use std::time::Duration;

use cundatabs_core::{Clock, RateLimitTiers};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Periodically drops expired rate limit records until `shutdown` fires.
pub fn spawn_sweeper(
    limiters: Arc<RateLimitTiers>,
    clock: Arc<dyn Clock>,
    period: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        // The first tick completes immediately.
        interval.tick().await;
        tracing::debug!("Rate limit sweeper started (interval: {period:?})");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let removed = limiters.sweep(clock.now());
                    if removed > 0 {
                        tracing::debug!(
                            removed,
                            tracked = limiters.tracked_keys(),
                            "Swept expired rate limit records"
                        );
                    }
                }
            }
        }

        tracing::debug!("Rate limit sweeper stopped");
    })
}
