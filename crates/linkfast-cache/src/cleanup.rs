use crate::moka::MokaUrlCache;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, trace};

pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// A handle to the periodic cache cleanup task.
///
/// The task is stopped by [`CleanupTask::stop`] or when the handle is dropped.
#[derive(Debug)]
pub struct CleanupTask {
    shutdown_tx: watch::Sender<bool>,
}

impl CleanupTask {
    pub(crate) fn start(cache: MokaUrlCache, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(cleanup_loop(cache, interval, shutdown_rx));
        info!(interval_secs = interval.as_secs(), "cache cleanup task started");

        Self { shutdown_tx }
    }

    /// Signals the task to exit. Idempotent.
    pub fn stop(&self) {
        if !*self.shutdown_tx.borrow() {
            let _ = self.shutdown_tx.send(true);
            info!("cache cleanup task stopped");
        }
    }

    /// Returns `true` once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.shutdown_tx.is_closed()
    }
}

impl Drop for CleanupTask {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn cleanup_loop(
    cache: MokaUrlCache,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    // interval() panics on a zero period
    let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("cache cleanup received shutdown signal");
                    return;
                }
            }
        }

        let before = cache.entry_count();
        cache.run_pending_tasks().await;
        trace!(
            before = before,
            after = cache.entry_count(),
            "cache cleanup pass finished"
        );
    }
}
