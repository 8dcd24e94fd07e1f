use linkfast_core::{Repository, ShortCode};
use std::sync::Arc;
use tokio_util::task::TaskTracker;
use tracing::{debug, trace, warn};

/// Records redirects as detached background increments.
///
/// [`ClickRecorder::record`] returns immediately. Failures are logged and
/// dropped, never retried. [`ClickRecorder::shutdown`] stops accepting new
/// clicks and waits for the ones already in flight.
#[derive(Debug)]
pub struct ClickRecorder<R> {
    repository: Arc<R>,
    tracker: TaskTracker,
}

impl<R: Repository> ClickRecorder<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            tracker: TaskTracker::new(),
        }
    }

    /// Schedules one click-count increment for `code`.
    pub fn record(&self, code: &ShortCode) {
        if self.tracker.is_closed() {
            warn!(code = %code, "click recorder is shut down, dropping click");
            return;
        }

        let repository = Arc::clone(&self.repository);
        let code = code.clone();
        self.tracker.spawn(async move {
            match repository.increment_clicks(&code).await {
                Ok(Some(count)) => trace!(code = %code, count, "recorded click"),
                Ok(None) => debug!(code = %code, "click for unknown code ignored"),
                Err(e) => warn!(code = %code, error = %e, "failed to record click"),
            }
        });
    }

    /// Number of increments still running.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}
