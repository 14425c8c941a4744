use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct BackgroundTasks {
    pub service: Option<JoinHandle<()>>,
    pub readers: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn is_empty(&self) -> bool {
        self.service.is_none() && self.readers.is_empty()
    }

    /// Wait for every task to finish on its own, aborting any that outlive `timeout`.
    pub async fn join_all(&mut self, timeout: Duration) {
        let handles = self.readers.drain(..).chain(self.service.take());
        for mut handle in handles {
            if tokio::time::timeout(timeout, &mut handle).await.is_err() {
                tracing::warn!("Background task did not stop in time, aborting");
                handle.abort();
            }
        }
    }

    pub fn abort_all(&mut self) {
        if let Some(handle) = self.service.take() {
            handle.abort();
        }
        for handle in self.readers.drain(..) {
            handle.abort();
        }
    }
}
