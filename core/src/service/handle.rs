use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::{mpsc, oneshot};

use super::{ServiceCommand, SharedState};
use crate::buttons::ButtonSnapshot;
use crate::input::SourceEvent;
use crate::status::StatsReport;
use crate::tracker::StatsSnapshot;

// ─────────────────────────────────────────────────────────────────────────────
// Service Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to feed the input service and query its state
#[derive(Clone)]
pub struct ServiceHandle {
    pub cmd_tx: mpsc::Sender<ServiceCommand>,
    pub event_tx: mpsc::Sender<SourceEvent>,
    pub shared: Arc<SharedState>,
}

impl ServiceHandle {
    /// Sender for device readers and other event producers
    pub fn event_sender(&self) -> mpsc::Sender<SourceEvent> {
        self.event_tx.clone()
    }

    /// Queue one event
    pub async fn send_event(&self, event: SourceEvent) -> Result<(), String> {
        self.event_tx.send(event).await.map_err(|e| e.to_string())
    }

    /// Wait until every event queued before this call has been processed
    pub async fn sync(&self) -> Result<(), String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.cmd_tx
            .send(ServiceCommand::Sync(reply_tx))
            .await
            .map_err(|e| e.to_string())?;
        reply_rx.await.map_err(|e| e.to_string())
    }

    /// Current writing statistics
    pub async fn snapshot(&self) -> StatsSnapshot {
        self.shared.stats.read().await.clone()
    }

    /// Current button state and writing mode
    pub async fn buttons(&self) -> ButtonSnapshot {
        self.shared.buttons.read().await.clone()
    }

    /// Statistics with pages and achievement progress
    pub async fn report(&self) -> StatsReport {
        StatsReport::new(self.snapshot().await, self.shared.tiers)
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Ask the service to stop. Reader tasks see the same flag.
    pub async fn shutdown(&self) {
        self.shared.shutdown.store(true, Ordering::SeqCst);
        let _ = self.cmd_tx.send(ServiceCommand::Shutdown).await;
    }
}
