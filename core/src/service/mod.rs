//! Input service - the single writer for tracker and button state
//!
//! Architecture:
//! - SharedState: Arc-wrapped snapshots readable through the handle
//! - ServiceHandle: for queuing events, sending commands and reading snapshots
//! - InputService: background task that owns the SessionTracker and the
//!   ButtonStateMachine and serializes every event through them
mod handle;
mod state;

#[cfg(test)]
mod service_tests;

pub use handle::ServiceHandle;
pub use state::SharedState;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;

use crate::achievements::tiers_for;
use crate::buttons::ButtonStateMachine;
use crate::context::AppConfig;
use crate::input::{InputEvent, SourceEvent, Timestamp, now};
use crate::signals::{InputSignal, SignalHandler};
use crate::status::{StatsReport, StatusSignalHandler};
use crate::tracker::SessionTracker;

/// Queued events before producers wait
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ─────────────────────────────────────────────────────────────────────────────
// Service Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Messages sent to the service through the handle
pub enum ServiceCommand {
    /// Reply once everything queued so far has been processed
    Sync(oneshot::Sender<()>),
    Shutdown,
}

// ─────────────────────────────────────────────────────────────────────────────
// Input Service
// ─────────────────────────────────────────────────────────────────────────────

pub struct InputService {
    tracker: SessionTracker,
    buttons: ButtonStateMachine,
    handlers: Vec<Box<dyn SignalHandler + Send + Sync>>,
    status: Option<StatusSignalHandler>,
    shared: Arc<SharedState>,
    event_rx: mpsc::Receiver<SourceEvent>,
    cmd_rx: mpsc::Receiver<ServiceCommand>,
    poll_interval: Duration,
    /// Stats changed since the last published report
    stats_dirty: bool,
}

impl InputService {
    /// Create a new service and return a handle to communicate with it
    pub fn new(config: &AppConfig, shutdown: Arc<AtomicBool>) -> (Self, ServiceHandle) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let shared = Arc::new(SharedState::new(
            tiers_for(config.achievement_table),
            shutdown,
        ));

        let service = Self {
            tracker: SessionTracker::from_config(config),
            buttons: ButtonStateMachine::new(config.press),
            handlers: Vec::new(),
            status: None,
            shared: shared.clone(),
            event_rx,
            cmd_rx,
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            stats_dirty: true,
        };

        let handle = ServiceHandle {
            cmd_tx,
            event_tx,
            shared,
        };

        (service, handle)
    }

    pub fn add_signal_handler(&mut self, handler: Box<dyn SignalHandler + Send + Sync>) {
        self.handlers.push(handler);
    }

    /// Status records follow button signals; the stats record is refreshed on ticks
    pub fn set_status_handler(&mut self, handler: StatusSignalHandler) {
        handler.publish_initial();
        self.status = Some(handler);
    }

    /// Run the service event loop until shutdown
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            poll_ms = self.poll_interval.as_millis() as u64,
            strategy = ?self.tracker.strategy(),
            "Input service started"
        );

        loop {
            tokio::select! {
                biased;

                _ = ticker.tick() => {
                    if self.shared.shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    self.tick(now()).await;
                }
                Some(event) = self.event_rx.recv() => {
                    self.process_event(event);
                    self.publish_shared().await;
                }
                cmd = self.cmd_rx.recv() => match cmd {
                    Some(ServiceCommand::Sync(reply)) => {
                        self.publish_shared().await;
                        let _ = reply.send(());
                    }
                    Some(ServiceCommand::Shutdown) | None => break,
                },
            }
        }

        self.publish_report();
        self.shared.running.store(false, Ordering::SeqCst);
        tracing::info!("Input service stopped");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Processing
    // ─────────────────────────────────────────────────────────────────────────

    fn process_event(&mut self, source: SourceEvent) {
        let signals = match source.event {
            InputEvent::Keystroke { timestamp, class } => {
                self.stats_dirty = true;
                self.tracker.ingest_event(timestamp, class)
            }
            InputEvent::Button {
                timestamp,
                button,
                transition,
            } => {
                tracing::trace!(device = %source.device, %button, ?transition, "Button event");
                self.buttons.handle(button, transition, timestamp)
            }
        };
        self.emit(&signals);
    }

    /// Watchdog: long presses, idle session close, stats record
    async fn tick(&mut self, now: Timestamp) {
        let mut signals = self.buttons.poll(now);
        if let Some(closed) = self.tracker.close_idle_session(now) {
            self.stats_dirty = true;
            signals.push(closed);
        }
        self.emit(&signals);

        self.publish_shared().await;
        if self.stats_dirty {
            self.publish_report();
        }
    }

    fn emit(&mut self, signals: &[InputSignal]) {
        if signals.is_empty() {
            return;
        }
        for signal in signals {
            tracing::debug!(signal = %signal.describe(), "Input signal");
        }
        if let Some(status) = self.status.as_mut() {
            status.handle_signals(signals);
        }
        for handler in &mut self.handlers {
            handler.handle_signals(signals);
        }
    }

    async fn publish_shared(&self) {
        *self.shared.stats.write().await = self.tracker.snapshot_at(now());
        *self.shared.buttons.write().await = self.buttons.snapshot();
    }

    fn publish_report(&mut self) {
        self.stats_dirty = false;
        if let Some(status) = &self.status {
            let report = StatsReport::new(self.tracker.snapshot_at(now()), self.shared.tiers);
            status.publish_report(&report);
        }
    }
}
