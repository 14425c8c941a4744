use std::sync::Arc;

use super::publisher::{StatusPublisher, StatusRecord};
use super::report::StatsReport;
use crate::input::LogicalButton;
use crate::signals::{InputSignal, SignalHandler};

pub const PRESSED: &str = "pressed";
pub const RELEASED: &str = "released";

/// Mirrors button, writing-mode and action signals into status records
pub struct StatusSignalHandler {
    publisher: Arc<dyn StatusPublisher>,
}

impl StatusSignalHandler {
    pub fn new(publisher: Arc<dyn StatusPublisher>) -> Self {
        Self { publisher }
    }

    /// Records for a freshly started daemon
    pub fn publish_initial(&self) {
        for button in LogicalButton::ALL {
            self.publisher.publish(StatusRecord::Button(button), RELEASED);
        }
        self.publisher.publish(StatusRecord::WritingMode, on_off(false));
    }

    pub fn publish_report(&self, report: &StatsReport) {
        match serde_json::to_string_pretty(report) {
            Ok(json) => self.publisher.publish(StatusRecord::Stats, &json),
            Err(e) => tracing::debug!(error = %e, "Failed to serialize stats report"),
        }
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

impl SignalHandler for StatusSignalHandler {
    fn handle_signal(&mut self, signal: &InputSignal) {
        match signal {
            InputSignal::ButtonPressed { button, .. } => {
                self.publisher.publish(StatusRecord::Button(*button), PRESSED);
            }
            InputSignal::ButtonReleased { button, .. } => {
                self.publisher.publish(StatusRecord::Button(*button), RELEASED);
            }
            InputSignal::WritingModeChanged { enabled, .. } => {
                self.publisher
                    .publish(StatusRecord::WritingMode, on_off(*enabled));
            }
            InputSignal::ActionRequested { action, .. } => {
                self.publisher.publish(StatusRecord::LastAction, action.as_str());
            }
            _ => {}
        }
    }
}
