//! Action dispatch
//!
//! Actions are fire-and-forget: `dispatch` returns immediately and the
//! outcome of whatever the action triggers is never reported back.

mod command;

pub use command::CommandDispatcher;

use quill_types::Action;
use std::sync::Arc;

use crate::signals::{InputSignal, SignalHandler};

/// Consumer of discrete action requests. Must not block.
pub trait ActionDispatcher: Send + Sync {
    fn dispatch(&self, action: Action);
}

/// Dispatcher used when no commands are configured
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDispatcher;

impl ActionDispatcher for LoggingDispatcher {
    fn dispatch(&self, action: Action) {
        tracing::info!(%action, "Action requested");
    }
}

/// Forwards `ActionRequested` signals to a dispatcher
pub struct ActionSignalHandler {
    dispatcher: Arc<dyn ActionDispatcher>,
}

impl ActionSignalHandler {
    pub fn new(dispatcher: Arc<dyn ActionDispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl SignalHandler for ActionSignalHandler {
    fn handle_signal(&mut self, signal: &InputSignal) {
        if let InputSignal::ActionRequested { action, .. } = signal {
            self.dispatcher.dispatch(*action);
        }
    }
}

#[cfg(test)]
pub(crate) use recording::RecordingDispatcher;

#[cfg(test)]
mod recording {
    use super::*;
    use std::sync::Mutex;

    /// Remembers every dispatched action
    #[derive(Default)]
    pub(crate) struct RecordingDispatcher {
        actions: Mutex<Vec<Action>>,
    }

    impl RecordingDispatcher {
        pub(crate) fn actions(&self) -> Vec<Action> {
            self.actions.lock().unwrap().clone()
        }
    }

    impl ActionDispatcher for RecordingDispatcher {
        fn dispatch(&self, action: Action) {
            self.actions.lock().unwrap().push(action);
        }
    }
}
