use quill_types::PressTiming;
use serde::Serialize;

use super::bindings::{Bindings, ButtonTrigger};
use super::combination::{CombinationDetector, CombinationId};
use super::press::PressKind;
use super::state::{ButtonState, ButtonTable};
use crate::input::{KeyTransition, LogicalButton, Timestamp};
use crate::signals::InputSignal;

/// Point-in-time view of the button machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonSnapshot {
    pub pressed: Vec<LogicalButton>,
    pub writing_mode: bool,
}

/// Press/release state machine over the logical buttons.
///
/// Transitions from every device feed one table, so a button reported by two
/// devices behaves like a single button. Events older than the last accepted
/// event for the same button are dropped. A held button is released by
/// [`poll`](Self::poll) as soon as it exceeds the long-press threshold; the
/// later physical release is then ignored.
#[derive(Debug, Clone)]
pub struct ButtonStateMachine {
    timing: PressTiming,
    table: ButtonTable,
    combinations: CombinationDetector,
    bindings: Bindings,
}

impl Default for ButtonStateMachine {
    fn default() -> Self {
        Self::new(PressTiming::default())
    }
}

impl ButtonStateMachine {
    pub fn new(timing: PressTiming) -> Self {
        Self::with_bindings(timing, Bindings::default())
    }

    pub fn with_bindings(timing: PressTiming, bindings: Bindings) -> Self {
        Self {
            timing,
            table: ButtonTable::new(),
            combinations: CombinationDetector::default(),
            bindings,
        }
    }

    pub fn timing(&self) -> &PressTiming {
        &self.timing
    }

    pub fn table(&self) -> &ButtonTable {
        &self.table
    }

    pub fn writing_mode(&self) -> bool {
        self.combinations.flag(CombinationId::WritingMode).toggled
    }

    pub fn snapshot(&self) -> ButtonSnapshot {
        ButtonSnapshot {
            pressed: self.table.pressed().into_iter().map(|(b, _)| b).collect(),
            writing_mode: self.writing_mode(),
        }
    }

    pub fn handle(
        &mut self,
        button: LogicalButton,
        transition: KeyTransition,
        timestamp: Timestamp,
    ) -> Vec<InputSignal> {
        let slot = self.table.slot(button);
        if let Some(last) = slot.last_event
            && timestamp < last
        {
            tracing::debug!(%button, %timestamp, %last, "Dropping out-of-order button event");
            return Vec::new();
        }

        match transition {
            KeyTransition::Down => self.on_down(button, timestamp),
            KeyTransition::Up => self.on_up(button, timestamp),
        }
    }

    /// Long-press watchdog. Call at least every poll interval.
    pub fn poll(&mut self, now: Timestamp) -> Vec<InputSignal> {
        let long_ms = self.timing.long_press_min_ms as i64;
        let expired: Vec<_> = self
            .table
            .pressed()
            .into_iter()
            .filter(|(_, since)| (now - *since).num_milliseconds() > long_ms)
            .collect();

        let mut signals = Vec::new();
        for (button, since) in expired {
            let held_ms = (now - since).num_milliseconds();
            self.table.slot_mut(button).state = ButtonState::Released;
            tracing::debug!(%button, held_ms, "Long press detected while held");
            self.push_release(&mut signals, button, PressKind::LongPress, held_ms, true, now);
        }

        if !signals.is_empty() {
            self.evaluate_combinations(&mut signals, now);
        }
        signals
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    fn on_down(&mut self, button: LogicalButton, timestamp: Timestamp) -> Vec<InputSignal> {
        let slot = self.table.slot_mut(button);
        if slot.state.is_pressed() {
            return Vec::new();
        }
        slot.state = ButtonState::Pressed { since: timestamp };
        slot.last_event = Some(timestamp);

        let mut signals = vec![InputSignal::ButtonPressed { button, timestamp }];
        self.push_actions(&mut signals, ButtonTrigger::Press(button), timestamp);
        self.evaluate_combinations(&mut signals, timestamp);
        signals
    }

    fn on_up(&mut self, button: LogicalButton, timestamp: Timestamp) -> Vec<InputSignal> {
        let slot = self.table.slot_mut(button);
        let ButtonState::Pressed { since } = slot.state else {
            return Vec::new();
        };
        slot.state = ButtonState::Released;
        slot.last_event = Some(timestamp);

        let held_ms = (timestamp - since).num_milliseconds();
        let kind = PressKind::classify(held_ms, &self.timing);

        let mut signals = Vec::new();
        self.push_release(&mut signals, button, kind, held_ms, false, timestamp);
        self.evaluate_combinations(&mut signals, timestamp);
        signals
    }

    fn push_release(
        &self,
        signals: &mut Vec<InputSignal>,
        button: LogicalButton,
        kind: PressKind,
        held_ms: i64,
        synthesized: bool,
        timestamp: Timestamp,
    ) {
        signals.push(InputSignal::ButtonReleased {
            button,
            kind,
            held_ms,
            synthesized,
            timestamp,
        });
        self.push_actions(signals, ButtonTrigger::Release(button, kind), timestamp);
    }

    fn evaluate_combinations(&mut self, signals: &mut Vec<InputSignal>, timestamp: Timestamp) {
        for signal in self.combinations.evaluate(&self.table, timestamp) {
            let trigger = match &signal {
                InputSignal::CombinationTriggered { combination, .. } => {
                    Some(ButtonTrigger::Combination(*combination))
                }
                _ => None,
            };
            signals.push(signal);
            if let Some(trigger) = trigger {
                self.push_actions(signals, trigger, timestamp);
            }
        }
    }

    fn push_actions(
        &self,
        signals: &mut Vec<InputSignal>,
        trigger: ButtonTrigger,
        timestamp: Timestamp,
    ) {
        signals.extend(
            self.bindings
                .actions_for(trigger)
                .map(|action| InputSignal::ActionRequested { action, timestamp }),
        );
    }
}
