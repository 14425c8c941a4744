use chrono::NaiveDate;
use quill_types::Action;

use crate::buttons::{CombinationId, PressKind};
use crate::input::{LogicalButton, Timestamp};
use crate::tracker::Milestone;

/// Signals emitted by the tracker and the button machine.
/// These represent "interesting things that happened" at a higher level
/// than raw input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSignal {
    // Session lifecycle
    SessionStarted {
        /// 1-based session number (equals `sessions_total` after the start)
        session: u64,
        timestamp: Timestamp,
    },
    /// Emitted by the idle watchdog, never by keystrokes
    SessionClosed {
        session: u64,
        duration_secs: i64,
        timestamp: Timestamp,
    },
    DayRolledOver {
        day: NaiveDate,
        streak_days: u32,
        timestamp: Timestamp,
    },
    MilestoneReached {
        milestone: Milestone,
        words_today: u64,
        timestamp: Timestamp,
    },

    // Buttons
    ButtonPressed {
        button: LogicalButton,
        timestamp: Timestamp,
    },
    ButtonReleased {
        button: LogicalButton,
        kind: PressKind,
        held_ms: i64,
        /// True when the long-press watchdog released the button
        synthesized: bool,
        timestamp: Timestamp,
    },
    CombinationTriggered {
        combination: CombinationId,
        timestamp: Timestamp,
    },
    WritingModeChanged {
        enabled: bool,
        timestamp: Timestamp,
    },

    // Outbound
    ActionRequested {
        action: Action,
        timestamp: Timestamp,
    },
}

impl InputSignal {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            InputSignal::SessionStarted { timestamp, .. }
            | InputSignal::SessionClosed { timestamp, .. }
            | InputSignal::DayRolledOver { timestamp, .. }
            | InputSignal::MilestoneReached { timestamp, .. }
            | InputSignal::ButtonPressed { timestamp, .. }
            | InputSignal::ButtonReleased { timestamp, .. }
            | InputSignal::CombinationTriggered { timestamp, .. }
            | InputSignal::WritingModeChanged { timestamp, .. }
            | InputSignal::ActionRequested { timestamp, .. } => *timestamp,
        }
    }

    /// One-line human description for the diagnostic log
    pub fn describe(&self) -> String {
        match self {
            InputSignal::SessionStarted { session, .. } => {
                format!("Writing session {session} begins")
            }
            InputSignal::SessionClosed {
                session,
                duration_secs,
                ..
            } => format!("Writing session {session} idle after {}m", duration_secs / 60),
            InputSignal::DayRolledOver {
                day, streak_days, ..
            } => format!("New writing day {day} (streak {streak_days})"),
            InputSignal::MilestoneReached {
                milestone,
                words_today,
                ..
            } => format!("{milestone}: {words_today} words today"),
            InputSignal::ButtonPressed { button, .. } => format!("{button} button pressed"),
            InputSignal::ButtonReleased {
                button,
                kind,
                held_ms,
                synthesized,
                ..
            } => {
                if *synthesized {
                    format!("{button} button {kind} detected after {held_ms}ms")
                } else {
                    format!("{button} button released ({kind}, {held_ms}ms)")
                }
            }
            InputSignal::CombinationTriggered { combination, .. } => {
                format!("{combination} combination detected")
            }
            InputSignal::WritingModeChanged { enabled, .. } => {
                format!("Writing mode {}", if *enabled { "ON" } else { "OFF" })
            }
            InputSignal::ActionRequested { action, .. } => format!("Action requested: {action}"),
        }
    }
}
