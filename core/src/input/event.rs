use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;
use std::fmt;

/// Instant of an input event together with the local UTC offset in force at
/// that instant. Ordering and gaps compare instants; calendar days come from
/// the local date.
pub type Timestamp = DateTime<FixedOffset>;

/// Current wall-clock time with the local offset
pub fn now() -> Timestamp {
    Local::now().fixed_offset()
}

/// Keyboard key classes that matter to word counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Letters and digits
    Alphanumeric,
    /// Space and enter
    Separator,
    /// Punctuation, modifiers, navigation keys
    Other,
}

/// Logical buttons on the device body. Several physical devices may report
/// the same logical button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalButton {
    Power,
    Home,
    PageLeft,
    PageRight,
}

impl LogicalButton {
    pub const ALL: [LogicalButton; 4] = [
        LogicalButton::Power,
        LogicalButton::Home,
        LogicalButton::PageLeft,
        LogicalButton::PageRight,
    ];

    /// Status record name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalButton::Power => "power",
            LogicalButton::Home => "home",
            LogicalButton::PageLeft => "page_left",
            LogicalButton::PageRight => "page_right",
        }
    }
}

impl fmt::Display for LogicalButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTransition {
    Down,
    Up,
}

/// Index of the physical device an event came from (position in the config list).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceId(pub usize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

/// A classified raw event, ready for the tracker or the button machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Key-down on a keyboard key
    Keystroke {
        timestamp: Timestamp,
        class: CharClass,
    },
    Button {
        timestamp: Timestamp,
        button: LogicalButton,
        transition: KeyTransition,
    },
}

impl InputEvent {
    pub fn timestamp(&self) -> Timestamp {
        match self {
            InputEvent::Keystroke { timestamp, .. } | InputEvent::Button { timestamp, .. } => {
                *timestamp
            }
        }
    }
}

/// An event tagged with the device that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceEvent {
    pub device: DeviceId,
    pub event: InputEvent,
}
