use quill_types::PressTiming;
use serde::Serialize;
use std::fmt;

/// Classification of a completed press by how long it was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PressKind {
    ShortPress,
    MediumPress,
    LongPress,
}

impl PressKind {
    pub fn classify(held_ms: i64, timing: &PressTiming) -> Self {
        if held_ms < timing.short_press_max_ms as i64 {
            PressKind::ShortPress
        } else if held_ms > timing.long_press_min_ms as i64 {
            PressKind::LongPress
        } else {
            PressKind::MediumPress
        }
    }
}

impl fmt::Display for PressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PressKind::ShortPress => "short press",
            PressKind::MediumPress => "medium press",
            PressKind::LongPress => "long press",
        })
    }
}
