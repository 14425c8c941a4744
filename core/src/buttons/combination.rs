//! Multi-button combinations
//!
//! A combination fires on the rising edge into "all members pressed". The
//! latch re-arms only once every member has been released, so holding the
//! set, or toggling one member while the others stay down, fires nothing.

use serde::Serialize;
use std::fmt;

use super::state::ButtonTable;
use crate::input::{LogicalButton, Timestamp};
use crate::signals::InputSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinationId {
    /// Power + Home
    Screenshot,
    /// Both page buttons
    WritingMode,
}

impl fmt::Display for CombinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CombinationId::Screenshot => "Screenshot",
            CombinationId::WritingMode => "Writing mode",
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Combination {
    pub id: CombinationId,
    pub members: &'static [LogicalButton],
}

pub static DEFAULT_COMBINATIONS: [Combination; 2] = [
    Combination {
        id: CombinationId::Screenshot,
        members: &[LogicalButton::Power, LogicalButton::Home],
    },
    Combination {
        id: CombinationId::WritingMode,
        members: &[LogicalButton::PageLeft, LogicalButton::PageRight],
    },
];

/// Persistent per-combination flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombinationFlag {
    /// Fired and not yet re-armed
    pub latched: bool,
    /// Flipped on every firing (writing mode on/off)
    pub toggled: bool,
}

#[derive(Debug, Clone)]
pub struct CombinationDetector {
    combinations: Vec<(Combination, CombinationFlag)>,
}

impl Default for CombinationDetector {
    fn default() -> Self {
        Self::new(&DEFAULT_COMBINATIONS)
    }
}

impl CombinationDetector {
    pub fn new(combinations: &[Combination]) -> Self {
        Self {
            combinations: combinations
                .iter()
                .map(|&c| (c, CombinationFlag::default()))
                .collect(),
        }
    }

    pub fn flag(&self, id: CombinationId) -> CombinationFlag {
        self.combinations
            .iter()
            .find(|(c, _)| c.id == id)
            .map(|(_, flag)| *flag)
            .unwrap_or_default()
    }

    /// Re-check every combination against the table after a transition.
    pub fn evaluate(&mut self, table: &ButtonTable, timestamp: Timestamp) -> Vec<InputSignal> {
        let mut signals = Vec::new();

        for (combination, flag) in &mut self.combinations {
            let all_pressed = combination.members.iter().all(|&b| table.is_pressed(b));
            let none_pressed = combination.members.iter().all(|&b| !table.is_pressed(b));

            if all_pressed && !flag.latched {
                flag.latched = true;
                flag.toggled = !flag.toggled;
                tracing::info!(combination = %combination.id, "Combination detected");

                signals.push(InputSignal::CombinationTriggered {
                    combination: combination.id,
                    timestamp,
                });
                if combination.id == CombinationId::WritingMode {
                    signals.push(InputSignal::WritingModeChanged {
                        enabled: flag.toggled,
                        timestamp,
                    });
                }
            } else if none_pressed && flag.latched {
                flag.latched = false;
            }
        }

        signals
    }
}
