use hashbrown::HashMap;

use crate::input::{LogicalButton, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Released,
    Pressed {
        since: Timestamp,
    },
}

impl ButtonState {
    pub fn is_pressed(&self) -> bool {
        matches!(self, ButtonState::Pressed { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonSlot {
    pub state: ButtonState,
    pub last_event: Option<Timestamp>,
}

/// One slot per logical button, shared by every device that reports it.
#[derive(Debug, Clone)]
pub struct ButtonTable {
    slots: HashMap<LogicalButton, ButtonSlot>,
}

impl Default for ButtonTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonTable {
    pub fn new() -> Self {
        Self {
            slots: LogicalButton::ALL
                .iter()
                .map(|&button| (button, ButtonSlot::default()))
                .collect(),
        }
    }

    pub fn slot(&self, button: LogicalButton) -> ButtonSlot {
        self.slots.get(&button).copied().unwrap_or_default()
    }

    pub(crate) fn slot_mut(&mut self, button: LogicalButton) -> &mut ButtonSlot {
        self.slots.entry(button).or_default()
    }

    pub fn is_pressed(&self, button: LogicalButton) -> bool {
        self.slot(button).state.is_pressed()
    }

    /// Buttons currently held, with their press time
    pub fn pressed(&self) -> Vec<(LogicalButton, Timestamp)> {
        let mut held: Vec<_> = self
            .slots
            .iter()
            .filter_map(|(&button, slot)| match slot.state {
                ButtonState::Pressed { since } => Some((button, since)),
                ButtonState::Released => None,
            })
            .collect();
        held.sort_by_key(|(button, _)| *button);
        held
    }
}
