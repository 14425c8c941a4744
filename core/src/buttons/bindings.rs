//! Button → action bindings

use quill_types::Action;

use super::combination::CombinationId;
use super::press::PressKind;
use crate::input::LogicalButton;

/// When a binding fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonTrigger {
    /// On the down transition
    Press(LogicalButton),
    /// On release with the given classification (watchdog releases included)
    Release(LogicalButton, PressKind),
    Combination(CombinationId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub trigger: ButtonTrigger,
    pub action: Action,
}

#[derive(Debug, Clone)]
pub struct Bindings {
    bindings: Vec<Binding>,
}

impl Default for Bindings {
    fn default() -> Self {
        use ButtonTrigger::*;
        use LogicalButton::*;

        Self::new(vec![
            Binding {
                trigger: Release(Power, PressKind::ShortPress),
                action: Action::PowerMenu,
            },
            Binding {
                trigger: Release(Power, PressKind::LongPress),
                action: Action::Sleep,
            },
            Binding {
                trigger: Press(Home),
                action: Action::ReturnToMenu,
            },
            Binding {
                trigger: Press(PageLeft),
                action: Action::PageUp,
            },
            Binding {
                trigger: Press(PageRight),
                action: Action::PageDown,
            },
            Binding {
                trigger: Combination(CombinationId::Screenshot),
                action: Action::Screenshot,
            },
            Binding {
                trigger: Combination(CombinationId::WritingMode),
                action: Action::ToggleWritingMode,
            },
        ])
    }
}

impl Bindings {
    pub fn new(bindings: Vec<Binding>) -> Self {
        Self { bindings }
    }

    pub fn actions_for(&self, trigger: ButtonTrigger) -> impl Iterator<Item = Action> + '_ {
        self.bindings
            .iter()
            .filter(move |b| b.trigger == trigger)
            .map(|b| b.action)
    }
}
