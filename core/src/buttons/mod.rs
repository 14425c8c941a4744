//! Physical button handling
//!
//! Button transitions from every input device are merged into one logical
//! state table, classified into short / medium / long presses, checked for
//! multi-button combinations and mapped to actions.

mod bindings;
mod combination;
mod machine;
mod press;
mod state;


pub use bindings::{Binding, Bindings, ButtonTrigger};
pub use combination::{
    Combination, CombinationDetector, CombinationFlag, CombinationId, DEFAULT_COMBINATIONS,
};
pub use machine::{ButtonSnapshot, ButtonStateMachine};
pub use press::PressKind;
pub use state::{ButtonSlot, ButtonState, ButtonTable};
