//! Raw input events
//!
//! This module provides:
//! - **Events**: classified keystrokes and button transitions
//! - **Codes**: Linux key-code tables (device buttons, word-counting classes)
//! - **Decode**: parsing of kernel `input_event` frames
//! - **Device**: async reader tasks, one per input device

pub mod codes;
mod decode;
mod device;
mod error;
mod event;

pub use decode::{FrameLayout, RawFrame};
pub use device::{DeviceReader, spawn_reader};
pub use error::{DecodeError, DeviceError};
pub use event::{
    CharClass, DeviceId, InputEvent, KeyTransition, LogicalButton, SourceEvent, Timestamp, now,
};
