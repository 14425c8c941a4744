//! Error types for input devices

use std::path::PathBuf;
use thiserror::Error;

/// Errors while decoding a raw `input_event` frame
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("short input frame: expected {expected} bytes, got {actual}")]
    ShortFrame { expected: usize, actual: usize },
}

/// Errors while opening or reading an input device
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("failed to open input device {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read from input device {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
