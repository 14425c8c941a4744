//! Error types for configuration, status and lifecycle operations

use std::path::PathBuf;
use thiserror::Error;

use crate::input::DeviceError;

/// Errors during configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("failed to serialize configuration")]
    Serialize(#[from] toml::ser::Error),

    #[error("idle threshold must be greater than zero")]
    ZeroIdleThreshold,

    #[error("poll interval {value}ms outside 1..={max}ms")]
    PollInterval { value: u64, max: u64 },

    #[error("short press limit ({short}ms) must be below long press limit ({long}ms)")]
    PressTiming { short: u64, long: u64 },

    #[error("no input devices configured")]
    NoDevices,
}

/// Errors while registering a status publisher
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("failed to create status directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write status record {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from `Quill::init`. Anything registered before the failure has
/// already been torn down when one of these is returned.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("invalid configuration")]
    Config(#[from] ConfigError),

    #[error("failed to register status publisher")]
    Status(#[from] StatusError),

    #[error("failed to open required input device")]
    Device(#[from] DeviceError),
}
