mod background_tasks;
mod config;
mod error;

pub use background_tasks::BackgroundTasks;
pub use config::{
    Action, ActionCommands, AppConfig, AppConfigExt, DeviceConfig, DeviceRole,
    MAX_POLL_INTERVAL_MS, PressTiming, TierTableKind, WordCountingStrategy, config_path,
};
pub use error::{ConfigError, LifecycleError, StatusError};
