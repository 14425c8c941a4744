pub mod achievements;
pub mod actions;
pub mod buttons;
pub mod context;
pub mod debug_log;
pub mod input;
pub mod lifecycle;
pub mod service;
pub mod signals;
pub mod status;
pub mod tracker;

// Re-exports for convenience
pub use achievements::{
    AchievementProgress, AchievementTier, CHRONICLE_TIERS, NextTier, SCRIPTORIUM_TIERS, evaluate,
    tiers_for,
};
pub use actions::{ActionDispatcher, ActionSignalHandler, CommandDispatcher, LoggingDispatcher};
pub use buttons::{ButtonSnapshot, ButtonStateMachine, CombinationId, PressKind};
pub use context::{AppConfig, AppConfigExt, ConfigError, LifecycleError};
pub use debug_log::DiagnosticLog;
pub use input::{CharClass, InputEvent, KeyTransition, LogicalButton, SourceEvent, Timestamp};
pub use lifecycle::{Quill, QuillHooks};
pub use service::{InputService, ServiceHandle};
pub use signals::{InputSignal, SignalHandler};
pub use status::{
    FileStatusPublisher, MemoryStatusPublisher, StatsReport, StatusPublisher, StatusSignalHandler,
};
pub use tracker::{Milestone, SessionTracker, StatsSnapshot, WritingStats};
