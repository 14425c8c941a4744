//! Shared configuration types for Quill
//!
//! This crate contains the serializable types that are shared between the
//! engine (quill-core) and the command-line daemon (quill-cli).

use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Discrete named requests handed to the action dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    PowerMenu,
    Screenshot,
    Sleep,
    ReturnToMenu,
    ToggleWritingMode,
    PageUp,
    PageDown,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::PowerMenu,
        Action::Screenshot,
        Action::Sleep,
        Action::ReturnToMenu,
        Action::ToggleWritingMode,
        Action::PageUp,
        Action::PageDown,
    ];

    /// Literal written to the `last_action` status record
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::PowerMenu => "power_menu",
            Action::Screenshot => "screenshot",
            Action::Sleep => "sleep",
            Action::ReturnToMenu => "return_to_menu",
            Action::ToggleWritingMode => "toggle_writing_mode",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracker Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Policy used to turn keystrokes into a word count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordCountingStrategy {
    /// `floor(keystrokes / 6)`: five characters plus one separator per word
    #[default]
    ApproximateRatio,
    /// A separator after at least one alphanumeric key closes a word
    BoundaryDetection,
}

/// Which achievement ladder the evaluator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierTableKind {
    /// Nine tiers from Apprentice Scribe to Grand Chronicler
    #[default]
    Scriptorium,
    /// Five coarse tiers at 0 / 1k / 10k / 50k / 100k words
    Chronicle,
}

// ─────────────────────────────────────────────────────────────────────────────
// Button Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Press duration thresholds in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PressTiming {
    /// Releases strictly shorter than this are short presses
    #[serde(default = "default_short_press_max_ms")]
    pub short_press_max_ms: u64,
    /// Holds strictly longer than this are long presses
    #[serde(default = "default_long_press_min_ms")]
    pub long_press_min_ms: u64,
}

fn default_short_press_max_ms() -> u64 {
    500
}

fn default_long_press_min_ms() -> u64 {
    2000
}

impl Default for PressTiming {
    fn default() -> Self {
        Self {
            short_press_max_ms: default_short_press_max_ms(),
            long_press_min_ms: default_long_press_min_ms(),
        }
    }
}

/// What a device node carries. Button devices only report the body buttons;
/// every key-down on a keyboard counts as a keystroke.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceRole {
    #[default]
    Buttons,
    Keyboard,
}

/// One input device the daemon reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub path: String,
    #[serde(default)]
    pub role: DeviceRole,
    /// Optional devices (e.g. a hot-plugged keyboard) may be missing at startup
    #[serde(default)]
    pub optional: bool,
}

impl DeviceConfig {
    /// Required button device
    pub fn buttons(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            role: DeviceRole::Buttons,
            optional: false,
        }
    }

    /// Optional keyboard
    pub fn keyboard(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            role: DeviceRole::Keyboard,
            optional: true,
        }
    }
}

/// External command run for each action. Unset actions are only logged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionCommands {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_menu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to_menu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_writing_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_down: Option<String>,
}

impl ActionCommands {
    pub fn command_for(&self, action: Action) -> Option<&str> {
        let command = match action {
            Action::PowerMenu => &self.power_menu,
            Action::Screenshot => &self.screenshot,
            Action::Sleep => &self.sleep,
            Action::ReturnToMenu => &self.return_to_menu,
            Action::ToggleWritingMode => &self.toggle_writing_mode,
            Action::PageUp => &self.page_up,
            Action::PageDown => &self.page_down,
        };
        command.as_deref().filter(|c| !c.trim().is_empty())
    }

    /// Commands used on the e-reader firmware
    pub fn firmware_defaults() -> Self {
        Self {
            power_menu: Some("/runtime/1-ui/menu/power-menu.sh".to_string()),
            screenshot: Some(
                "sh -c 'fbgrab /sdcard/screenshot_$(date +%Y%m%d_%H%M%S).png'".to_string(),
            ),
            sleep: Some("sh -c 'echo mem > /sys/power/state'".to_string()),
            return_to_menu: Some(
                "sh -c 'pkill -f vim; exec /runtime/1-ui/menu/nook-menu.sh'".to_string(),
            ),
            toggle_writing_mode: Some(
                "/runtime/4-hardware/power/power-optimizer.sh balanced".to_string(),
            ),
            page_up: Some(
                "sh -c 'printf \"\\002\" > /proc/$(pgrep -x vim)/fd/0'".to_string(),
            ),
            page_down: Some(
                "sh -c 'printf \"\\006\" > /proc/$(pgrep -x vim)/fd/0'".to_string(),
            ),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Largest gap between keystrokes that still belongs to one session
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,
    #[serde(default)]
    pub word_counting: WordCountingStrategy,
    #[serde(default)]
    pub achievement_table: TierTableKind,
    /// Watchdog wake interval; bounds long-press latency and shutdown latency
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_status_directory")]
    pub status_directory: String,
    #[serde(default = "default_diagnostic_log")]
    pub diagnostic_log: String,
    #[serde(default)]
    pub press: PressTiming,
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceConfig>,
    #[serde(default = "ActionCommands::firmware_defaults")]
    pub action_commands: ActionCommands,
}

pub const MAX_POLL_INTERVAL_MS: u64 = 100;

fn default_idle_threshold_secs() -> u64 {
    1800
}

fn default_poll_interval_ms() -> u64 {
    MAX_POLL_INTERVAL_MS
}

fn default_devices() -> Vec<DeviceConfig> {
    vec![
        // power + home
        DeviceConfig::buttons("/dev/input/event0"),
        // page turn buttons
        DeviceConfig::buttons("/dev/input/event1"),
        DeviceConfig::keyboard("/dev/input/event2"),
    ]
}

fn default_status_directory() -> String {
    "/var/lib/quill/status".to_string()
}

fn default_diagnostic_log() -> String {
    "/var/log/quill.log".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold_secs(),
            word_counting: WordCountingStrategy::default(),
            achievement_table: TierTableKind::default(),
            press: PressTiming::default(),
            poll_interval_ms: default_poll_interval_ms(),
            devices: default_devices(),
            status_directory: default_status_directory(),
            diagnostic_log: default_diagnostic_log(),
            action_commands: ActionCommands::firmware_defaults(),
        }
    }
}
