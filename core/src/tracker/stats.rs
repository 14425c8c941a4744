use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

use crate::input::Timestamp;

/// Live writing counters. Created zeroed, mutated only by the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WritingStats {
    pub keystrokes_total: u64,
    pub keystrokes_today: u64,
    pub words_total: u64,
    pub words_today: u64,
    pub sessions_total: u64,
    pub streak_days: u32,
    pub session_active: bool,
    pub session_start: Option<Timestamp>,
    pub last_event: Option<Timestamp>,
    /// Boundary detection: an alphanumeric key was seen since the last separator
    pub in_word: bool,
    /// Calendar day of the last accepted event
    pub last_day: Option<NaiveDate>,
}

/// Immutable copy of the counters handed to readers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub keystrokes_total: u64,
    pub keystrokes_today: u64,
    pub words_total: u64,
    pub words_today: u64,
    pub sessions_total: u64,
    pub streak_days: u32,
    pub session_active: bool,
    pub session_start: Option<Timestamp>,
    pub last_event: Option<Timestamp>,
    /// Seconds since the current session started; 0 when no session is active
    pub session_elapsed_secs: u64,
}

impl StatsSnapshot {
    pub(crate) fn capture(stats: &WritingStats, now: Timestamp) -> Self {
        let session_elapsed_secs = match (stats.session_active, stats.session_start) {
            (true, Some(start)) => now.signed_duration_since(start).num_seconds().max(0) as u64,
            _ => 0,
        };

        Self {
            keystrokes_total: stats.keystrokes_total,
            keystrokes_today: stats.keystrokes_today,
            words_total: stats.words_total,
            words_today: stats.words_today,
            sessions_total: stats.sessions_total,
            streak_days: stats.streak_days,
            session_active: stats.session_active,
            session_start: stats.session_start,
            last_event: stats.last_event,
            session_elapsed_secs,
        }
    }
}

/// Word-count milestones announced while writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    /// Words today crossed a multiple of 100
    Hundred(u64),
    /// Words today reached exactly 1000
    ThousandWordScribe,
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Milestone::Hundred(words) => write!(f, "Huzzah! {words} words"),
            Milestone::ThousandWordScribe => f.write_str("Achievement unlocked: Thousand Word Scribe"),
        }
    }
}
