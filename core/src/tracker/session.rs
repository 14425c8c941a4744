//! Writing session state machine.
//!
//! Sessions are never closed by the writer; a boundary is inferred when a
//! keystroke arrives after more than the idle threshold of silence. The day
//! counters reset on the first keystroke of each new calendar day.

use chrono::Duration;
use quill_types::{AppConfig, WordCountingStrategy};

use super::stats::{Milestone, StatsSnapshot, WritingStats};
use super::strategy::{WordCounter, counter_for};
use crate::input::{CharClass, Timestamp, now};
use crate::signals::InputSignal;

/// Words-today interval between milestone announcements
pub const MILESTONE_INTERVAL: u64 = 100;
/// Words today that unlock the Thousand Word Scribe announcement
pub const THOUSAND_WORDS: u64 = 1000;

#[derive(Debug)]
pub struct SessionTracker {
    stats: WritingStats,
    idle_threshold: Duration,
    counter: Box<dyn WordCounter>,
}

impl SessionTracker {
    pub fn new(idle_threshold: Duration, strategy: WordCountingStrategy) -> Self {
        Self {
            stats: WritingStats::default(),
            idle_threshold,
            counter: counter_for(strategy),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Duration::seconds(config.idle_threshold_secs as i64),
            config.word_counting,
        )
    }

    pub fn stats(&self) -> &WritingStats {
        &self.stats
    }

    pub fn idle_threshold(&self) -> Duration {
        self.idle_threshold
    }

    pub fn strategy(&self) -> WordCountingStrategy {
        self.counter.strategy()
    }

    /// Process one key-down.
    /// Updates the counters and returns signals for anything noteworthy.
    /// Keystrokes older than the previous one are dropped.
    pub fn ingest_event(&mut self, timestamp: Timestamp, class: CharClass) -> Vec<InputSignal> {
        if let Some(last) = self.stats.last_event
            && timestamp < last
        {
            tracing::debug!(%timestamp, %last, "Dropping out-of-order keystroke");
            return Vec::new();
        }

        let mut signals = Vec::new();

        // 1. Day rollover, on the local calendar
        let day = timestamp.date_naive();
        let new_day = match self.stats.last_day {
            None => true,
            Some(last_day) => day > last_day,
        };
        if new_day {
            self.stats.keystrokes_today = 0;
            self.stats.words_today = 0;
            // One step per detected rollover, however many days were skipped
            self.stats.streak_days += 1;
            self.stats.last_day = Some(day);
            signals.push(InputSignal::DayRolledOver {
                day,
                streak_days: self.stats.streak_days,
                timestamp,
            });
        }

        // 2. Session boundary
        let boundary = match self.stats.last_event {
            None => true,
            Some(last) => timestamp.signed_duration_since(last) > self.idle_threshold,
        };
        if !boundary && !self.stats.session_active {
            // Closed by the watchdog, but this keystroke was queued within the threshold
            self.stats.session_active = true;
        }
        if boundary {
            self.stats.sessions_total += 1;
            self.stats.session_active = true;
            self.stats.session_start = Some(timestamp);
            tracing::info!(session = self.stats.sessions_total, "A new writing session begins");
            signals.push(InputSignal::SessionStarted {
                session: self.stats.sessions_total,
                timestamp,
            });
        }

        // 3. Counters
        let words_today_before = self.stats.words_today;
        self.stats.keystrokes_total += 1;
        self.stats.keystrokes_today += 1;
        self.counter.count(class, &mut self.stats);

        // 4. Idle clock
        self.stats.last_event = Some(timestamp);

        // 5. Milestones
        signals.extend(self.check_milestones(words_today_before, timestamp));

        signals
    }

    fn check_milestones(&self, before: u64, timestamp: Timestamp) -> Vec<InputSignal> {
        let after = self.stats.words_today;
        if after <= before {
            return Vec::new();
        }

        let mut signals = Vec::new();
        let crossed = after / MILESTONE_INTERVAL;
        if crossed > before / MILESTONE_INTERVAL {
            tracing::info!(words_today = after, "Word milestone reached");
            signals.push(InputSignal::MilestoneReached {
                milestone: Milestone::Hundred(crossed * MILESTONE_INTERVAL),
                words_today: after,
                timestamp,
            });
        }
        if after == THOUSAND_WORDS {
            tracing::info!("Achievement unlocked: Thousand Word Scribe");
            signals.push(InputSignal::MilestoneReached {
                milestone: Milestone::ThousandWordScribe,
                words_today: after,
                timestamp,
            });
        }
        signals
    }

    /// Mark the session inactive once the idle threshold has passed.
    ///
    /// Called from the watchdog tick; counters are untouched and the next
    /// keystroke opens a new session exactly as the gap rule would.
    pub fn close_idle_session(&mut self, now: Timestamp) -> Option<InputSignal> {
        if !self.stats.session_active {
            return None;
        }
        let last = self.stats.last_event?;
        if now.signed_duration_since(last) <= self.idle_threshold {
            return None;
        }

        self.stats.session_active = false;
        let duration_secs = self
            .stats
            .session_start
            .map(|start| last.signed_duration_since(start).num_seconds())
            .unwrap_or(0);

        Some(InputSignal::SessionClosed {
            session: self.stats.sessions_total,
            duration_secs,
            timestamp: now,
        })
    }

    pub fn snapshot_at(&self, now: Timestamp) -> StatsSnapshot {
        StatsSnapshot::capture(&self.stats, now)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.snapshot_at(now())
    }
}
