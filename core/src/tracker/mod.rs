//! Writing statistics
//!
//! Turns the keystroke stream into:
//! - **Counters**: keystrokes and words, lifetime and today
//! - **Sessions**: inferred from idle gaps
//! - **Streak**: consecutive writing days
//! - **Milestones**: word-count announcements

mod session;
mod stats;
mod strategy;


pub use session::{MILESTONE_INTERVAL, SessionTracker, THOUSAND_WORDS};
pub use stats::{Milestone, StatsSnapshot, WritingStats};
pub use strategy::{ApproximateRatio, BoundaryDetection, CHARS_PER_WORD, WordCounter, counter_for};
