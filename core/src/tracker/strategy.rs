//! Word counting policies
//!
//! Two policies exist and neither is authoritative: the ratio estimate is
//! cheap and layout-independent, boundary detection follows actual key
//! classes. The tracker holds whichever one the configuration selects.

use quill_types::WordCountingStrategy;
use std::fmt::Debug;

use super::stats::WritingStats;
use crate::input::CharClass;

/// Average word length plus one separator
pub const CHARS_PER_WORD: u64 = 6;

/// Updates word counters after a keystroke has been counted.
pub trait WordCounter: Debug + Send + Sync {
    fn strategy(&self) -> WordCountingStrategy;

    /// Called once per keystroke, after `keystrokes_*` were incremented.
    fn count(&self, class: CharClass, stats: &mut WritingStats);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ApproximateRatio;

impl WordCounter for ApproximateRatio {
    fn strategy(&self) -> WordCountingStrategy {
        WordCountingStrategy::ApproximateRatio
    }

    fn count(&self, _class: CharClass, stats: &mut WritingStats) {
        stats.words_total = stats.keystrokes_total / CHARS_PER_WORD;
        stats.words_today = stats.keystrokes_today / CHARS_PER_WORD;
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BoundaryDetection;

impl WordCounter for BoundaryDetection {
    fn strategy(&self) -> WordCountingStrategy {
        WordCountingStrategy::BoundaryDetection
    }

    fn count(&self, class: CharClass, stats: &mut WritingStats) {
        match class {
            CharClass::Alphanumeric => stats.in_word = true,
            CharClass::Separator if stats.in_word => {
                stats.words_total += 1;
                stats.words_today += 1;
                stats.in_word = false;
            }
            CharClass::Separator | CharClass::Other => {}
        }
    }
}

pub fn counter_for(strategy: WordCountingStrategy) -> Box<dyn WordCounter> {
    match strategy {
        WordCountingStrategy::ApproximateRatio => Box::new(ApproximateRatio),
        WordCountingStrategy::BoundaryDetection => Box::new(BoundaryDetection),
    }
}
