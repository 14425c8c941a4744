use serde::Serialize;
use std::fmt::Write as _;

use crate::achievements::{self, AchievementProgress, AchievementTier, NextTier};
use crate::tracker::StatsSnapshot;

/// Words on a printed page
pub const WORDS_PER_PAGE: u64 = 250;

/// Machine-readable statistics record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub stats: StatsSnapshot,
    pub pages: u64,
    pub achievement: Option<AchievementProgress<'static>>,
}

impl StatsReport {
    pub fn new(stats: StatsSnapshot, tiers: &'static [AchievementTier]) -> Self {
        let achievement = achievements::evaluate(stats.words_total, tiers);
        Self {
            pages: stats.words_total / WORDS_PER_PAGE,
            stats,
            achievement,
        }
    }

    /// Plain-text summary for terminals
    pub fn render(&self) -> String {
        let s = &self.stats;
        let mut out = String::new();

        let _ = writeln!(out, "Today:    {} words, {} keystrokes", s.words_today, s.keystrokes_today);
        let _ = writeln!(
            out,
            "Total:    {} words ({} pages), {} keystrokes",
            s.words_total, self.pages, s.keystrokes_total
        );
        let _ = writeln!(out, "Sessions: {}", s.sessions_total);
        if s.session_active {
            let _ = writeln!(
                out,
                "Session:  active for {}m {}s",
                s.session_elapsed_secs / 60,
                s.session_elapsed_secs % 60
            );
        }
        let _ = writeln!(
            out,
            "Streak:   {} day{}",
            s.streak_days,
            if s.streak_days == 1 { "" } else { "s" }
        );

        if let Some(progress) = &self.achievement {
            let _ = writeln!(
                out,
                "Title:    {} ({})",
                progress.current.title, progress.current.description
            );
            match progress.next {
                NextTier::Next { tier, remaining } => {
                    let _ = writeln!(out, "Next:     {} in {} words", tier.title, remaining);
                }
                NextTier::MaxReached => {
                    let _ = writeln!(out, "Next:     highest title reached");
                }
            }
        }

        out
    }
}
