//! Writing achievements
//!
//! Pure mapping from lifetime word count to a title and the distance to the
//! next one. Tier tables are compile-time constants sorted by threshold, with
//! the first threshold at zero.

use quill_types::TierTableKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementTier {
    pub threshold: u64,
    pub title: &'static str,
    pub description: &'static str,
}

impl AchievementTier {
    pub const fn new(threshold: u64, title: &'static str, description: &'static str) -> Self {
        Self {
            threshold,
            title,
            description,
        }
    }
}

pub static SCRIPTORIUM_TIERS: [AchievementTier; 9] = [
    AchievementTier::new(0, "Apprentice Scribe", "Just beginning the journey"),
    AchievementTier::new(100, "Novice Writer", "The quill feels natural"),
    AchievementTier::new(500, "Journeyman Wordsmith", "Words flow with purpose"),
    AchievementTier::new(1_000, "Master Scrivener", "A thousand words of wisdom"),
    AchievementTier::new(5_000, "Literary Artisan", "Crafting tales with skill"),
    AchievementTier::new(10_000, "Chronicle Keeper", "Ten thousand words recorded"),
    AchievementTier::new(25_000, "Master of Manuscripts", "A library of thoughts"),
    AchievementTier::new(50_000, "Sage of the Scriptorium", "Wisdom flows from thy quill"),
    AchievementTier::new(100_000, "Grand Chronicler", "A hundred thousand words eternal"),
];

pub static CHRONICLE_TIERS: [AchievementTier; 5] = [
    AchievementTier::new(0, "Apprentice Scribe", "Every chronicle starts with a blank page"),
    AchievementTier::new(1_000, "Apprentice Scribe", "The first thousand words are written"),
    AchievementTier::new(10_000, "Journeyman Wordsmith", "Ten thousand words and counting"),
    AchievementTier::new(50_000, "Master Illuminator", "Fifty thousand words illuminated"),
    AchievementTier::new(100_000, "Grand Chronicler", "Glory eternal"),
];

pub fn tiers_for(kind: TierTableKind) -> &'static [AchievementTier] {
    match kind {
        TierTableKind::Scriptorium => &SCRIPTORIUM_TIERS,
        TierTableKind::Chronicle => &CHRONICLE_TIERS,
    }
}

/// First threshold is zero and thresholds strictly increase.
pub fn is_well_formed(tiers: &[AchievementTier]) -> bool {
    tiers.first().is_some_and(|t| t.threshold == 0)
        && tiers.windows(2).all(|w| w[0].threshold < w[1].threshold)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NextTier<'a> {
    Next {
        tier: &'a AchievementTier,
        remaining: u64,
    },
    MaxReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AchievementProgress<'a> {
    pub level: usize,
    pub current: &'a AchievementTier,
    pub next: NextTier<'a>,
}

impl AchievementProgress<'_> {
    pub fn remaining(&self) -> Option<u64> {
        match self.next {
            NextTier::Next { remaining, .. } => Some(remaining),
            NextTier::MaxReached => None,
        }
    }
}

/// Current tier is the highest one whose threshold is at most `words_total`.
///
/// Returns None only for an empty table.
pub fn evaluate(words_total: u64, tiers: &[AchievementTier]) -> Option<AchievementProgress<'_>> {
    debug_assert!(tiers.is_empty() || is_well_formed(tiers));

    let level = tiers
        .iter()
        .rposition(|tier| tier.threshold <= words_total)?;

    let next = match tiers.get(level + 1) {
        Some(tier) => NextTier::Next {
            tier,
            remaining: tier.threshold - words_total,
        },
        None => NextTier::MaxReached,
    };

    Some(AchievementProgress {
        level,
        current: &tiers[level],
        next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    static ABC: [AchievementTier; 3] = [
        AchievementTier::new(0, "A", ""),
        AchievementTier::new(100, "B", ""),
        AchievementTier::new(1000, "C", ""),
    ];

    #[test]
    fn test_between_tiers() {
        let progress = evaluate(150, &ABC).unwrap();
        assert_eq!(progress.current.title, "B");
        match progress.next {
            NextTier::Next { tier, remaining } => {
                assert_eq!(tier.title, "C");
                assert_eq!(remaining, 850);
            }
            NextTier::MaxReached => panic!("expected a next tier"),
        }
    }

    #[test]
    fn test_top_tier_has_no_next() {
        let progress = evaluate(1000, &ABC).unwrap();
        assert_eq!(progress.current.title, "C");
        assert_eq!(progress.next, NextTier::MaxReached);
        assert_eq!(progress.remaining(), None);
    }

    #[test]
    fn test_exact_threshold_and_zero() {
        assert_eq!(evaluate(100, &ABC).unwrap().current.title, "B");
        assert_eq!(evaluate(99, &ABC).unwrap().remaining(), Some(1));
        assert_eq!(evaluate(0, &ABC).unwrap().level, 0);
    }

    #[test]
    fn test_empty_table() {
        assert!(evaluate(10, &[]).is_none());
    }

    #[test]
    fn test_builtin_tables_are_well_formed() {
        assert!(is_well_formed(&SCRIPTORIUM_TIERS));
        assert!(is_well_formed(&CHRONICLE_TIERS));
        assert!(!is_well_formed(&[AchievementTier::new(5, "x", "")]));
    }

    #[test]
    fn test_scriptorium_ladder() {
        let progress = evaluate(12_345, tiers_for(TierTableKind::Scriptorium)).unwrap();
        assert_eq!(progress.current.title, "Chronicle Keeper");
        assert_eq!(progress.remaining(), Some(25_000 - 12_345));

        let top = evaluate(250_000, tiers_for(TierTableKind::Scriptorium)).unwrap();
        assert_eq!(top.current.title, "Grand Chronicler");
        assert_eq!(top.next, NextTier::MaxReached);
    }

    #[test]
    fn test_chronicle_ladder() {
        let progress = evaluate(60_000, tiers_for(TierTableKind::Chronicle)).unwrap();
        assert_eq!(progress.current.title, "Master Illuminator");
        assert_eq!(progress.remaining(), Some(40_000));
    }
}
