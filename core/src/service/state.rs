use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tokio::sync::RwLock;

use crate::achievements::AchievementTier;
use crate::buttons::ButtonSnapshot;
use crate::tracker::StatsSnapshot;

// ─────────────────────────────────────────────────────────────────────────────
// Shared State
// ─────────────────────────────────────────────────────────────────────────────

/// Read side of the service. Written only by the service loop.
pub struct SharedState {
    pub stats: RwLock<StatsSnapshot>,
    pub buttons: RwLock<ButtonSnapshot>,
    pub tiers: &'static [AchievementTier],
    /// Set to stop the service and every reader task
    pub shutdown: Arc<AtomicBool>,
    /// Cleared when the service loop exits
    pub running: AtomicBool,
}

impl SharedState {
    pub fn new(tiers: &'static [AchievementTier], shutdown: Arc<AtomicBool>) -> Self {
        Self {
            stats: RwLock::new(StatsSnapshot::default()),
            buttons: RwLock::new(ButtonSnapshot {
                pressed: Vec::new(),
                writing_mode: false,
            }),
            tiers,
            shutdown,
            running: AtomicBool::new(true),
        }
    }
}
