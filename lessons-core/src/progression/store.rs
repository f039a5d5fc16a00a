//! XP, level and completed-lesson bookkeeping
//!
//! [`ProgressionStore`] is the single source of truth for a learner's
//! progression. It is an ordinary owned struct: callers pass it by `&mut`
//! to whatever needs to mutate it, or wrap it in
//! [`SharedProgression`](super::SharedProgression) when several tasks do.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// XP needed to gain one level unless configured otherwise
pub const DEFAULT_XP_PER_LEVEL: u64 = 100;

/// Effect of a single XP grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpGain {
    /// XP that was added
    pub amount: u64,
    /// Levels crossed by this grant
    pub levels_gained: u64,
    /// Stored XP after the grant
    pub xp: u64,
    /// Level after the grant
    pub level: u64,
}

impl XpGain {
    /// Level before the grant
    pub fn previous_level(&self) -> u64 {
        self.level - self.levels_gained
    }

    /// True when at least one level was crossed
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Read-only projection of progression state for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    pub xp: u64,
    pub level: u64,
    pub xp_per_level: u64,
    pub completed_lessons: BTreeSet<String>,
}

impl ProgressionSnapshot {
    /// Whole-number percentage of the way to the next level
    pub fn percent(&self) -> u8 {
        let per_level = u128::from(self.xp_per_level.max(1));
        let percent = (u128::from(self.xp) * 100 / per_level).min(100);
        percent as u8
    }

    /// Whether `lesson_id` has been completed
    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains(lesson_id)
    }
}

/// Owner of XP, level and the set of completed lessons.
///
/// Invariants:
/// - `xp < xp_per_level` after every operation
/// - `level >= 1`, never decreases
/// - `completed_lessons` only grows
#[derive(Debug, Clone)]
pub struct ProgressionStore {
    xp: u64,
    level: u64,
    xp_per_level: u64,
    completed_lessons: BTreeSet<String>,
}

impl Default for ProgressionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionStore {
    /// Fresh state: level 1, no XP, nothing completed
    pub fn new() -> Self {
        Self::with_xp_per_level(DEFAULT_XP_PER_LEVEL)
    }

    /// Fresh state with a custom level size.
    ///
    /// A level size of zero falls back to [`DEFAULT_XP_PER_LEVEL`].
    pub fn with_xp_per_level(xp_per_level: u64) -> Self {
        let xp_per_level = if xp_per_level == 0 {
            warn!(
                default = DEFAULT_XP_PER_LEVEL,
                "xp_per_level of 0 is invalid, using default"
            );
            DEFAULT_XP_PER_LEVEL
        } else {
            xp_per_level
        };

        Self {
            xp: 0,
            level: 1,
            xp_per_level,
            completed_lessons: BTreeSet::new(),
        }
    }

    /// XP carried towards the next level
    pub fn xp(&self) -> u64 {
        self.xp
    }

    /// Current level
    pub fn level(&self) -> u64 {
        self.level
    }

    /// Size of one level in XP
    pub fn xp_per_level(&self) -> u64 {
        self.xp_per_level
    }

    /// Whether `lesson_id` has been completed
    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed_lessons.contains(lesson_id)
    }

    /// Add XP, converting whole levels and keeping the remainder.
    ///
    /// A single grant may cross several levels: with 80 XP stored and a
    /// level size of 100, adding 250 gains three levels and leaves 30.
    pub fn add_xp(&mut self, amount: u64) -> XpGain {
        let per_level = u128::from(self.xp_per_level);
        let total = u128::from(self.xp) + u128::from(amount);

        // remainder < xp_per_level, so it fits back into u64
        let levels_gained = u64::try_from(total / per_level).unwrap_or(u64::MAX);
        self.xp = (total % per_level) as u64;
        self.level = self.level.saturating_add(levels_gained);

        if levels_gained > 0 {
            info!(
                level = self.level,
                levels_gained,
                xp = self.xp,
                "Level up"
            );
        } else {
            debug!(amount, xp = self.xp, level = self.level, "Added XP");
        }

        XpGain {
            amount,
            levels_gained,
            xp: self.xp,
            level: self.level,
        }
    }

    /// Record a lesson as completed and grant `xp_award` once.
    ///
    /// Returns `None` when the lesson was already recorded; repeated calls
    /// never award XP again.
    pub fn complete_lesson(&mut self, lesson_id: &str, xp_award: u64) -> Option<XpGain> {
        if self.completed_lessons.contains(lesson_id) {
            debug!(lesson_id, "Lesson already completed, ignoring");
            return None;
        }

        self.completed_lessons.insert(lesson_id.to_string());
        info!(lesson_id, xp_award, "Lesson completed");
        Some(self.add_xp(xp_award))
    }

    /// Read-only projection for display
    pub fn snapshot(&self) -> ProgressionSnapshot {
        ProgressionSnapshot {
            xp: self.xp,
            level: self.level,
            xp_per_level: self.xp_per_level,
            completed_lessons: self.completed_lessons.clone(),
        }
    }
}
