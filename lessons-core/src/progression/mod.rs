//! Learner progression: XP, levels, completed lessons and keyword mastery

mod mastery;
mod shared;
mod store;

pub use mastery::{Keyword, KeywordMastery, MASTERY_STEP, MAX_MASTERY, PRACTICE_XP, Practice};
pub use shared::SharedProgression;
pub use store::{DEFAULT_XP_PER_LEVEL, ProgressionSnapshot, ProgressionStore, XpGain};
