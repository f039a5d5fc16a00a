//! Shared handle over a [`ProgressionStore`]
//!
//! Several lesson sessions funnel XP into the same store. Every mutation
//! goes through one async mutex so that no two `add_xp`/`complete_lesson`
//! read-modify-write cycles interleave.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use super::store::{ProgressionSnapshot, ProgressionStore, XpGain};

/// Cloneable, serialized access to one progression store
#[derive(Debug, Clone, Default)]
pub struct SharedProgression {
    inner: Arc<Mutex<ProgressionStore>>,
}

impl SharedProgression {
    /// Wrap an existing store
    pub fn new(store: ProgressionStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Exclusive access for compound operations
    pub async fn lock(&self) -> MutexGuard<'_, ProgressionStore> {
        self.inner.lock().await
    }

    /// See [`ProgressionStore::add_xp`]
    pub async fn add_xp(&self, amount: u64) -> XpGain {
        self.inner.lock().await.add_xp(amount)
    }

    /// See [`ProgressionStore::complete_lesson`]
    pub async fn complete_lesson(&self, lesson_id: &str, xp_award: u64) -> Option<XpGain> {
        self.inner.lock().await.complete_lesson(lesson_id, xp_award)
    }

    /// Current read-only projection
    pub async fn snapshot(&self) -> ProgressionSnapshot {
        self.inner.lock().await.snapshot()
    }
}
