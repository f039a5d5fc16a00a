//! Per-session state held by the [`SessionManager`](super::SessionManager)

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::sequencer::{LessonSequencer, Progress, SequencerOptions, SequencerState};

/// Identifier of a lesson session
pub type SessionId = String;

/// Timing and reward settings for lesson sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long feedback for an incorrect answer holds the gate
    pub settle_delay: Duration,
    /// How long feedback for a correct answer holds the gate
    pub correct_settle_delay: Duration,
    /// XP granted once on first completion of a lesson
    pub completion_bonus: u64,
    /// Whether exercise rewards are granted when replaying a completed lesson
    pub replay_xp: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(700),
            correct_settle_delay: Duration::from_millis(800),
            completion_bonus: 0,
            replay_xp: false,
        }
    }
}

impl SessionConfig {
    /// Settle delay after an evaluated answer
    pub fn delay_for(&self, correct: bool) -> Duration {
        if correct {
            self.correct_settle_delay
        } else {
            self.settle_delay
        }
    }

    pub(crate) fn sequencer_options(&self) -> SequencerOptions {
        SequencerOptions {
            completion_bonus: self.completion_bonus,
            replay_xp: self.replay_xp,
        }
    }
}

/// Read-only summary of an active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub id: SessionId,
    pub lesson_id: String,
    pub lesson_title: String,
    pub started_at: DateTime<Utc>,
    pub state: SequencerState,
    pub progress: Progress,
    pub locked: bool,
}

/// A lesson session plus its pending gate release
pub(crate) struct ActiveSession {
    id: SessionId,
    pub(crate) sequencer: LessonSequencer,
    started_at: DateTime<Utc>,
    /// Bumped on every accepted submission; stale timers compare against it
    attempt: u64,
    release_task: Option<JoinHandle<()>>,
    lock_tx: watch::Sender<bool>,
}

impl ActiveSession {
    pub(crate) fn new(id: SessionId, sequencer: LessonSequencer) -> Self {
        let (lock_tx, _) = watch::channel(sequencer.is_locked());
        Self {
            id,
            sequencer,
            started_at: Utc::now(),
            attempt: 0,
            release_task: None,
            lock_tx,
        }
    }

    pub(crate) fn info(&self) -> SessionInfo {
        let lesson = self.sequencer.lesson();
        SessionInfo {
            id: self.id.clone(),
            lesson_id: lesson.id.clone(),
            lesson_title: lesson.title.clone(),
            started_at: self.started_at,
            state: self.sequencer.state(),
            progress: self.sequencer.progress(),
            locked: self.sequencer.is_locked(),
        }
    }

    /// Start a new locked attempt, cancelling any release still pending.
    pub(crate) fn begin_attempt(&mut self) -> u64 {
        if let Some(task) = self.release_task.take() {
            task.abort();
        }
        self.attempt += 1;
        self.lock_tx.send_replace(self.sequencer.is_locked());
        self.attempt
    }

    pub(crate) fn set_release_task(&mut self, task: JoinHandle<()>) {
        self.release_task = Some(task);
    }

    /// Release requested by the settle timer of `attempt`.
    ///
    /// Ignored when a newer attempt has started since.
    pub(crate) fn release_scheduled(&mut self, attempt: u64) -> bool {
        if attempt != self.attempt {
            return false;
        }
        // Called from inside the task itself; dropping the handle detaches it
        self.release_task = None;
        self.unlock()
    }

    /// Explicit acknowledgement; cancels the pending timer.
    pub(crate) fn release_now(&mut self) -> bool {
        if let Some(task) = self.release_task.take() {
            task.abort();
        }
        self.unlock()
    }

    pub(crate) fn subscribe_lock(&self) -> watch::Receiver<bool> {
        self.lock_tx.subscribe()
    }

    fn unlock(&mut self) -> bool {
        let released = self.sequencer.release();
        self.lock_tx.send_replace(false);
        released
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        if let Some(task) = self.release_task.take() {
            task.abort();
        }
    }
}
