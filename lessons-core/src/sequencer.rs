//! Ordered walk through one lesson's exercises
//!
//! ```text
//! InProgress(0) ──correct──▶ InProgress(1) ──correct──▶ … ──correct──▶ Complete
//!      │  ▲
//!      └──┘ incorrect (no XP, index unchanged)
//! ```
//!
//! The transition into `Complete` records the lesson with the progression
//! store exactly once. A lesson with no exercises is complete as soon as it
//! starts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::exercise::{Answer, Exercise};
use crate::gate::{Attempt, AttemptGate};
use crate::lesson::Lesson;
use crate::progression::{ProgressionStore, XpGain};

/// State of a lesson session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SequencerState {
    /// Presenting the exercise at `index`
    InProgress { index: usize },
    /// All exercises answered (terminal)
    Complete,
}

/// Why a submission was not evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Feedback for the previous answer has not been released yet
    Locked,
    /// The lesson is already complete
    Complete,
}

/// Position within the lesson, for "Question 2 / 5" style display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub index: usize,
    pub total: usize,
}

impl Progress {
    /// True once every exercise has been answered
    pub fn is_complete(&self) -> bool {
        self.index == self.total
    }
}

/// Record of the transition into `Complete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub lesson_id: String,
    /// Completion award, `None` if the lesson had already been recorded
    pub award: Option<XpGain>,
}

/// Tuning for a sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerOptions {
    /// XP granted once when the lesson is first completed
    pub completion_bonus: u64,
    /// Whether exercise rewards are granted when replaying a completed lesson
    pub replay_xp: bool,
}

impl Default for SequencerOptions {
    fn default() -> Self {
        Self {
            completion_bonus: 0,
            replay_xp: false,
        }
    }
}

/// Outcome of one submission, as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitResult {
    /// False when the submission was dropped without evaluation
    pub accepted: bool,
    pub correct: bool,
    /// XP added for the exercise itself
    pub xp_awarded: u64,
    /// Index of the exercise the answer was checked against
    pub exercise_index: usize,
    pub rejected: Option<RejectReason>,
    /// Store effect of the exercise reward
    pub reward: Option<XpGain>,
    /// Set when this submission completed the lesson
    pub completion: Option<Completion>,
}

impl SubmitResult {
    fn rejected(reason: RejectReason, exercise_index: usize) -> Self {
        Self {
            accepted: false,
            correct: false,
            xp_awarded: 0,
            exercise_index,
            rejected: Some(reason),
            reward: None,
            completion: None,
        }
    }

    /// Total levels crossed by this submission
    pub fn levels_gained(&self) -> u64 {
        let reward = self.reward.map_or(0, |g| g.levels_gained);
        let bonus = self
            .completion
            .as_ref()
            .and_then(|c| c.award)
            .map_or(0, |g| g.levels_gained);
        reward + bonus
    }

    /// True when this submission completed the lesson
    pub fn lesson_completed(&self) -> bool {
        self.completion.is_some()
    }
}

/// Drives one lesson session from the first exercise to completion
#[derive(Debug, Clone)]
pub struct LessonSequencer {
    lesson: Arc<Lesson>,
    state: SequencerState,
    gate: AttemptGate,
    options: SequencerOptions,
    replay: bool,
}

impl LessonSequencer {
    /// Begin a session on `lesson`.
    ///
    /// Returns the completion record immediately for a lesson without
    /// exercises.
    pub fn start(
        lesson: Arc<Lesson>,
        options: SequencerOptions,
        store: &mut ProgressionStore,
    ) -> (Self, Option<Completion>) {
        let replay = store.is_completed(&lesson.id);
        let mut sequencer = Self {
            lesson,
            state: SequencerState::InProgress { index: 0 },
            gate: AttemptGate::new(),
            options,
            replay,
        };

        debug!(
            lesson_id = %sequencer.lesson.id,
            exercises = sequencer.lesson.len(),
            replay,
            "Lesson session started"
        );

        let completion = if sequencer.lesson.is_empty() {
            warn!(lesson_id = %sequencer.lesson.id, "Lesson has no exercises");
            Some(sequencer.complete(store))
        } else {
            None
        };

        (sequencer, completion)
    }

    /// The lesson being walked
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    /// Current state
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Whether the lesson is complete
    pub fn is_complete(&self) -> bool {
        self.state == SequencerState::Complete
    }

    /// Whether feedback for a submission is still pending release
    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    /// The exercise awaiting an answer, `None` once complete
    pub fn current_exercise(&self) -> Option<&Exercise> {
        match self.state {
            SequencerState::InProgress { index } => self.lesson.exercises.get(index),
            SequencerState::Complete => None,
        }
    }

    /// Position within the lesson
    pub fn progress(&self) -> Progress {
        let total = self.lesson.len();
        let index = match self.state {
            SequencerState::InProgress { index } => index,
            SequencerState::Complete => total,
        };
        Progress { index, total }
    }

    /// Submit an answer for the current exercise.
    ///
    /// A correct answer awards the exercise XP and advances; answering the
    /// last exercise completes the lesson. An incorrect answer leaves the
    /// position unchanged. Either way the gate stays locked until
    /// [`release`](Self::release).
    pub fn submit(&mut self, answer: &Answer, store: &mut ProgressionStore) -> SubmitResult {
        let index = match self.state {
            SequencerState::InProgress { index } => index,
            SequencerState::Complete => {
                return SubmitResult::rejected(RejectReason::Complete, self.lesson.len());
            }
        };
        let lesson = Arc::clone(&self.lesson);
        let exercise = &lesson.exercises[index];

        let outcome = match self.gate.submit(exercise, answer) {
            Attempt::Evaluated(outcome) => outcome,
            Attempt::Rejected => {
                warn!(lesson_id = %lesson.id, index, "Submission rejected while locked");
                return SubmitResult::rejected(RejectReason::Locked, index);
            }
        };

        if !outcome.correct {
            debug!(lesson_id = %lesson.id, index, "Incorrect answer");
            return SubmitResult {
                accepted: true,
                correct: false,
                xp_awarded: 0,
                exercise_index: index,
                rejected: None,
                reward: None,
                completion: None,
            };
        }

        let amount = if self.replay && !self.options.replay_xp {
            0
        } else {
            u64::from(outcome.xp_reward)
        };
        let reward = store.add_xp(amount);

        let completion = if index + 1 < lesson.len() {
            self.state = SequencerState::InProgress { index: index + 1 };
            None
        } else {
            Some(self.complete(store))
        };

        SubmitResult {
            accepted: true,
            correct: true,
            xp_awarded: amount,
            exercise_index: index,
            rejected: None,
            reward: Some(reward),
            completion,
        }
    }

    /// Release the gate once feedback has been acknowledged.
    ///
    /// Returns true if the gate was locked.
    pub fn release(&mut self) -> bool {
        self.gate.release()
    }

    fn complete(&mut self, store: &mut ProgressionStore) -> Completion {
        self.state = SequencerState::Complete;
        let award = store.complete_lesson(&self.lesson.id, self.options.completion_bonus);
        info!(
            lesson_id = %self.lesson.id,
            first_time = award.is_some(),
            "Lesson session complete"
        );
        Completion {
            lesson_id: self.lesson.id.clone(),
            award,
        }
    }
}
