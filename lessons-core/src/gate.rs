//! Per-presentation submission lock
//!
//! While feedback for an answer is on screen the gate stays locked, so a
//! double tap or a repeated submit is dropped instead of being evaluated
//! (and credited) twice. The caller releases the gate once the outcome has
//! been acknowledged.

use tracing::debug;

use crate::evaluator::evaluate;
use crate::exercise::{Answer, Exercise};

/// Result of an evaluated submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub correct: bool,
    /// The exercise reward when correct, zero otherwise
    pub xp_reward: u32,
}

/// What the gate did with a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The answer was evaluated and the gate is now locked
    Evaluated(Outcome),
    /// The gate was already locked; nothing was evaluated
    Rejected,
}

/// Lock guarding one exercise presentation
#[derive(Debug, Clone, Default)]
pub struct AttemptGate {
    locked: bool,
}

impl AttemptGate {
    /// An unlocked gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission is currently in flight
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Evaluate `answer` unless a previous submission is still in flight.
    pub fn submit(&mut self, exercise: &Exercise, answer: &Answer) -> Attempt {
        if self.locked {
            debug!("Gate locked, rejecting submission");
            return Attempt::Rejected;
        }

        self.locked = true;
        let correct = evaluate(exercise, answer).correct;
        Attempt::Evaluated(Outcome {
            correct,
            xp_reward: if correct { exercise.xp_reward } else { 0 },
        })
    }

    /// Unlock after feedback has been shown.
    ///
    /// Returns true if the gate was locked.
    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.locked, false)
    }
}
