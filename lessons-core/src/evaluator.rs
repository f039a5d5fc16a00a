//! Answer evaluation
//!
//! Evaluation is a pure, total function of `(exercise, answer)`: malformed
//! selections and mismatched answer shapes are simply incorrect.

use tracing::debug;

use crate::exercise::{Answer, Exercise, ExerciseKind};

/// Result of evaluating one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: bool,
}

/// Decide whether `answer` solves `exercise`.
pub fn evaluate(exercise: &Exercise, answer: &Answer) -> Evaluation {
    let correct = match (&exercise.kind, answer) {
        (
            ExerciseKind::MultipleChoice {
                options,
                correct_index,
            },
            Answer::Choice(index),
        ) => *index < options.len() && index == correct_index,
        (ExerciseKind::FreeText { expected_answer, .. }, Answer::Text(text)) => {
            normalize(text) == normalize(expected_answer)
        }
        _ => false,
    };

    debug!(kind = exercise.kind_name(), correct, "Evaluated answer");
    Evaluation { correct }
}

/// Canonical form used for free-text comparison: trimmed and lower-cased.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
