//! Exercise definitions and learner answers
//!
//! Exercises are immutable content supplied by the lesson catalog. The
//! kind-specific fields live in [`ExerciseKind`], which is flattened into the
//! exercise object on the wire:
//!
//! ```json
//! { "type": "multiple_choice", "prompt": "What is a variable?", "xp_reward": 10,
//!   "options": ["A container for data", "A loop"], "correct_index": 0 }
//! ```

use serde::{Deserialize, Serialize};

/// A single question unit within a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Question text shown to the learner
    pub prompt: String,

    /// XP granted for a correct answer
    #[serde(default)]
    pub xp_reward: u32,

    /// Kind-specific data
    #[serde(flatten)]
    pub kind: ExerciseKind,
}

/// The two supported exercise shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Pick one of a fixed list of options
    MultipleChoice {
        options: Vec<String>,
        correct_index: usize,
    },

    /// Type an answer, compared case- and whitespace-insensitively
    FreeText {
        expected_answer: String,
        /// Code fragment displayed under the prompt (e.g. `print( ___ )`)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        snippet: Option<String>,
    },
}

impl Exercise {
    /// Create a multiple-choice exercise
    pub fn multiple_choice(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        xp_reward: u32,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            xp_reward,
            kind: ExerciseKind::MultipleChoice {
                options,
                correct_index,
            },
        }
    }

    /// Create a free-text exercise
    pub fn free_text(
        prompt: impl Into<String>,
        expected_answer: impl Into<String>,
        xp_reward: u32,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            xp_reward,
            kind: ExerciseKind::FreeText {
                expected_answer: expected_answer.into(),
                snippet: None,
            },
        }
    }

    /// Attach a code snippet to a free-text exercise.
    ///
    /// Multiple-choice exercises are returned unchanged.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        if let ExerciseKind::FreeText { snippet: slot, .. } = &mut self.kind {
            *slot = Some(snippet.into());
        }
        self
    }

    /// Options of a multiple-choice exercise, empty for free text
    pub fn options(&self) -> &[String] {
        match &self.kind {
            ExerciseKind::MultipleChoice { options, .. } => options,
            ExerciseKind::FreeText { .. } => &[],
        }
    }

    /// Short name of the exercise kind, matching the wire tag
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ExerciseKind::MultipleChoice { .. } => "multiple_choice",
            ExerciseKind::FreeText { .. } => "free_text",
        }
    }

    /// Check the structural invariants of the exercise.
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        match &self.kind {
            ExerciseKind::MultipleChoice {
                options,
                correct_index,
            } => {
                if options.is_empty() {
                    return Err("multiple-choice exercise has no options".to_string());
                }
                if *correct_index >= options.len() {
                    return Err(format!(
                        "correct_index {} out of range for {} options",
                        correct_index,
                        options.len()
                    ));
                }
                Ok(())
            }
            ExerciseKind::FreeText { .. } => Ok(()),
        }
    }
}

/// A learner's candidate answer for the current exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Index of the selected option
    Choice(usize),
    /// Typed answer
    Text(String),
}

impl Answer {
    /// Build a text answer
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}
