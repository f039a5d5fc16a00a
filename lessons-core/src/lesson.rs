//! Lesson content

use serde::{Deserialize, Serialize};

use crate::exercise::Exercise;

/// A named, ordered collection of exercises with instructional content.
///
/// Exercise order is the presentation and completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier used for lookup and completion tracking
    pub id: String,

    /// Display title
    pub title: String,

    /// Rendered prose (markdown), opaque to the core
    #[serde(default)]
    pub content: String,

    /// Exercises in presentation order
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

impl Lesson {
    /// Create a lesson without content or exercises
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            exercises: Vec::new(),
        }
    }

    /// Set the lesson content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Append an exercise
    pub fn with_exercise(mut self, exercise: Exercise) -> Self {
        self.exercises.push(exercise);
        self
    }

    /// Number of exercises in the lesson
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    /// True when the lesson has no exercises
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Sum of all exercise rewards
    pub fn total_xp(&self) -> u64 {
        self.exercises.iter().map(|e| u64::from(e.xp_reward)).sum()
    }
}
