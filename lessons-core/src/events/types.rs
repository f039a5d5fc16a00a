//! Event type definitions

use serde::{Deserialize, Serialize};

use crate::sequencer::RejectReason;

/// Events published by the session layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressionEvent {
    /// A lesson session was opened
    SessionStarted {
        session_id: String,
        lesson_id: String,
        total_exercises: usize,
    },

    /// An answer was evaluated
    AnswerEvaluated {
        session_id: String,
        exercise_index: usize,
        correct: bool,
        xp_awarded: u64,
    },

    /// A submission was dropped without evaluation
    SubmissionRejected {
        session_id: String,
        reason: RejectReason,
    },

    /// Feedback was acknowledged and the next answer may be submitted
    GateReleased { session_id: String },

    /// XP was added to the progression store
    XpAwarded {
        session_id: String,
        amount: u64,
        xp: u64,
        level: u64,
    },

    /// One or more levels were gained
    LevelUp {
        session_id: String,
        from: u64,
        to: u64,
    },

    /// The lesson was completed in this session
    LessonCompleted {
        session_id: String,
        lesson_id: String,
        /// False when the lesson had been completed before (replay)
        first_time: bool,
    },

    /// The session was discarded
    SessionEnded { session_id: String, completed: bool },
}

impl ProgressionEvent {
    /// Session the event belongs to
    pub fn session_id(&self) -> &str {
        match self {
            Self::SessionStarted { session_id, .. }
            | Self::AnswerEvaluated { session_id, .. }
            | Self::SubmissionRejected { session_id, .. }
            | Self::GateReleased { session_id }
            | Self::XpAwarded { session_id, .. }
            | Self::LevelUp { session_id, .. }
            | Self::LessonCompleted { session_id, .. }
            | Self::SessionEnded { session_id, .. } => session_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_snake_case_type_tag() {
        let event = ProgressionEvent::LevelUp {
            session_id: "s1".to_string(),
            from: 1,
            to: 3,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "level_up");
        assert_eq!(json["from"], 1);
        assert_eq!(json["to"], 3);
    }

    #[test]
    fn rejection_reason_serializes_as_string() {
        let event = ProgressionEvent::SubmissionRejected {
            session_id: "s1".to_string(),
            reason: RejectReason::Locked,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""reason":"locked""#));

        let parsed: ProgressionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, event);
    }

    #[test]
    fn session_id_is_available_for_every_variant() {
        let events = vec![
            ProgressionEvent::SessionStarted {
                session_id: "a".to_string(),
                lesson_id: "L1".to_string(),
                total_exercises: 2,
            },
            ProgressionEvent::GateReleased {
                session_id: "a".to_string(),
            },
            ProgressionEvent::SessionEnded {
                session_id: "a".to_string(),
                completed: false,
            },
        ];

        for event in events {
            assert_eq!(event.session_id(), "a");
        }
    }
}
