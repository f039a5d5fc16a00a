//! lessons-core: Progression core for interactive lessons
//!
//! This crate provides the building blocks for a lesson player:
//!
//! - **Content** - [`Lesson`], [`Exercise`] and the [`LessonCatalog`] trait with a JSON backed [`StaticCatalog`]
//! - **Evaluation** - [`evaluate`] for pure answer checking and [`AttemptGate`] against double submission
//! - **Sequencing** - [`LessonSequencer`] walking one lesson's exercises in order
//! - **Progression** - [`ProgressionStore`] owning XP, level and completed lessons
//! - **Keyword practice** - [`KeywordMastery`] raising per-keyword mastery for XP
//! - **Sessions** - [`SessionManager`] running sessions with timed gate release
//! - **Event system** - [`EventBus`] trait and [`MemoryEventBus`] for progression events
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use lessons_core::{
//!     Answer, MemoryEventBus, SessionConfig, SessionManager, SharedProgression, StaticCatalog,
//! };
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = StaticCatalog::from_path("lessons.json".as_ref())?;
//!     let manager = SessionManager::new(
//!         Arc::new(catalog),
//!         SharedProgression::default(),
//!         Arc::new(MemoryEventBus::default()),
//!         SessionConfig::default(),
//!     );
//!
//!     let session_id = manager.start_session("variables").await?;
//!     let result = manager.submit(&session_id, &Answer::Choice(0)).await?;
//!     println!("correct: {}", result.correct);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                  SessionManager                   │
//! │  ┌─────────────────────────────────────────────┐  │
//! │  │              LessonSequencer                │  │
//! │  │  ┌───────────────┐  ┌───────────────────┐   │  │
//! │  │  │  AttemptGate  │  │     evaluate()    │   │  │
//! │  │  └───────────────┘  └───────────────────┘   │  │
//! │  └─────────────────────────────────────────────┘  │
//! │         │                          │              │
//! │         ▼                          ▼              │
//! │  SharedProgression            EventBus            │
//! │  (ProgressionStore)      (ProgressionEvent)       │
//! └───────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod exercise;
pub mod gate;
pub mod lesson;
pub mod progression;
pub mod sequencer;
pub mod session;

// Re-export key types for convenience
pub use catalog::{LessonCatalog, StaticCatalog};
pub use error::{CatalogError, MasteryError, SessionError};
pub use evaluator::{Evaluation, evaluate, normalize};
pub use events::{EventBus, EventSeq, MemoryEventBus, ProgressionEvent};
pub use exercise::{Answer, Exercise, ExerciseKind};
pub use gate::{Attempt, AttemptGate, Outcome};
pub use lesson::Lesson;
pub use progression::{
    DEFAULT_XP_PER_LEVEL, Keyword, KeywordMastery, Practice, ProgressionSnapshot,
    ProgressionStore, SharedProgression, XpGain,
};
pub use sequencer::{
    Completion, LessonSequencer, Progress, RejectReason, SequencerOptions, SequencerState,
    SubmitResult,
};
pub use session::{SessionConfig, SessionId, SessionInfo, SessionManager};
