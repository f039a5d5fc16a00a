//! Progression events
//!
//! Presentation layers subscribe to these to drive cosmetic feedback
//! (confetti on a correct answer, a level-up banner) without the core
//! knowing anything about rendering.

mod bus;
mod memory;
mod types;

pub use bus::{EventBus, EventSeq};
pub use memory::MemoryEventBus;
pub use types::ProgressionEvent;
