//! Lesson session management

mod manager;
mod state;

pub use manager::SessionManager;
pub use state::{SessionConfig, SessionId, SessionInfo};
