//! EventBus trait definition

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::ProgressionEvent;

/// Sequence number for events (monotonically increasing)
pub type EventSeq = u64;

/// Publishes progression events to live subscribers and keeps them for replay
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event, returns its sequence number
    async fn publish(&self, event: ProgressionEvent) -> EventSeq;

    /// Subscribe to all events from now (live stream)
    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, ProgressionEvent)>;

    /// Get all events starting from a sequence number (for replay)
    async fn events_from(&self, seq: EventSeq) -> Vec<(EventSeq, ProgressionEvent)>;

    /// Get all events for one lesson session
    async fn session_events(&self, session_id: &str) -> Vec<(EventSeq, ProgressionEvent)>;

    /// Current sequence number (high water mark)
    fn current_seq(&self) -> EventSeq;
}
