//! Event bus held in process memory
//!
//! Published events are appended to a log whose index is the sequence
//! number, so replay is a slice of the log. Live delivery uses a tokio
//! broadcast channel; a subscriber that lags behind can catch up with
//! [`EventBus::events_from`].

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, broadcast};

use super::ProgressionEvent;
use super::bus::{EventBus, EventSeq};

pub struct MemoryEventBus {
    /// Event at index `n` has sequence number `n`
    log: RwLock<Vec<ProgressionEvent>>,
    /// Mirrors `log.len()` for the synchronous `current_seq`
    published: AtomicU64,
    live: broadcast::Sender<(EventSeq, ProgressionEvent)>,
}

impl MemoryEventBus {
    /// `capacity` bounds how far a live subscriber may lag
    pub fn new(capacity: usize) -> Self {
        let (live, _) = broadcast::channel(capacity);
        Self {
            log: RwLock::new(Vec::new()),
            published: AtomicU64::new(0),
            live,
        }
    }

    fn numbered<'a>(
        start: usize,
        events: impl Iterator<Item = &'a ProgressionEvent>,
    ) -> impl Iterator<Item = (EventSeq, ProgressionEvent)> {
        events
            .enumerate()
            .map(move |(offset, event)| ((start + offset) as EventSeq, event.clone()))
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: ProgressionEvent) -> EventSeq {
        let mut log = self.log.write().await;
        let seq = log.len() as EventSeq;
        log.push(event.clone());
        self.published.store(seq + 1, Ordering::Release);

        // Err only means nobody is listening live
        let _ = self.live.send((seq, event));
        seq
    }

    fn subscribe(&self) -> broadcast::Receiver<(EventSeq, ProgressionEvent)> {
        self.live.subscribe()
    }

    async fn events_from(&self, seq: EventSeq) -> Vec<(EventSeq, ProgressionEvent)> {
        let log = self.log.read().await;
        let start = usize::try_from(seq).map_or(log.len(), |s| s.min(log.len()));
        Self::numbered(start, log[start..].iter()).collect()
    }

    async fn session_events(&self, session_id: &str) -> Vec<(EventSeq, ProgressionEvent)> {
        let log = self.log.read().await;
        Self::numbered(0, log.iter())
            .filter(|(_, event)| event.session_id() == session_id)
            .collect()
    }

    fn current_seq(&self) -> EventSeq {
        self.published.load(Ordering::Acquire)
    }
}
