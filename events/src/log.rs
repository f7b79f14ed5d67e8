//! The event log: append-only history plus live broadcast fan-out.

use crate::record::{EventFilter, EventRecord, RegistryEvent};
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;
use verinum_types::Timestamp;

/// Default capacity of the live broadcast channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Ordered, append-only record of every registry transition.
///
/// Two consumption modes, mirroring how the registry's clients actually use
/// it: live subscription via [`subscribe`](Self::subscribe) for new events,
/// and bounded-lookback [`replay`](Self::replay) so a reconnecting consumer
/// can reconstruct pending work. Appends take the write lock; reads and
/// replays only the read lock, so they never observe a half-applied state.
pub struct EventLog {
    history: RwLock<Vec<EventRecord>>,
    tx: broadcast::Sender<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Create a log whose live channel buffers up to `channel_capacity`
    /// records per lagging subscriber before they start missing events
    /// (history is unaffected; laggards can replay).
    pub fn with_capacity(channel_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(channel_capacity);
        Self {
            history: RwLock::new(Vec::new()),
            tx,
        }
    }

    /// Append an event, assigning it the next sequence number.
    ///
    /// Returns the stored record. Subscribers receive a copy; a full or
    /// absent subscriber never blocks the append.
    pub fn append(&self, event: RegistryEvent) -> EventRecord {
        let mut history = self.history.write().expect("event log lock poisoned");
        let record = EventRecord {
            seq: history.len() as u64,
            timestamp: Timestamp::now(),
            event,
        };
        history.push(record.clone());
        drop(history);

        debug!(seq = record.seq, kind = ?record.event.kind(), "event appended");
        let _ = self.tx.send(record.clone());
        record
    }

    /// Subscribe to events appended after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.tx.subscribe()
    }

    /// Replay historical records matching `filter`.
    ///
    /// `lookback` bounds how far back the scan goes, counted in records from
    /// the tail; `None` replays the full history.
    pub fn replay(&self, filter: &EventFilter, lookback: Option<usize>) -> Vec<EventRecord> {
        let history = self.history.read().expect("event log lock poisoned");
        let start = match lookback {
            Some(n) => history.len().saturating_sub(n),
            None => 0,
        };
        history[start..]
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    /// Number of records appended so far.
    pub fn len(&self) -> u64 {
        self.history.read().expect("event log lock poisoned").len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
