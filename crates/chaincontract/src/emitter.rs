//! Event republisher: fans decoded log entries out to per-event channels.
//!
//! Each entry goes to exactly one channel: the decoded event's name, or
//! [`CATCH_ALL_CHANNEL`] when the log was not recognized. Channels are
//! tokio broadcast channels created on first subscription and dropped once
//! their last receiver is gone; publishing to a key nobody listens on is a
//! no-op.
//!
//! [`EmitterFeed`] pairs an emitter with a poll loop that only starts once
//! the caller has subscribed, so no round is published into the void.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chaincontract_core::ContractLogEntry;
use tokio::sync::broadcast;

use crate::logs::{LogHandler, LogPoller, LogSubscription};

/// Channel key for entries without a recognized event.
pub const CATCH_ALL_CHANNEL: &str = "?";

/// Keyed broadcast registry. Cheap to clone; clones share channels.
#[derive(Clone)]
pub struct LogEmitter {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<ContractLogEntry>>>>,
    capacity: usize,
}

impl LogEmitter {
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Subscribe to entries routed to `key` (an event name or
    /// [`CATCH_ALL_CHANNEL`]).
    pub fn subscribe(&self, key: &str) -> broadcast::Receiver<ContractLogEntry> {
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels
            .entry(key.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// The channel an entry is published on.
    pub fn routing_key(entry: &ContractLogEntry) -> &str {
        entry.event.name().unwrap_or(CATCH_ALL_CHANNEL)
    }

    /// Publish `entry` on its channel. Returns the number of receivers
    /// that got it.
    pub fn publish(&self, entry: ContractLogEntry) -> usize {
        let key = Self::routing_key(&entry).to_string();
        let mut channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        let Some(tx) = channels.get(&key) else {
            tracing::trace!(key = %key, "no subscribers for log entry");
            return 0;
        };
        match tx.send(entry) {
            Ok(n) => n,
            Err(_) => {
                channels.remove(&key);
                tracing::trace!(key = %key, "last subscriber gone, channel dropped");
                0
            }
        }
    }

    /// Number of live receivers on `key`.
    pub fn receiver_count(&self, key: &str) -> usize {
        let channels = self.channels.lock().unwrap_or_else(|e| e.into_inner());
        channels.get(key).map_or(0, broadcast::Sender::receiver_count)
    }
}

#[async_trait]
impl LogHandler for LogEmitter {
    async fn handle(&mut self, entry: ContractLogEntry) {
        self.publish(entry);
    }
}

/// A log feed bound to a [`LogEmitter`], not yet polling.
///
/// Subscribe to every channel of interest, then [`start`](Self::start).
pub struct EmitterFeed {
    emitter: LogEmitter,
    poller: LogPoller<LogEmitter>,
}

impl EmitterFeed {
    pub(crate) fn new(emitter: LogEmitter, poller: LogPoller<LogEmitter>) -> Self {
        Self { emitter, poller }
    }

    pub fn subscribe(&self, key: &str) -> broadcast::Receiver<ContractLogEntry> {
        self.emitter.subscribe(key)
    }

    pub fn emitter(&self) -> &LogEmitter {
        &self.emitter
    }

    /// Spawn the poll loop. The emitter stays usable for late subscribers,
    /// who only see entries published after they subscribe.
    pub fn start(self) -> (LogEmitter, LogSubscription) {
        let subscription = LogSubscription::spawn(self.poller);
        (self.emitter, subscription)
    }
}
