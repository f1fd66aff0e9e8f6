use tokio::sync::broadcast;

use super::{EventDispatcher, ProxyErrorEvent};

pub const DEFAULT_CAPACITY: usize = 1000;
/// Every slot is allocated up front, so larger channels are refused
pub const MAX_CAPACITY: usize = 1 << 16;

/// Default event channel, fanning events out to every subscriber
#[derive(Debug, Clone)]
pub struct BroadcastDispatcher {
    sender: broadcast::Sender<ProxyErrorEvent>,
}

impl BroadcastDispatcher {
    /// Capacity is clamped to `1..=MAX_CAPACITY`
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.clamp(1, MAX_CAPACITY));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProxyErrorEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventDispatcher for BroadcastDispatcher {
    fn dispatch(&self, event: ProxyErrorEvent) {
        let name = event.name();
        // send only fails when nobody is subscribed
        if self.sender.send(event).is_err() {
            tracing::trace!(event = name, "No subscribers for event");
        }
    }
}
