use std::sync::Mutex;

use cache_invalidator::events::{EventDispatcher, ProxyErrorEvent};

#[derive(Default)]
pub struct RecordingDispatcher {
    events: Mutex<Vec<ProxyErrorEvent>>,
}

impl RecordingDispatcher {
    pub fn events(&self) -> Vec<ProxyErrorEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|e| e.name()).collect()
    }
}

impl EventDispatcher for RecordingDispatcher {
    fn dispatch(&self, event: ProxyErrorEvent) {
        self.events.lock().unwrap().push(event);
    }
}
