//! # Event Sinks
//!
//! `RecordingEventSink` keeps every event in memory; `TracingEventSink`
//! forwards them to the log.

use crate::events::{ResourceEvent, TOPIC};
use crate::ports::outbound::ResourceEventSink;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// Keeps published events in publication order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ResourceEvent>>,
}

impl RecordingEventSink {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ResourceEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ResourceEventSink for RecordingEventSink {
    fn publish(&self, event: ResourceEvent) {
        debug!(topic = TOPIC, event = event.name(), "Event recorded");
        self.events.lock().push(event);
    }
}

/// Logs every event at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl ResourceEventSink for TracingEventSink {
    fn publish(&self, event: ResourceEvent) {
        match event.token_id() {
            Some(token_id) => {
                info!(topic = TOPIC, event = event.name(), token_id = %token_id, "Resource event")
            }
            None => info!(topic = TOPIC, event = event.name(), "Resource event"),
        }
    }
}

/// Forwards each event to every inner sink, in order.
#[derive(Default, Clone)]
pub struct FanoutEventSink {
    sinks: Vec<Arc<dyn ResourceEventSink>>,
}

impl FanoutEventSink {
    /// Create a fanout with no targets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target.
    #[must_use]
    pub fn with(mut self, sink: Arc<dyn ResourceEventSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl ResourceEventSink for FanoutEventSink {
    fn publish(&self, event: ResourceEvent) {
        for sink in &self.sinks {
            sink.publish(event.clone());
        }
    }
}
