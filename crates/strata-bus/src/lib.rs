// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process event bus.
//!
//! The tracker and the intervention manager publish [`BusEvent`]s here;
//! controllers and UIs subscribe. Publishing never blocks and never fails:
//! with no subscribers the event is simply dropped, and a slow subscriber
//! observes `RecvError::Lagged` rather than stalling publishers.

pub mod events;

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

pub use events::BusEvent;

/// Broadcast buffer size. Subscribers more than this many events behind lag.
const CHANNEL_CAPACITY: usize = 256;

/// Shared handle to the bus.
pub type SharedEventBus = Arc<EventBus>;

/// Broadcast bus carrying [`BusEvent`]s.
#[derive(Debug)]
pub struct EventBus {
    sender: broadcast::Sender<BusEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn shared(self) -> SharedEventBus {
        Arc::new(self)
    }

    /// Publish an event, returning how many subscribers received it.
    pub fn publish(&self, event: BusEvent) -> usize {
        let event_type = event.event_type();
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(event_type, receivers, "event published");
                receivers
            }
            Err(_) => {
                debug!(event_type, "event dropped, no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BusEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
