/*!
 * Event Sinks
 *
 * Coordinators report transitions synchronously, sometimes while holding
 * their monitor's lock. A sink must return quickly and must never call back
 * into a coordinator.
 */

use super::event::SimEvent;
use parking_lot::Mutex;
use tracing::info;

/// Receiver for simulation events
pub trait EventSink: Send + Sync {
    fn record(&self, event: &SimEvent);
}

impl<F> EventSink for F
where
    F: Fn(&SimEvent) + Send + Sync,
{
    fn record(&self, event: &SimEvent) {
        self(event)
    }
}

/// Emits every event as a structured `info!` line
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &SimEvent) {
        match event {
            SimEvent::PairProduced {
                ticket,
                pair,
                rounds_remaining,
            } => info!(ticket, pair = %pair, rounds_remaining, "pair produced"),
            SimEvent::PairClaimed {
                ticket,
                consumer,
                pair,
            } => info!(ticket, consumer = %consumer, pair = %pair, "pair claimed"),
            SimEvent::PairReleased { ticket, consumer } => {
                info!(ticket, consumer = %consumer, "pair released")
            }
            SimEvent::ProducerExhausted { produced } => info!(produced, "producer exhausted"),
            SimEvent::ConsumerExited { consumer, claimed } => {
                info!(consumer = %consumer, claimed, "consumer exited")
            }
            SimEvent::Admitted {
                arrival,
                room,
                occupancy,
                capacity,
            } => info!(arrival, room, occupancy, capacity, "admitted"),
            SimEvent::Rejected {
                arrival,
                room,
                reason,
            } => info!(arrival, room, reason = ?reason, "rejected"),
            SimEvent::SessionStarted {
                room,
                occupancy,
                capacity,
            } => info!(room, occupancy, capacity, "session started"),
            SimEvent::SessionFinished {
                room,
                occupancy,
                capacity,
                active_remaining,
            } => info!(room, occupancy, capacity, active_remaining, "session finished"),
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _event: &SimEvent) {}
}

/// Keeps every event in arrival order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SimEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.events.lock().clone()
    }

    /// Events matching `filter`, in recorded order
    pub fn filter<F>(&self, filter: F) -> Vec<SimEvent>
    where
        F: Fn(&SimEvent) -> bool,
    {
        self.events.lock().iter().filter(|e| filter(e)).cloned().collect()
    }

    pub fn count_kind(&self, kind: &str) -> usize {
        self.events.lock().iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for RecordingSink {
    fn record(&self, event: &SimEvent) {
        self.events.lock().push(event.clone());
    }
}
