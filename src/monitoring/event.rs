/*!
 * Simulation Events
 * Observable transitions reported by the coordinators and roles
 */

use crate::core::types::{ArrivalId, Ingredient, ItemPair, RoomId, Ticket};
use serde::{Deserialize, Serialize};

/// Why an arrival was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Every room has finished its session
    NoSessionsLeft,
    /// The chosen room finished its session and never reopens
    RoomClosed,
}

/// One observable state transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimEvent {
    PairProduced {
        ticket: Ticket,
        pair: ItemPair,
        rounds_remaining: u64,
    },
    PairClaimed {
        ticket: Ticket,
        consumer: Ingredient,
        pair: ItemPair,
    },
    PairReleased {
        ticket: Ticket,
        consumer: Ingredient,
    },
    ProducerExhausted {
        produced: u64,
    },
    ConsumerExited {
        consumer: Ingredient,
        claimed: u64,
    },
    Admitted {
        arrival: ArrivalId,
        room: RoomId,
        occupancy: usize,
        capacity: usize,
    },
    Rejected {
        arrival: ArrivalId,
        room: RoomId,
        reason: Rejection,
    },
    SessionStarted {
        room: RoomId,
        occupancy: usize,
        capacity: usize,
    },
    SessionFinished {
        room: RoomId,
        occupancy: usize,
        capacity: usize,
        active_remaining: usize,
    },
}

impl SimEvent {
    /// Short stable name, used as the tracing message
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::PairProduced { .. } => "pair_produced",
            SimEvent::PairClaimed { .. } => "pair_claimed",
            SimEvent::PairReleased { .. } => "pair_released",
            SimEvent::ProducerExhausted { .. } => "producer_exhausted",
            SimEvent::ConsumerExited { .. } => "consumer_exited",
            SimEvent::Admitted { .. } => "admitted",
            SimEvent::Rejected { .. } => "rejected",
            SimEvent::SessionStarted { .. } => "session_started",
            SimEvent::SessionFinished { .. } => "session_finished",
        }
    }
}
