/*!
 * Shared Slot
 * Single-pair buffer and round counter guarded by the exchange monitor
 */

use crate::core::types::{Ingredient, ItemPair, Ticket};
use serde::Serialize;

/// A pair currently sitting in the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resident {
    pub ticket: Ticket,
    pub pair: ItemPair,
}

/// State owned by the exchange monitor
#[derive(Debug)]
pub(crate) struct SlotState {
    pub(crate) resident: Option<Resident>,
    pub(crate) rounds_remaining: u64,
    pub(crate) next_ticket: Ticket,
    pub(crate) produced: u64,
    pub(crate) released: u64,
    pub(crate) exhaustion_declared: bool,
    pub(crate) shut_down: bool,
}

impl SlotState {
    pub(crate) fn new(rounds: u64) -> Self {
        Self {
            resident: None,
            rounds_remaining: rounds,
            next_ticket: 1,
            produced: 0,
            released: 0,
            exhaustion_declared: false,
            shut_down: false,
        }
    }

    /// No pair resident and none left to produce
    #[inline]
    pub(crate) fn is_exhausted(&self) -> bool {
        self.resident.is_none() && self.rounds_remaining == 0
    }
}

/// Consistent copy of the slot taken under the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotSnapshot {
    pub resident: Option<Resident>,
    pub rounds_remaining: u64,
    pub produced: u64,
    pub released: u64,
    pub exhaustion_declared: bool,
    pub shut_down: bool,
}

impl From<&SlotState> for SlotSnapshot {
    fn from(state: &SlotState) -> Self {
        Self {
            resident: state.resident,
            rounds_remaining: state.rounds_remaining,
            produced: state.produced,
            released: state.released,
            exhaustion_declared: state.exhaustion_declared,
            shut_down: state.shut_down,
        }
    }
}

/// A pair a consumer has seen in the slot, not yet claimed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observed {
    pub ticket: Ticket,
    pub pair: ItemPair,
}

/// Outcome of `ExchangeCoordinator::try_consume`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offer {
    /// A pair this consumer has not inspected yet; the slot is not cleared
    Pair(Observed),
    /// Rounds are exhausted and the slot is empty
    Exhausted,
}

/// Right to clear the slot, held by the one consumer the pair is usable by
///
/// Only `ExchangeCoordinator::claim` creates one, so an irrelevant consumer
/// cannot clear the slot.
#[derive(Debug, PartialEq, Eq)]
pub struct Claim {
    pub(crate) ticket: Ticket,
    pub(crate) pair: ItemPair,
    pub(crate) consumer: Ingredient,
}

impl Claim {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn pair(&self) -> ItemPair {
        self.pair
    }

    pub fn consumer(&self) -> Ingredient {
        self.consumer
    }
}
