/*!
 * Exchange Coordinator
 *
 * One producer places a pair in a single slot; every consumer sees it; only
 * the consumer whose ingredient is missing from the pair claims and clears it.
 *
 * The round counter is decremented in the same critical section that fills
 * the slot, so a consumer can never observe "no rounds left" while the last
 * pair is still on its way into the slot.
 */

use super::slot::{Claim, Observed, Offer, Resident, SlotSnapshot, SlotState};
use crate::core::errors::{CoordError, CoordResult};
use crate::core::sync::{Monitor, MonitorStatsSnapshot, WaitResult};
use crate::core::types::{Ingredient, ItemPair, Ticket};
use crate::monitoring::{EventSink, SimEvent};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ExchangeCoordinator {
    monitor: Monitor<SlotState>,
    sink: Arc<dyn EventSink>,
}

impl ExchangeCoordinator {
    pub fn new(rounds: u64, sink: Arc<dyn EventSink>) -> Self {
        Self {
            monitor: Monitor::new("exchange", SlotState::new(rounds)),
            sink,
        }
    }

    pub fn sink(&self) -> &dyn EventSink {
        self.sink.as_ref()
    }

    pub fn rounds_remaining(&self) -> u64 {
        self.monitor.with_lock(|s| s.rounds_remaining)
    }

    /// Place `pair` in the slot once it is empty
    ///
    /// Returns the rounds left after this one. Producing with no rounds left
    /// is a driver bug and reports `ProducedAfterExhaustion`. A shutdown
    /// while waiting for the slot reports `ShutDown`.
    pub fn produce(&self, pair: ItemPair) -> CoordResult<u64> {
        let mut state = self.monitor.enter();
        if state.shut_down {
            return Err(CoordError::ShutDown);
        }
        if state.rounds_remaining == 0 {
            return Err(CoordError::ProducedAfterExhaustion);
        }

        state.wait_while(|s| s.resident.is_some() && !s.shut_down);
        if state.shut_down {
            return Err(CoordError::ShutDown);
        }

        let ticket = state.next_ticket;
        state.next_ticket += 1;
        state.resident = Some(Resident { ticket, pair });
        state.rounds_remaining -= 1;
        state.produced += 1;
        let rounds_remaining = state.rounds_remaining;

        self.sink.record(&SimEvent::PairProduced {
            ticket,
            pair,
            rounds_remaining,
        });
        state.notify_all();
        Ok(rounds_remaining)
    }

    /// Final broadcast once the producer has run out of rounds
    ///
    /// Consumers still waiting for a pair wake up, see the empty slot and the
    /// zero counter, and exit.
    pub fn declare_exhausted(&self) {
        let mut state = self.monitor.enter();
        debug_assert_eq!(state.rounds_remaining, 0, "exhaustion declared early");
        state.exhaustion_declared = true;
        self.sink.record(&SimEvent::ProducerExhausted {
            produced: state.produced,
        });
        state.notify_all();
    }

    /// Abandon the run: drop any resident pair, zero the rounds and wake all
    ///
    /// Waiting consumers see exhaustion and a blocked producer gets
    /// `ShutDown`. Claims still held are released as no-ops.
    pub fn shutdown(&self) {
        let mut state = self.monitor.enter();
        let dropped = state.resident.take();
        state.rounds_remaining = 0;
        state.shut_down = true;
        warn!(
            dropped = ?dropped.map(|r| r.ticket),
            produced = state.produced,
            "exchange shut down"
        );
        state.notify_all();
    }

    /// Wait for a pair newer than `last_seen`, or for exhaustion
    ///
    /// The slot is not cleared. A consumer that cannot use the pair passes its
    /// ticket back as `last_seen` and blocks until the slot changes.
    pub fn try_consume(&self, last_seen: Option<Ticket>) -> Offer {
        let mut state = self.monitor.enter();
        state.wait_while(|s| Self::nothing_new(s, last_seen));
        Self::offer(&state)
    }

    /// `try_consume` bounded by `timeout`
    pub fn try_consume_for(&self, last_seen: Option<Ticket>, timeout: Duration) -> WaitResult<Offer> {
        let mut state = self.monitor.enter();
        state.wait_while_for(timeout, |s| Self::nothing_new(s, last_seen))?;
        Ok(Self::offer(&state))
    }

    fn nothing_new(state: &mut SlotState, last_seen: Option<Ticket>) -> bool {
        match state.resident {
            Some(resident) => Some(resident.ticket) == last_seen,
            None => state.rounds_remaining > 0,
        }
    }

    fn offer(state: &SlotState) -> Offer {
        match state.resident {
            Some(Resident { ticket, pair }) => Offer::Pair(Observed { ticket, pair }),
            None => {
                debug_assert!(state.is_exhausted());
                Offer::Exhausted
            }
        }
    }

    /// Turn an observed pair into a claim if `identity` can use it
    pub fn claim(&self, observed: Observed, identity: Ingredient) -> Option<Claim> {
        if !observed.pair.is_usable_by(identity) {
            return None;
        }
        debug_assert_eq!(observed.pair.claimant(), identity);

        self.sink.record(&SimEvent::PairClaimed {
            ticket: observed.ticket,
            consumer: identity,
            pair: observed.pair,
        });
        Some(Claim {
            ticket: observed.ticket,
            pair: observed.pair,
            consumer: identity,
        })
    }

    /// Clear the slot and wake the producer
    pub fn release(&self, claim: Claim) {
        let mut state = self.monitor.enter();
        if state.shut_down {
            debug!(ticket = claim.ticket, "release after shutdown ignored");
            return;
        }
        debug_assert_eq!(
            state.resident.map(|r| r.ticket),
            Some(claim.ticket),
            "slot cleared by a consumer holding a stale claim"
        );

        state.resident = None;
        state.released += 1;
        debug!(ticket = claim.ticket, consumer = %claim.consumer, "slot cleared");

        self.sink.record(&SimEvent::PairReleased {
            ticket: claim.ticket,
            consumer: claim.consumer,
        });
        state.notify_all();
    }

    pub fn snapshot(&self) -> SlotSnapshot {
        self.monitor.with_lock(|s| SlotSnapshot::from(&*s))
    }

    pub fn stats(&self) -> MonitorStatsSnapshot {
        self.monitor.stats()
    }
}
