/*!
 * Exchange Roles
 * Producer and consumer loops run on their own threads by the driver
 */

use super::coordinator::ExchangeCoordinator;
use super::slot::Offer;
use super::source::PairSource;
use crate::core::errors::CoordResult;
use crate::core::types::{Ingredient, Ticket};
use crate::monitoring::SimEvent;
use serde::Serialize;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// What one consumer did before exiting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsumerReport {
    pub consumer: Ingredient,
    pub claimed: u64,
}

/// Produce until the round counter reaches zero, then broadcast exhaustion
///
/// Returns the number of pairs produced.
pub fn run_producer(
    coord: &ExchangeCoordinator,
    source: &mut dyn PairSource,
    interval: Duration,
) -> CoordResult<u64> {
    let mut produced = 0;
    let mut remaining = coord.rounds_remaining();

    while remaining > 0 {
        remaining = coord.produce(source.next_pair())?;
        produced += 1;
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }

    coord.declare_exhausted();
    Ok(produced)
}

/// Consume pairs usable by `identity` until the coordinator is exhausted
pub fn run_consumer(
    coord: &ExchangeCoordinator,
    identity: Ingredient,
    prepare: Duration,
) -> ConsumerReport {
    let mut last_seen: Option<Ticket> = None;
    let mut claimed = 0;

    loop {
        let observed = match coord.try_consume(last_seen) {
            Offer::Exhausted => break,
            Offer::Pair(observed) => observed,
        };
        last_seen = Some(observed.ticket);

        let Some(claim) = coord.claim(observed, identity) else {
            // Someone else's pair; wait for the slot to change
            debug!(consumer = %identity, ticket = observed.ticket, "pair not usable");
            continue;
        };

        if !prepare.is_zero() {
            thread::sleep(prepare);
        }
        coord.release(claim);
        claimed += 1;
    }

    coord.sink().record(&SimEvent::ConsumerExited {
        consumer: identity,
        claimed,
    });
    ConsumerReport {
        consumer: identity,
        claimed,
    }
}
