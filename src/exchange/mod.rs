/*!
 * Exchange
 * Single-slot hand-off between one producer and three consumers
 */

mod coordinator;
mod roles;
mod slot;
mod source;

pub use coordinator::ExchangeCoordinator;
pub use roles::{run_consumer, run_producer, ConsumerReport};
pub use slot::{Claim, Observed, Offer, Resident, SlotSnapshot};
pub use source::{PairSource, RandomPairs, ScriptedPairs};
