/*!
 * Simulation Drivers
 * Spawn every worker of a simulation, join them, and summarize the run
 */

mod admission;
mod exchange;
mod workers;

pub use admission::{run_admission, AdmissionReport};
pub use exchange::{run_exchange, ExchangeReport};
pub use workers::{Worker, WorkerSet};
