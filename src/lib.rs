/*!
 * Monitor Simulations Library
 *
 * Two bounded-resource coordination problems built on one monitor primitive:
 * - Exchange: a single-slot hand-off of ingredient pairs to three consumers
 * - Admission: arrivals competing for seats in rooms that each run one session
 */

pub mod admission;
pub mod core;
pub mod exchange;
pub mod monitoring;
pub mod sim;

// Re-exports
pub use crate::core::errors::{ConfigError, CoordError, CoordResult};
pub use crate::core::{AdmissionConfig, ExchangeConfig, SimConfig};
pub use monitoring::{init_tracing, EventSink, RecordingSink, SimEvent, TracingSink};
pub use sim::{run_admission, run_exchange, AdmissionReport, ExchangeReport};
