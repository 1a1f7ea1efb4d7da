/*!
 * Monitoring
 * Structured tracing and the event callback invoked at each transition
 */

mod event;
mod sink;
mod tracer;

pub use event::{Rejection, SimEvent};
pub use sink::{EventSink, NullSink, RecordingSink, TracingSink};
pub use tracer::{generate_run_id, init_tracing, RunSpan};
