/*!
 * Synchronization Primitives
 *
 * The monitor used by both coordinators: one lock, one condition variable,
 * predicate-guarded waits, and broadcasts issued from inside the critical
 * section.
 */

mod monitor;
mod traits;
mod wait;

pub use monitor::{Monitor, MonitorGuard, MonitorStatsSnapshot};
pub use traits::WakeResult;
pub use wait::{WaitError, WaitResult};
