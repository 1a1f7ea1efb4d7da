/*!
 * Simulation Limits and Constants
 *
 * Centralized location for the default sizes and delays of both simulations.
 * Every value here can be overridden at runtime through `SimConfig`.
 */

use std::time::Duration;

// =============================================================================
// EXCHANGE (INGREDIENT HAND-OFF)
// =============================================================================

/// Rounds the producer runs before declaring exhaustion
pub const DEFAULT_ROUNDS: u64 = 8;

/// Pause between two consecutive productions
pub const DEFAULT_PRODUCE_INTERVAL: Duration = Duration::from_secs(1);

/// Simulated work performed by a consumer after claiming a pair
pub const DEFAULT_PREPARE_DURATION: Duration = Duration::from_secs(1);

// =============================================================================
// ADMISSION (ROOMS AND SESSIONS)
// =============================================================================

/// Capacity of each room, one entry per room
pub const DEFAULT_ROOM_CAPACITIES: [usize; 3] = [4, 5, 7];

/// Number of arrival workers spawned by the driver
pub const DEFAULT_ARRIVALS: usize = 100;

/// Time a room spends in session before closing
pub const DEFAULT_SESSION_LENGTH: Duration = Duration::from_secs(2);

/// Delay between spawning the phase-control worker and starting its session.
/// Zero matches a session that starts as soon as its worker is scheduled.
pub const DEFAULT_ADMISSION_WINDOW: Duration = Duration::ZERO;
