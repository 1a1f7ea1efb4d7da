/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * Exhaustion of rounds or sessions is not an error: it is reported through
 * `Offer::Exhausted` and `Admission::Rejected`. The variants below cover
 * caller misuse and driver failures only.
 */

use crate::core::types::{Phase, RoomId};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for coordinator and driver operations
pub type CoordResult<T> = Result<T, CoordError>;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Coordinator errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CoordError {
    #[error("Pair produced after all rounds were exhausted")]
    #[diagnostic(
        code(exchange::produced_after_exhaustion),
        help("The producer must stop once the round counter reaches zero.")
    )]
    ProducedAfterExhaustion,

    #[error("Room {0} does not exist")]
    #[diagnostic(
        code(admission::unknown_room),
        help("Room ids are indices into the configured capacity list.")
    )]
    UnknownRoom(RoomId),

    #[error("Room {room} cannot start a session while {phase}")]
    #[diagnostic(
        code(admission::session_already_started),
        help("Each room runs exactly one session and is never reopened.")
    )]
    SessionAlreadyStarted { room: RoomId, phase: Phase },

    #[error("Coordinator was shut down")]
    #[diagnostic(
        code(driver::shut_down),
        help("The driver aborted the run after a worker could not be started.")
    )]
    ShutDown,

    #[error("Failed to spawn worker {name}: {reason}")]
    #[diagnostic(
        code(driver::spawn_failed),
        help("The OS refused to create a thread. Check thread limits.")
    )]
    WorkerSpawn { name: String, reason: String },

    #[error("Worker {0} panicked")]
    #[diagnostic(
        code(driver::worker_panicked),
        help("A worker thread panicked; this indicates a bug in a role.")
    )]
    WorkerPanicked(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}: {reason}")]
    #[diagnostic(
        code(config::invalid_value),
        help("Check the environment variable for a typo or an out-of-range number.")
    )]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("At least one room is required")]
    #[diagnostic(code(config::no_rooms), help("Set SIM_ROOM_CAPACITIES, e.g. \"4,5,7\"."))]
    NoRooms,

    #[error("Room {0} has zero capacity")]
    #[diagnostic(code(config::zero_capacity), help("Every room must seat at least one arrival."))]
    ZeroCapacity(RoomId),
}
