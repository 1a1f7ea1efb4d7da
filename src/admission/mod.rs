/*!
 * Admission
 * Capacity-gated seating across rooms that each run one session
 */

mod coordinator;
mod roles;
mod room;
mod selector;

pub use coordinator::{Admission, AdmissionCoordinator, SessionReport};
pub use roles::{run_arrival, run_phase_control};
pub use room::{CinemaSnapshot, Room};
pub use selector::{FixedRoom, RandomRooms, RoomSelector};
