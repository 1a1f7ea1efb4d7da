/*!
 * Admission Roles
 * Arrival and phase-control workers
 */

use super::coordinator::{Admission, AdmissionCoordinator, SessionReport};
use super::selector::RoomSelector;
use crate::core::errors::CoordResult;
use crate::core::types::{ArrivalId, RoomId};
use std::thread;
use std::time::Duration;

/// Pick a room once and try to get a seat in it
pub fn run_arrival(
    coord: &AdmissionCoordinator,
    arrival: ArrivalId,
    selector: &mut dyn RoomSelector,
) -> CoordResult<Admission> {
    let room = selector.select(arrival, coord.room_count());
    coord.arrive(arrival, room)
}

/// Leave the room open for `admission_window`, then run its session
pub fn run_phase_control(
    coord: &AdmissionCoordinator,
    room: RoomId,
    admission_window: Duration,
) -> CoordResult<SessionReport> {
    if !admission_window.is_zero() {
        thread::sleep(admission_window);
    }
    coord.start_session(room)
}
