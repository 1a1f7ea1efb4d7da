/*!
 * Rooms
 * Per-room occupancy and phase plus the global active-room counter
 */

use crate::core::types::{Phase, RoomId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Room {
    pub occupancy: usize,
    pub capacity: usize,
    pub phase: Phase,
}

impl Room {
    pub fn new(capacity: usize) -> Self {
        Self {
            occupancy: 0,
            capacity,
            phase: Phase::Open,
        }
    }

    /// Open with a free seat
    #[inline]
    pub fn has_vacancy(&self) -> bool {
        self.phase == Phase::Open && self.occupancy < self.capacity
    }
}

/// State owned by the admission monitor
#[derive(Debug)]
pub(crate) struct CinemaState {
    pub(crate) rooms: Vec<Room>,
    /// Rooms whose session has not concluded yet
    pub(crate) active: usize,
    pub(crate) admitted: u64,
    pub(crate) rejected: u64,
}

impl CinemaState {
    pub(crate) fn new(capacities: &[usize]) -> Self {
        Self {
            rooms: capacities.iter().map(|&c| Room::new(c)).collect(),
            active: capacities.len(),
            admitted: 0,
            rejected: 0,
        }
    }

    /// Whether an arrival targeting `room` has to keep waiting
    pub(crate) fn must_wait(&self, room: RoomId) -> bool {
        let target = &self.rooms[room];
        self.active > 0 && target.phase != Phase::Closed && !target.has_vacancy()
    }
}

/// Consistent copy of every room taken under the lock
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CinemaSnapshot {
    pub rooms: Vec<Room>,
    pub active: usize,
    pub admitted: u64,
    pub rejected: u64,
}

impl From<&CinemaState> for CinemaSnapshot {
    fn from(state: &CinemaState) -> Self {
        Self {
            rooms: state.rooms.clone(),
            active: state.active,
            admitted: state.admitted,
            rejected: state.rejected,
        }
    }
}
