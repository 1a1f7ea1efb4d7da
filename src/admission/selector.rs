/*!
 * Room Selection
 * Each arrival picks its room once, before trying to get in
 */

use crate::core::types::{ArrivalId, RoomId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait RoomSelector: Send {
    /// Pick one of `rooms` rooms for `arrival`
    fn select(&mut self, arrival: ArrivalId, rooms: usize) -> RoomId;
}

/// Uniformly random room
pub struct RandomRooms {
    rng: StdRng,
}

impl RandomRooms {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

impl RoomSelector for RandomRooms {
    fn select(&mut self, _arrival: ArrivalId, rooms: usize) -> RoomId {
        self.rng.gen_range(0..rooms)
    }
}

/// Always the same room
#[derive(Debug, Clone, Copy)]
pub struct FixedRoom(pub RoomId);

impl RoomSelector for FixedRoom {
    fn select(&mut self, _arrival: ArrivalId, _rooms: usize) -> RoomId {
        self.0
    }
}
