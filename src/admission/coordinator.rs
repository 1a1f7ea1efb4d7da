/*!
 * Admission Coordinator
 *
 * Arrivals compete for seats in a chosen room; one phase-control worker per
 * room runs that room's single session (Open -> InSession -> Closed) and
 * decrements the active-room counter when it ends.
 *
 * An arrival blocks while its room is full or in session. It is released
 * with `Rejected` once its room closes or no room is active any more.
 */

use super::room::{CinemaSnapshot, CinemaState, Room};
use crate::core::config::validate_capacities;
use crate::core::errors::{ConfigResult, CoordError, CoordResult};
use crate::core::sync::{Monitor, MonitorStatsSnapshot};
use crate::core::types::{ArrivalId, Phase, RoomId};
use crate::monitoring::{EventSink, Rejection, SimEvent};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Outcome of one arrival
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Admission {
    Admitted {
        room: RoomId,
        occupancy: usize,
        capacity: usize,
    },
    Rejected {
        room: RoomId,
        reason: Rejection,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted { .. })
    }
}

/// Room state at the end of its session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub room: RoomId,
    pub occupancy: usize,
    pub capacity: usize,
}

pub struct AdmissionCoordinator {
    monitor: Monitor<CinemaState>,
    session_length: Duration,
    sink: Arc<dyn EventSink>,
}

impl AdmissionCoordinator {
    /// Fails unless there is at least one room and every room has a seat
    pub fn new(
        capacities: &[usize],
        session_length: Duration,
        sink: Arc<dyn EventSink>,
    ) -> ConfigResult<Self> {
        validate_capacities(capacities)?;
        Ok(Self {
            monitor: Monitor::new("admission", CinemaState::new(capacities)),
            session_length,
            sink,
        })
    }

    pub fn room_count(&self) -> usize {
        self.monitor.with_lock(|s| s.rooms.len())
    }

    pub fn active_rooms(&self) -> usize {
        self.monitor.with_lock(|s| s.active)
    }

    pub fn room(&self, room: RoomId) -> CoordResult<Room> {
        self.monitor
            .with_lock(|s| s.rooms.get(room).copied())
            .ok_or(CoordError::UnknownRoom(room))
    }

    /// Take a seat in `room`, waiting while it is full or in session
    pub fn arrive(&self, arrival: ArrivalId, room: RoomId) -> CoordResult<Admission> {
        let mut state = self.monitor.enter();
        if room >= state.rooms.len() {
            return Err(CoordError::UnknownRoom(room));
        }

        state.wait_while(|s| s.must_wait(room));

        let rejection = if state.active == 0 {
            Some(Rejection::NoSessionsLeft)
        } else if state.rooms[room].phase == Phase::Closed {
            Some(Rejection::RoomClosed)
        } else {
            None
        };

        if let Some(reason) = rejection {
            state.rejected += 1;
            self.sink.record(&SimEvent::Rejected {
                arrival,
                room,
                reason,
            });
            return Ok(Admission::Rejected { room, reason });
        }

        let target = &mut state.rooms[room];
        debug_assert!(target.has_vacancy());
        target.occupancy += 1;
        let (occupancy, capacity) = (target.occupancy, target.capacity);
        state.admitted += 1;

        self.sink.record(&SimEvent::Admitted {
            arrival,
            room,
            occupancy,
            capacity,
        });
        Ok(Admission::Admitted {
            room,
            occupancy,
            capacity,
        })
    }

    /// Run the single session of `room`
    ///
    /// Admissions to the room freeze while it is in session. The lock is
    /// released for the length of the session.
    pub fn start_session(&self, room: RoomId) -> CoordResult<SessionReport> {
        let mut state = self.monitor.enter();
        let target = state
            .rooms
            .get_mut(room)
            .ok_or(CoordError::UnknownRoom(room))?;
        if target.phase != Phase::Open {
            return Err(CoordError::SessionAlreadyStarted {
                room,
                phase: target.phase,
            });
        }
        target.phase = Phase::InSession;
        self.sink.record(&SimEvent::SessionStarted {
            room,
            occupancy: target.occupancy,
            capacity: target.capacity,
        });

        let length = self.session_length;
        state.unlocked(|| {
            if !length.is_zero() {
                thread::sleep(length);
            }
        });

        let target = &mut state.rooms[room];
        debug_assert_eq!(target.phase, Phase::InSession);
        target.phase = Phase::Closed;
        let report = SessionReport {
            room,
            occupancy: target.occupancy,
            capacity: target.capacity,
        };

        debug_assert!(state.active > 0, "session finished twice");
        state.active -= 1;

        self.sink.record(&SimEvent::SessionFinished {
            room,
            occupancy: report.occupancy,
            capacity: report.capacity,
            active_remaining: state.active,
        });
        state.notify_all();
        Ok(report)
    }

    /// Close every room that has not started its session and wake all waiters
    ///
    /// Rooms already in session finish normally. Used when the driver cannot
    /// start every worker, so arrivals never wait on a session that will not
    /// run. Returns the number of rooms closed.
    pub fn shutdown(&self) -> usize {
        let mut state = self.monitor.enter();
        let mut closed = 0;
        for room in state.rooms.iter_mut().filter(|r| r.phase == Phase::Open) {
            room.phase = Phase::Closed;
            closed += 1;
        }
        state.active -= closed;
        warn!(closed, active = state.active, "admission shut down");
        state.notify_all();
        closed
    }

    pub fn snapshot(&self) -> CinemaSnapshot {
        self.monitor.with_lock(|s| CinemaSnapshot::from(&*s))
    }

    pub fn stats(&self) -> MonitorStatsSnapshot {
        self.monitor.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ConfigError;
    use crate::monitoring::NullSink;

    fn coordinator(capacities: &[usize]) -> AdmissionCoordinator {
        AdmissionCoordinator::new(capacities, Duration::ZERO, Arc::new(NullSink)).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_rooms() {
        let sink: Arc<dyn EventSink> = Arc::new(NullSink);
        assert!(matches!(
            AdmissionCoordinator::new(&[], Duration::ZERO, sink.clone()),
            Err(ConfigError::NoRooms)
        ));
        assert!(matches!(
            AdmissionCoordinator::new(&[2, 0], Duration::ZERO, sink),
            Err(ConfigError::ZeroCapacity(1))
        ));
    }

    #[test]
    fn test_shutdown_releases_blocked_arrival() {
        let coord = Arc::new(coordinator(&[1, 2]));
        coord.arrive(1, 0).unwrap();

        let coord_clone = coord.clone();
        let blocked = std::thread::spawn(move || coord_clone.arrive(2, 0));

        // Give the arrival time to block on the full room
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(coord.shutdown(), 2);

        assert_eq!(
            blocked.join().unwrap().unwrap(),
            Admission::Rejected {
                room: 0,
                reason: Rejection::NoSessionsLeft
            }
        );
        assert_eq!(coord.active_rooms(), 0);
        assert_eq!(
            coord.start_session(1),
            Err(CoordError::SessionAlreadyStarted {
                room: 1,
                phase: Phase::Closed
            })
        );
    }

    #[test]
    fn test_arrive_admits_while_open() {
        let coord = coordinator(&[2]);
        assert_eq!(
            coord.arrive(1, 0).unwrap(),
            Admission::Admitted {
                room: 0,
                occupancy: 1,
                capacity: 2
            }
        );
        assert_eq!(coord.room(0).unwrap().occupancy, 1);
    }

    #[test]
    fn test_unknown_room() {
        let coord = coordinator(&[2]);
        assert_eq!(coord.arrive(1, 5), Err(CoordError::UnknownRoom(5)));
        assert_eq!(coord.start_session(5), Err(CoordError::UnknownRoom(5)));
    }

    #[test]
    fn test_session_runs_once() {
        let coord = coordinator(&[3, 3]);
        coord.arrive(1, 1).unwrap();

        let report = coord.start_session(1).unwrap();
        assert_eq!(report.occupancy, 1);
        assert_eq!(coord.room(1).unwrap().phase, Phase::Closed);
        assert_eq!(coord.active_rooms(), 1);

        assert_eq!(
            coord.start_session(1),
            Err(CoordError::SessionAlreadyStarted {
                room: 1,
                phase: Phase::Closed
            })
        );
    }

    #[test]
    fn test_arrival_at_closed_room_is_rejected() {
        let coord = coordinator(&[1, 1]);
        coord.start_session(0).unwrap();
        assert_eq!(
            coord.arrive(9, 0).unwrap(),
            Admission::Rejected {
                room: 0,
                reason: Rejection::RoomClosed
            }
        );
    }

    #[test]
    fn test_no_sessions_left_takes_precedence() {
        let coord = coordinator(&[1]);
        coord.start_session(0).unwrap();
        assert_eq!(
            coord.arrive(9, 0).unwrap(),
            Admission::Rejected {
                room: 0,
                reason: Rejection::NoSessionsLeft
            }
        );
        assert_eq!(coord.snapshot().rejected, 1);
    }
}
