/*!
 * Admission Simulation Driver
 * All arrivals first, then one phase-control worker per room
 */

use super::workers::WorkerSet;
use crate::admission::{
    run_arrival, run_phase_control, Admission, AdmissionCoordinator, RandomRooms, Room,
    SessionReport,
};
use crate::core::config::AdmissionConfig;
use crate::core::errors::CoordResult;
use crate::core::sync::MonitorStatsSnapshot;
use crate::monitoring::{EventSink, RunSpan};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Summary of a finished admission run
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionReport {
    pub run_id: String,
    pub arrivals: usize,
    pub admitted: usize,
    pub rejected: usize,
    pub rooms: Vec<Room>,
    pub sessions: Vec<SessionReport>,
    pub monitor: MonitorStatsSnapshot,
}

/// Run the admission simulation to completion
///
/// Each arrival draws its room from its own generator; with a `seed` the
/// draws are reproducible per arrival, not the interleaving.
pub fn run_admission(
    config: &AdmissionConfig,
    sink: Arc<dyn EventSink>,
    seed: Option<u64>,
) -> CoordResult<AdmissionReport> {
    config.validate()?;

    let run = RunSpan::new("admission");
    let _entered = run.span().enter();
    info!(
        rooms = config.capacities.len(),
        arrivals = config.arrivals,
        "starting admission"
    );

    let coord = Arc::new(AdmissionCoordinator::new(
        &config.capacities,
        config.session_length,
        sink,
    )?);

    let mut arrivals = WorkerSet::new();
    let mut rooms = WorkerSet::new();
    if let Err(e) = spawn_workers(&coord, config, seed, &run, &mut arrivals, &mut rooms) {
        // Arrivals already running would otherwise wait on sessions that never start
        error!(error = %e, "aborting admission");
        coord.shutdown();
        let _ = arrivals.join_all();
        let _ = rooms.join_all();
        return Err(e);
    }

    let outcomes = arrivals
        .join_all()?
        .into_iter()
        .collect::<CoordResult<Vec<Admission>>>()?;
    let sessions = rooms
        .join_all()?
        .into_iter()
        .collect::<CoordResult<Vec<SessionReport>>>()?;

    let admitted = outcomes.iter().filter(|a| a.is_admitted()).count();
    let report = AdmissionReport {
        run_id: run.run_id().to_string(),
        arrivals: config.arrivals,
        admitted,
        rejected: outcomes.len() - admitted,
        rooms: coord.snapshot().rooms,
        sessions,
        monitor: coord.stats(),
    };
    info!(
        admitted = report.admitted,
        rejected = report.rejected,
        "simulation completed"
    );
    Ok(report)
}

fn spawn_workers(
    coord: &Arc<AdmissionCoordinator>,
    config: &AdmissionConfig,
    seed: Option<u64>,
    run: &RunSpan,
    arrivals: &mut WorkerSet<CoordResult<Admission>>,
    rooms: &mut WorkerSet<CoordResult<SessionReport>>,
) -> CoordResult<()> {
    for arrival in 1..=config.arrivals {
        let coord = coord.clone();
        let mut selector = RandomRooms::new(seed.map(|s| s.wrapping_add(arrival as u64)));
        arrivals.spawn(format!("arrival-{arrival}"), run.span(), move || {
            run_arrival(&coord, arrival, &mut selector)
        })?;
    }

    for room in 0..config.capacities.len() {
        let coord = coord.clone();
        let window = config.admission_window;
        rooms.spawn(format!("room-{room}"), run.span(), move || {
            run_phase_control(&coord, room, window)
        })?;
    }
    Ok(())
}
