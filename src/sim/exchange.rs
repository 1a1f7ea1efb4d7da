/*!
 * Exchange Simulation Driver
 * One producer and one consumer per ingredient, spawned and joined together
 */

use super::workers::{Worker, WorkerSet};
use crate::core::config::ExchangeConfig;
use crate::core::errors::CoordResult;
use crate::core::sync::MonitorStatsSnapshot;
use crate::core::types::Ingredient;
use crate::exchange::{
    run_consumer, run_producer, ConsumerReport, ExchangeCoordinator, PairSource, SlotSnapshot,
};
use crate::monitoring::{EventSink, RunSpan};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Summary of a finished exchange run
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeReport {
    pub run_id: String,
    pub rounds: u64,
    pub produced: u64,
    pub consumers: Vec<ConsumerReport>,
    pub slot: SlotSnapshot,
    pub monitor: MonitorStatsSnapshot,
}

impl ExchangeReport {
    pub fn total_claimed(&self) -> u64 {
        self.consumers.iter().map(|c| c.claimed).sum()
    }
}

/// Run the exchange to completion
pub fn run_exchange(
    config: &ExchangeConfig,
    sink: Arc<dyn EventSink>,
    mut source: Box<dyn PairSource>,
) -> CoordResult<ExchangeReport> {
    let run = RunSpan::new("exchange");
    let _entered = run.span().enter();
    info!(rounds = config.rounds, "starting exchange");

    let coord = Arc::new(ExchangeCoordinator::new(config.rounds, sink));

    let producer = {
        let coord = coord.clone();
        let interval = config.produce_interval;
        Worker::spawn("producer", run.span(), move || {
            run_producer(&coord, source.as_mut(), interval)
        })?
    };

    let mut consumers = WorkerSet::new();
    for identity in Ingredient::ALL {
        let worker_coord = coord.clone();
        let prepare = config.prepare_duration;
        let spawned = consumers.spawn(format!("consumer-{identity}"), run.span(), move || {
            run_consumer(&worker_coord, identity, prepare)
        });
        if let Err(e) = spawned {
            // The missing consumer's pairs would never be claimed
            error!(error = %e, "aborting exchange");
            coord.shutdown();
            let _ = producer.join();
            let _ = consumers.join_all();
            return Err(e);
        }
    }

    let produced = producer.join()??;
    let consumers = consumers.join_all()?;

    let report = ExchangeReport {
        run_id: run.run_id().to_string(),
        rounds: config.rounds,
        produced,
        consumers,
        slot: coord.snapshot(),
        monitor: coord.stats(),
    };
    info!(
        produced = report.produced,
        claimed = report.total_claimed(),
        "all consumers have finished"
    );
    Ok(report)
}
