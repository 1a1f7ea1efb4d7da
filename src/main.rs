/*!
 * Monitor Simulations - Main Entry Point
 *
 * Usage: monitor-sim [exchange|admission|all]
 *
 * Settings come from `SIM_*` environment variables (see `core::config`).
 * Set `SIM_REPORT_JSON=1` to print each run's report as JSON on stdout.
 */

use std::error::Error;
use std::sync::Arc;
use tracing::{error, info};

use monitor_sim::exchange::RandomPairs;
use monitor_sim::{init_tracing, run_admission, run_exchange, SimConfig, TracingSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Exchange,
    Admission,
    All,
}

fn parse_mode(arg: Option<String>) -> Result<Mode, String> {
    match arg.as_deref() {
        None | Some("all") => Ok(Mode::All),
        Some("exchange") => Ok(Mode::Exchange),
        Some("admission") => Ok(Mode::Admission),
        Some(other) => Err(format!(
            "unknown simulation {other:?}; expected exchange, admission or all"
        )),
    }
}

fn print_report<T: serde::Serialize>(report: &T) -> Result<(), Box<dyn Error>> {
    let json = std::env::var("SIM_REPORT_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let mode = parse_mode(std::env::args().nth(1))?;
    let config = match SimConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(?mode, seed = ?config.seed, "Simulation starting");

    let sink = Arc::new(TracingSink);

    if matches!(mode, Mode::Exchange | Mode::All) {
        let source = Box::new(RandomPairs::new(config.seed));
        let report = run_exchange(&config.exchange, sink.clone(), source).map_err(|e| {
            error!(error = %e, "Exchange simulation failed");
            e
        })?;
        print_report(&report)?;
    }

    if matches!(mode, Mode::Admission | Mode::All) {
        let report = run_admission(&config.admission, sink, config.seed).map_err(|e| {
            error!(error = %e, "Admission simulation failed");
            e
        })?;
        print_report(&report)?;
    }

    info!("Simulation completed");
    Ok(())
}
