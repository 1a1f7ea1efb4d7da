/*!
 * Simulation Configuration
 *
 * Defaults come from `core::limits`; every field can be overridden through
 * environment variables:
 *
 * - `SIM_ROUNDS`: pairs produced by the exchange producer
 * - `SIM_PRODUCE_INTERVAL_MS`: producer pause after each pair
 * - `SIM_PREPARE_MS`: consumer work after a claim
 * - `SIM_ARRIVALS`: arrival workers in the admission simulation
 * - `SIM_ROOM_CAPACITIES`: comma separated capacities, one per room
 * - `SIM_SESSION_MS`: length of each room's session
 * - `SIM_ADMISSION_WINDOW_MS`: delay before a room starts its session
 * - `SIM_SEED`: seed for ingredient and room selection
 */

use super::errors::{ConfigError, ConfigResult};
use super::limits::{
    DEFAULT_ADMISSION_WINDOW, DEFAULT_ARRIVALS, DEFAULT_PREPARE_DURATION,
    DEFAULT_PRODUCE_INTERVAL, DEFAULT_ROOM_CAPACITIES, DEFAULT_ROUNDS, DEFAULT_SESSION_LENGTH,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Exchange (ingredient hand-off) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub rounds: u64,
    pub produce_interval: Duration,
    pub prepare_duration: Duration,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            rounds: DEFAULT_ROUNDS,
            produce_interval: DEFAULT_PRODUCE_INTERVAL,
            prepare_duration: DEFAULT_PREPARE_DURATION,
        }
    }
}

/// Admission (rooms and sessions) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionConfig {
    pub capacities: Vec<usize>,
    pub arrivals: usize,
    pub session_length: Duration,
    pub admission_window: Duration,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            capacities: DEFAULT_ROOM_CAPACITIES.to_vec(),
            arrivals: DEFAULT_ARRIVALS,
            session_length: DEFAULT_SESSION_LENGTH,
            admission_window: DEFAULT_ADMISSION_WINDOW,
        }
    }
}

impl AdmissionConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        validate_capacities(&self.capacities)
    }
}

/// At least one room, and every room with at least one seat
pub fn validate_capacities(capacities: &[usize]) -> ConfigResult<()> {
    if capacities.is_empty() {
        return Err(ConfigError::NoRooms);
    }
    if let Some(room) = capacities.iter().position(|&c| c == 0) {
        return Err(ConfigError::ZeroCapacity(room));
    }
    Ok(())
}

/// Top-level configuration for both simulations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub exchange: ExchangeConfig,
    pub admission: AdmissionConfig,
    /// Fixed seed for reproducible selection; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Zero-delay settings for tests and benchmarks
    pub fn fast() -> Self {
        Self {
            exchange: ExchangeConfig {
                produce_interval: Duration::ZERO,
                prepare_duration: Duration::ZERO,
                ..Default::default()
            },
            admission: AdmissionConfig {
                session_length: Duration::ZERO,
                ..Default::default()
            },
            seed: None,
        }
    }

    /// Defaults overridden by `SIM_*` environment variables
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, or a map in tests)
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(rounds) = parse_var(&lookup, "SIM_ROUNDS")? {
            config.exchange.rounds = rounds;
        }
        if let Some(ms) = parse_var(&lookup, "SIM_PRODUCE_INTERVAL_MS")? {
            config.exchange.produce_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "SIM_PREPARE_MS")? {
            config.exchange.prepare_duration = Duration::from_millis(ms);
        }
        if let Some(arrivals) = parse_var(&lookup, "SIM_ARRIVALS")? {
            config.admission.arrivals = arrivals;
        }
        if let Some(raw) = lookup("SIM_ROOM_CAPACITIES") {
            config.admission.capacities = parse_capacities(&raw)?;
        }
        if let Some(ms) = parse_var(&lookup, "SIM_SESSION_MS")? {
            config.admission.session_length = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "SIM_ADMISSION_WINDOW_MS")? {
            config.admission.admission_window = Duration::from_millis(ms);
        }
        config.seed = parse_var(&lookup, "SIM_SEED")?;

        config.admission.validate()?;
        Ok(config)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

fn parse_capacities(raw: &str) -> ConfigResult<Vec<usize>> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "SIM_ROOM_CAPACITIES".to_string(),
                    value: raw.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect()
}
