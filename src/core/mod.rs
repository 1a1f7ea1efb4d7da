/*!
 * Core Module
 * Fundamental types, configuration, error handling and the monitor primitive
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod sync;
pub mod types;

// Re-export for convenience
pub use config::{AdmissionConfig, ExchangeConfig, SimConfig};
pub use errors::*;
pub use types::*;
