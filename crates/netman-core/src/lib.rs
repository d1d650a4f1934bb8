//! netman-core: S-parameter network analysis
//!
//! Batch analysis of multi-port S-parameter sweeps held in memory.
//!
//! ## Modules
//!
//! - `frequency` - Frequency sweep representation
//! - `network` - N-port network, extraction, mixed-mode, NMSE, impedance
//! - `math` - dB conversions
//! - `config` - Per-call options
//! - `error` - Error taxonomy

pub mod config;
pub mod constants;
pub mod error;
pub mod frequency;
pub mod math;
pub mod network;

pub use config::{ExtractOptions, NmseOptions, NmseScale};
pub use error::{NetmanError, Result};
pub use frequency::Frequency;
pub use network::{MixedModeParams, Network, NetworkData};
