//! Network module - N-port electrical network representation
//!
//! Provides the core Network struct, the `NetworkData` seam for externally
//! parsed measurements, and the analysis operations built on them:
//! S-parameter extraction, mixed-mode conversion, NMSE comparison and
//! impedance extraction.

mod core;
mod extract;
mod impedance;
mod mixed_mode;
mod nmse;
mod params;
mod slicing;
mod zna;

pub use self::core::{Network, NetworkData};
pub use extract::{
    extract_sparams, extract_sparams_keyed, flatten_sparams, sparam_key, sparams_from_flat,
    SParamExtraction, SParamMap,
};
pub use impedance::{
    impedance_one_port, impedance_series_thru, impedance_shunt_thru, ImpedanceResult,
    ImpedanceTopology,
};
pub use mixed_mode::{
    mixed_mode_from_sparams, mixed_mode_key, parse_mixed_mode_key, MixedModeParams, Mode,
    MIXED_MODE_KEYS,
};
pub use nmse::{calc_nmse, NmseReference, NmseResult};
