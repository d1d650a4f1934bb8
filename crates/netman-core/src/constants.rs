//! Numerical constants for RF calculations
//!
//! Provides standardized tolerance values and other numerical constants
//! used throughout the library.

/// Tolerance for detecting near-zero values in division and singularity checks.
/// Used to prevent division by zero when a closed-form relation has a pole.
pub const NEAR_ZERO: f64 = 1e-15;

/// Guard added before taking a logarithm of a power quantity.
/// Machine epsilon of `f64`, so `10*log10(0 + DB_EPS)` is finite (about -156.5 dB).
pub const DB_EPS: f64 = f64::EPSILON;

/// Reference impedance in ohms for networks built without explicit port impedances.
pub const DEFAULT_Z0: f64 = 50.0;

/// Header rows at the top of a ZNA mixed-mode CSV export.
pub const ZNA_HEADER_ROWS: usize = 3;

/// Columns per ZNA data row: frequency + 16 (re, im) pairs.
pub const ZNA_COLUMNS: usize = 33;
