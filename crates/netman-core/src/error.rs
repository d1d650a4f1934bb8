//! Error types for network analysis operations.

use thiserror::Error;

/// Errors raised while validating, ingesting or comparing network data.
///
/// Every variant is a deterministic validation failure; nothing here is
/// worth retrying.
#[derive(Error, Debug)]
pub enum NetmanError {
    /// Input does not have the shape of a network (wrong rank, non-square
    /// scattering matrix, missing S-parameter keys, ...).
    #[error("Invalid network input: {0}")]
    InvalidInputKind(String),

    #[error("Port count mismatch: expected {expected}, got {actual}")]
    PortCountMismatch { expected: usize, actual: usize },

    /// Number of frequency points differs between two datasets.
    #[error("Length mismatch: expected {expected} points, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Number of output keys does not match the flattened data width.
    #[error("Dimension mismatch: expected {expected} values per row, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for network analysis operations.
pub type Result<T> = std::result::Result<T, NetmanError>;
