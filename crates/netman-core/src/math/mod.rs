//! Mathematical functions module
//!
//! Provides commonly used mathematical functions for RF/microwave engineering.

pub mod conversions;

pub use conversions::*;
