//! Per-call analysis options
//!
//! Display preferences are passed explicitly into each operation instead
//! of living in process-wide flags, so every call is self-contained.

/// Scale in which NMSE figures are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NmseScale {
    /// Plain power ratio
    #[default]
    Linear,
    /// `10*log10(|x| + DB_EPS)`
    Db,
}

/// Options for [`crate::network::calc_nmse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NmseOptions {
    pub scale: NmseScale,
    /// Emit the result through `tracing` at info level
    pub echo: bool,
}

impl NmseOptions {
    /// Report results in dB
    pub fn with_db(mut self) -> Self {
        self.scale = NmseScale::Db;
        self
    }

    /// Echo results through the log
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }
}

/// Options for S-parameter extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Log the detected port count at info level
    pub echo: bool,
}

impl ExtractOptions {
    pub fn with_echo(mut self) -> Self {
        self.echo = true;
        self
    }
}
