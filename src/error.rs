//! Top-level error type for a full run.

use thiserror::Error;

use crate::config::ConfigError;
use crate::io::Hdf5Error;
use crate::partition::DecompositionError;

/// Any fatal error a run can produce. All errors are fatal: the driver
/// prints a diagnostic and exits with status 1.
#[derive(Debug, Error)]
pub enum SfError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Decomposition(#[from] DecompositionError),
    #[error(transparent)]
    Io(#[from] Hdf5Error),
}

impl SfError {
    /// Whether the diagnostic should be followed by the input checklist.
    pub fn wants_checklist(&self) -> bool {
        matches!(self, Self::Io(e) if e.wants_checklist())
    }
}

pub type SfResult<T> = Result<T, SfError>;
