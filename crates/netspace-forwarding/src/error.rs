//! Analysis errors.

use std::error::Error;
use std::fmt;

use netspace_dataplane::SnapshotError;

use crate::config::ConfigError;

/// Why a forwarding analysis could not run.
///
/// The analysis either produces every relation or none; there is no
/// partial result.
#[derive(Debug)]
pub enum AnalysisError {
    /// The [`AnalysisConfig`](crate::AnalysisConfig) failed validation.
    Config(ConfigError),
    /// The snapshot refers to hosts, interfaces or VRFs it does not define.
    Snapshot(SnapshotError),
    /// The dedicated worker pool could not be created.
    ThreadPool {
        /// Message from rayon.
        reason: String,
    },
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid analysis config: {e}"),
            Self::Snapshot(e) => write!(f, "malformed dataplane snapshot: {e}"),
            Self::ThreadPool { reason } => write!(f, "failed to build thread pool: {reason}"),
        }
    }
}

impl Error for AnalysisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Snapshot(e) => Some(e),
            Self::ThreadPool { .. } => None,
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<SnapshotError> for AnalysisError {
    fn from(e: SnapshotError) -> Self {
        Self::Snapshot(e)
    }
}
