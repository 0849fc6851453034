//! Analysis configuration and validation.

use std::error::Error;
use std::fmt;

use netspace_core::AddressFamily;

/// Parameters for [`ForwardingAnalysis::compute`](crate::ForwardingAnalysis::compute).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Compute per-host and per-edge relations on a rayon pool.
    /// Default: `true`.
    pub parallel: bool,
    /// Below this many hosts the analysis runs serially even when
    /// `parallel` is set. Default: 4.
    pub min_hosts_for_parallel: usize,
    /// Worker threads for a dedicated pool. `None` uses the global rayon
    /// pool. Default: `None`.
    pub max_threads: Option<usize>,
    /// Longest IPv4 connected subnet still treated as a host subnet when
    /// computing delivered-to-subnet. Default: 29.
    pub max_subnet_prefix_length_v4: u8,
    /// IPv6 counterpart of `max_subnet_prefix_length_v4`. Default: 125.
    pub max_subnet_prefix_length_v6: u8,
    /// Leave inactive interfaces out of IP ownership and VRRP elections.
    /// Default: `false`.
    pub exclude_inactive_interfaces: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_hosts_for_parallel: 4,
            max_threads: None,
            max_subnet_prefix_length_v4: 29,
            max_subnet_prefix_length_v6: 125,
            exclude_inactive_interfaces: false,
        }
    }
}

impl AnalysisConfig {
    /// A configuration that never spawns work onto other threads.
    pub fn serial() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// The delivered-to-subnet bound for `family`.
    pub fn max_subnet_prefix_length(&self, family: AddressFamily) -> u8 {
        match family {
            AddressFamily::V4 => self.max_subnet_prefix_length_v4,
            AddressFamily::V6 => self.max_subnet_prefix_length_v6,
        }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        for family in [AddressFamily::V4, AddressFamily::V6] {
            let configured = self.max_subnet_prefix_length(family);
            if configured > family.width() {
                return Err(ConfigError::SubnetLengthOutOfRange {
                    family,
                    configured,
                    max: family.width(),
                });
            }
        }
        Ok(())
    }
}

/// Invalid [`AnalysisConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_threads` was `Some(0)`.
    ZeroThreads,
    /// A subnet length bound exceeds the family width.
    SubnetLengthOutOfRange {
        /// Which bound.
        family: AddressFamily,
        /// The configured value.
        configured: u8,
        /// Family width.
        max: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroThreads => write!(f, "max_threads must be at least 1"),
            Self::SubnetLengthOutOfRange {
                family,
                configured,
                max,
            } => write!(
                f,
                "max subnet prefix length for {family} is {configured}, above the family width {max}"
            ),
        }
    }
}

impl Error for ConfigError {}
