//! One computed dataplane: everything the forwarding analysis reads.

use indexmap::IndexMap;
use netspace_core::NULL_INTERFACE_NAME;
use serde::{Deserialize, Serialize};

use crate::device::{Configuration, DEFAULT_VRF_NAME};
use crate::error::SnapshotError;
use crate::fib::{Fib, FibConfig};
use crate::ownership::{compute_interface_owned_ips, InterfaceOwnedIps};
use crate::rib::Rib;
use crate::topology::Topology;

/// Hostname → VRF name → `T`.
pub type PerVrf<T> = IndexMap<String, IndexMap<String, T>>;

/// Device configurations, per-VRF RIBs and FIBs, and the topology of
/// one network.
///
/// Build it with the `with_*` methods and check it with
/// [`validate`](Self::validate) before analysis.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataplaneSnapshot {
    configurations: IndexMap<String, Configuration>,
    ribs: PerVrf<Rib>,
    fibs: PerVrf<Fib>,
    #[serde(default)]
    topology: Topology,
}

impl DataplaneSnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a device configuration, keyed by its hostname.
    pub fn with_configuration(mut self, config: Configuration) -> Self {
        self.configurations
            .insert(config.hostname().to_string(), config);
        self
    }

    /// Set the RIB and FIB of `(host, vrf)`.
    pub fn with_tables(
        mut self,
        host: impl Into<String>,
        vrf: impl Into<String>,
        rib: Rib,
        fib: Fib,
    ) -> Self {
        let host = host.into();
        let vrf = vrf.into();
        self.ribs
            .entry(host.clone())
            .or_default()
            .insert(vrf.clone(), rib);
        self.fibs.entry(host).or_default().insert(vrf, fib);
        self
    }

    /// Set the RIB of `(host, vrf)` and derive its FIB.
    pub fn with_rib(
        self,
        host: impl Into<String>,
        vrf: impl Into<String>,
        rib: Rib,
        fib_config: &FibConfig,
    ) -> Self {
        let fib = Fib::from_rib(&rib, fib_config);
        self.with_tables(host, vrf, rib, fib)
    }

    /// Replace the topology.
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    /// Configurations by hostname.
    pub fn configurations(&self) -> &IndexMap<String, Configuration> {
        &self.configurations
    }

    /// RIBs by hostname and VRF.
    pub fn ribs(&self) -> &PerVrf<Rib> {
        &self.ribs
    }

    /// FIBs by hostname and VRF.
    pub fn fibs(&self) -> &PerVrf<Fib> {
        &self.fibs
    }

    /// The topology.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// The RIB of `(host, vrf)`, if any.
    pub fn rib(&self, host: &str, vrf: &str) -> Option<&Rib> {
        self.ribs.get(host)?.get(vrf)
    }

    /// The FIB of `(host, vrf)`, if any.
    pub fn fib(&self, host: &str, vrf: &str) -> Option<&Fib> {
        self.fibs.get(host)?.get(vrf)
    }

    /// VRF of `interface` on `host`, if both exist.
    pub fn interface_vrf(&self, host: &str, interface: &str) -> Option<&str> {
        self.configurations
            .get(host)?
            .interface(interface)
            .map(|i| i.vrf())
    }

    /// IPs owned by each interface, VRRP elections applied.
    pub fn interface_owned_ips(&self, exclude_inactive: bool) -> InterfaceOwnedIps {
        compute_interface_owned_ips(self.configurations.values(), exclude_inactive)
    }

    /// Check that every table and edge refers to a configured host,
    /// interface and VRF, and that RIBs and FIBs come in pairs.
    ///
    /// FIB egress interfaces must exist on the host, except the null
    /// interface.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for (host, vrfs) in &self.ribs {
            let config = self.config(host, "rib")?;
            for vrf in vrfs.keys() {
                check_vrf(config, vrf)?;
                if !self.fibs.get(host).is_some_and(|f| f.contains_key(vrf)) {
                    return Err(SnapshotError::MissingFib {
                        host: host.clone(),
                        vrf: vrf.clone(),
                    });
                }
            }
        }
        for (host, vrfs) in &self.fibs {
            let config = self.config(host, "fib")?;
            for (vrf, fib) in vrfs {
                check_vrf(config, vrf)?;
                if !self.ribs.get(host).is_some_and(|r| r.contains_key(vrf)) {
                    return Err(SnapshotError::MissingRib {
                        host: host.clone(),
                        vrf: vrf.clone(),
                    });
                }
                let unknown = fib
                    .routes_by_next_hop_interface()
                    .keys()
                    .find(|iface| {
                        iface.as_str() != NULL_INTERFACE_NAME && config.interface(iface).is_none()
                    });
                if let Some(iface) = unknown {
                    return Err(SnapshotError::UnknownEgressInterface {
                        host: host.clone(),
                        vrf: vrf.clone(),
                        interface: iface.clone(),
                    });
                }
            }
        }
        for edge in self.topology.edges() {
            for end in [edge.tail(), edge.head()] {
                let config = self.config(end.hostname(), &format!("edge {edge}"))?;
                if config.interface(end.interface()).is_none() {
                    return Err(SnapshotError::UnknownInterface {
                        host: end.hostname().to_string(),
                        interface: end.interface().to_string(),
                        edge: edge.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn config(&self, host: &str, referenced_by: &str) -> Result<&Configuration, SnapshotError> {
        self.configurations
            .get(host)
            .ok_or_else(|| SnapshotError::UnknownHost {
                host: host.to_string(),
                referenced_by: referenced_by.to_string(),
            })
    }
}

/// The default VRF always exists; any other must be used by an interface.
fn check_vrf(config: &Configuration, vrf: &str) -> Result<(), SnapshotError> {
    if vrf == DEFAULT_VRF_NAME || config.vrf_names().contains(&vrf) {
        return Ok(());
    }
    Err(SnapshotError::UnknownVrf {
        host: config.hostname().to_string(),
        vrf: vrf.to_string(),
    })
}
