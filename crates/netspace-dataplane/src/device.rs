//! Device configuration: hosts, interfaces, addresses and VRRP groups.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use netspace_core::{AddressError, Ip, Prefix};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Name of the VRF an interface belongs to unless told otherwise.
pub const DEFAULT_VRF_NAME: &str = "default";

// ── InterfaceAddress ───────────────────────────────────────────────

/// An address configured on an interface together with its subnet
/// length, as in `10.0.0.1/24`.
///
/// Unlike [`Prefix`], the host bits are kept.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceAddress {
    ip: Ip,
    prefix_length: u8,
}

impl InterfaceAddress {
    /// Pair `ip` with a subnet length valid for its family.
    pub fn new(ip: Ip, prefix_length: u8) -> Result<Self, AddressError> {
        let max = ip.family().width();
        if prefix_length > max {
            return Err(AddressError::InvalidPrefixLength {
                length: prefix_length,
                max,
            });
        }
        Ok(Self { ip, prefix_length })
    }

    /// The configured address.
    pub fn ip(self) -> Ip {
        self.ip
    }

    /// Subnet length.
    pub fn prefix_length(self) -> u8 {
        self.prefix_length
    }

    /// The connected subnet.
    pub fn prefix(self) -> Prefix {
        Prefix::new(self.ip, self.prefix_length).unwrap_or_else(|_| Prefix::host(self.ip))
    }
}

impl fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.prefix_length)
    }
}

impl fmt::Debug for InterfaceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl FromStr for InterfaceAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || AddressError::Parse {
            input: s.to_string(),
        };
        let (ip, len) = s.trim().split_once('/').ok_or_else(parse_err)?;
        let ip: Ip = ip.parse().map_err(|_| parse_err())?;
        let len: u8 = len.parse().map_err(|_| parse_err())?;
        Self::new(ip, len)
    }
}

impl Serialize for InterfaceAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for InterfaceAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ── VrrpGroup ──────────────────────────────────────────────────────

/// One VRRP group configured on an interface.
///
/// Every interface configuring the same `(group id, virtual address)`
/// competes for it; only the winner owns the virtual address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VrrpGroup {
    /// Election priority; higher wins.
    pub priority: u8,
    /// The shared address. A group without one can never win.
    pub virtual_address: Option<Ip>,
}

impl VrrpGroup {
    /// A group with the given priority and virtual address.
    pub fn new(priority: u8, virtual_address: Ip) -> Self {
        Self {
            priority,
            virtual_address: Some(virtual_address),
        }
    }
}

// ── Interface ──────────────────────────────────────────────────────

/// A device interface.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    name: String,
    vrf: String,
    active: bool,
    proxy_arp: bool,
    addresses: Vec<InterfaceAddress>,
    vrrp_groups: IndexMap<u32, VrrpGroup>,
}

impl Interface {
    /// Start building an interface called `name`: active, in the
    /// default VRF, without proxy-ARP or addresses.
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            iface: Interface {
                name: name.into(),
                vrf: DEFAULT_VRF_NAME.to_string(),
                active: true,
                proxy_arp: false,
                addresses: Vec::new(),
                vrrp_groups: IndexMap::new(),
            },
        }
    }

    /// Interface name, unique within its device.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// VRF the interface forwards in.
    pub fn vrf(&self) -> &str {
        &self.vrf
    }

    /// Whether the interface is administratively and operationally up.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Whether the interface answers ARP on behalf of routable addresses.
    pub fn proxy_arp(&self) -> bool {
        self.proxy_arp
    }

    /// The first configured address, if any.
    pub fn primary_address(&self) -> Option<InterfaceAddress> {
        self.addresses.first().copied()
    }

    /// Primary then secondary addresses.
    pub fn all_addresses(&self) -> &[InterfaceAddress] {
        &self.addresses
    }

    /// VRRP groups by group id.
    pub fn vrrp_groups(&self) -> &IndexMap<u32, VrrpGroup> {
        &self.vrrp_groups
    }
}

/// Builder for [`Interface`].
#[derive(Clone, Debug)]
pub struct InterfaceBuilder {
    iface: Interface,
}

impl InterfaceBuilder {
    /// Place the interface in `vrf`.
    pub fn vrf(mut self, vrf: impl Into<String>) -> Self {
        self.iface.vrf = vrf.into();
        self
    }

    /// Set the active flag.
    pub fn active(mut self, active: bool) -> Self {
        self.iface.active = active;
        self
    }

    /// Set the proxy-ARP flag.
    pub fn proxy_arp(mut self, proxy_arp: bool) -> Self {
        self.iface.proxy_arp = proxy_arp;
        self
    }

    /// Add an address. The first one added is the primary.
    pub fn address(mut self, address: InterfaceAddress) -> Self {
        self.iface.addresses.push(address);
        self
    }

    /// Add (or replace) VRRP group `id`.
    pub fn vrrp_group(mut self, id: u32, group: VrrpGroup) -> Self {
        self.iface.vrrp_groups.insert(id, group);
        self
    }

    /// Finish.
    pub fn build(self) -> Interface {
        self.iface
    }
}

// ── Configuration ──────────────────────────────────────────────────

/// One device: a hostname and its interfaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    hostname: String,
    interfaces: IndexMap<String, Interface>,
}

impl Configuration {
    /// Start building the configuration of `hostname`.
    pub fn builder(hostname: impl Into<String>) -> ConfigurationBuilder {
        ConfigurationBuilder {
            config: Configuration {
                hostname: hostname.into(),
                interfaces: IndexMap::new(),
            },
        }
    }

    /// Device hostname.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Every interface by name.
    pub fn all_interfaces(&self) -> &IndexMap<String, Interface> {
        &self.interfaces
    }

    /// Look up one interface.
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }

    /// Active interfaces only.
    pub fn active_interfaces(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces.values().filter(|i| i.active())
    }

    /// Distinct VRF names used by this device's interfaces.
    pub fn vrf_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for iface in self.interfaces.values() {
            if !names.contains(&iface.vrf()) {
                names.push(iface.vrf());
            }
        }
        names
    }
}

/// Builder for [`Configuration`].
#[derive(Clone, Debug)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    /// Add an interface, replacing any with the same name.
    pub fn interface(mut self, iface: Interface) -> Self {
        self.config.interfaces.insert(iface.name.clone(), iface);
        self
    }

    /// Finish.
    pub fn build(self) -> Configuration {
        self.config
    }
}
