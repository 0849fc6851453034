//! Routing information base for one VRF.

use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use netspace_core::{AddressFamily, Ip, Prefix};
use netspace_ipspace::{AclSpaceBuilder, IpSpace, LineAction};
use netspace_trie::PrefixTrieMultiMap;
use serde::{Deserialize, Serialize};

use crate::route::Route;

/// The selected routes of one VRF, indexed by destination prefix.
///
/// The per-prefix matching IPs are derived on first use and cached until
/// the next mutation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "Vec<Route>", into = "Vec<Route>")]
pub struct Rib {
    v4: PrefixTrieMultiMap<Route>,
    v6: PrefixTrieMultiMap<Route>,
    matching_ips: OnceLock<IndexMap<Prefix, IpSpace>>,
}

impl Default for Rib {
    fn default() -> Self {
        Self {
            v4: PrefixTrieMultiMap::ipv4(),
            v6: PrefixTrieMultiMap::ipv6(),
            matching_ips: OnceLock::new(),
        }
    }
}

impl Rib {
    /// An empty RIB.
    pub fn new() -> Self {
        Self::default()
    }

    /// A RIB holding `routes`.
    pub fn from_routes<I>(routes: I) -> Self
    where
        I: IntoIterator<Item = Route>,
    {
        let mut rib = Self::new();
        for route in routes {
            rib.add_route(route);
        }
        rib
    }

    fn trie(&self, family: AddressFamily) -> &PrefixTrieMultiMap<Route> {
        match family {
            AddressFamily::V4 => &self.v4,
            AddressFamily::V6 => &self.v6,
        }
    }

    fn trie_mut(&mut self, family: AddressFamily) -> &mut PrefixTrieMultiMap<Route> {
        self.matching_ips = OnceLock::new();
        match family {
            AddressFamily::V4 => &mut self.v4,
            AddressFamily::V6 => &mut self.v6,
        }
    }

    /// Add a route. Returns whether it was new.
    pub fn add_route(&mut self, route: Route) -> bool {
        let network = route.network();
        // Both tries span their whole family, so every prefix is covered.
        matches!(self.trie_mut(network.family()).add(network, route), Ok(true))
    }

    /// Remove a route. Returns whether it was present.
    pub fn remove_route(&mut self, route: &Route) -> bool {
        let network = route.network();
        self.trie_mut(network.family()).remove(network, route)
    }

    /// Routes for exactly `prefix`.
    pub fn routes_for(&self, prefix: Prefix) -> &IndexSet<Route> {
        self.trie(prefix.family()).get(prefix)
    }

    /// Every route, more specific prefixes first.
    pub fn routes(&self) -> Vec<&Route> {
        [&self.v4, &self.v6]
            .into_iter()
            .flat_map(|trie| trie.entries())
            .flat_map(|(_, routes)| routes.iter())
            .collect()
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.v4.num_elements() + self.v6.num_elements()
    }

    /// Whether there are no routes.
    pub fn is_empty(&self) -> bool {
        self.v4.is_empty() && self.v6.is_empty()
    }

    /// Every distinct destination prefix.
    pub fn prefixes(&self) -> Vec<Prefix> {
        [&self.v4, &self.v6]
            .into_iter()
            .flat_map(|trie| trie.entries())
            .map(|(prefix, _)| prefix)
            .collect()
    }

    /// Routes of the most specific prefix containing `ip`.
    pub fn longest_prefix_match(&self, ip: Ip) -> &IndexSet<Route> {
        self.trie(ip.family()).longest_prefix_match(ip)
    }

    /// For every RIB prefix, the IPs that select it: the prefix minus
    /// every more specific RIB prefix beneath it.
    pub fn matching_ips(&self) -> &IndexMap<Prefix, IpSpace> {
        self.matching_ips.get_or_init(|| {
            let mut out = IndexMap::new();
            collect_matching_ips(&self.v4, &mut out);
            collect_matching_ips(&self.v6, &mut out);
            out
        })
    }

    /// Union of every RIB prefix.
    pub fn routable_ips(&self) -> IpSpace {
        IpSpace::union(self.prefixes().into_iter().map(IpSpace::family_prefix))
    }
}

/// Bottom-up pass: each keyed node reports itself to its ancestors, which
/// carve those nearest keyed descendants out of their own space.
fn collect_matching_ips(trie: &PrefixTrieMultiMap<Route>, out: &mut IndexMap<Prefix, IpSpace>) {
    trie.fold(|prefix, routes, left: Option<Vec<Prefix>>, right| {
        let mut below = left.unwrap_or_default();
        below.extend(right.unwrap_or_default());
        if routes.is_empty() {
            return below;
        }
        let mut acl = AclSpaceBuilder::new();
        for more_specific in below {
            acl.add_line(LineAction::Deny, IpSpace::family_prefix(more_specific));
        }
        acl.add_line(LineAction::Permit, IpSpace::family_prefix(prefix));
        out.insert(prefix, acl.build());
        vec![prefix]
    });
}

impl PartialEq for Rib {
    fn eq(&self, other: &Self) -> bool {
        self.v4 == other.v4 && self.v6 == other.v6
    }
}

impl Eq for Rib {}

impl From<Vec<Route>> for Rib {
    fn from(routes: Vec<Route>) -> Self {
        Self::from_routes(routes)
    }
}

impl From<Rib> for Vec<Route> {
    fn from(rib: Rib) -> Self {
        rib.routes().into_iter().cloned().collect()
    }
}

impl FromIterator<Route> for Rib {
    fn from_iter<I: IntoIterator<Item = Route>>(iter: I) -> Self {
        Self::from_routes(iter)
    }
}
