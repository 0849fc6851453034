//! Value-keyed cache of shared space allocations.

use std::sync::OnceLock;

use dashmap::DashMap;
use netspace_core::{Ip, IpWildcard, Prefix};

use crate::space::{IpSpace, IpSpaceKind};

static EMPTY: OnceLock<IpSpace> = OnceLock::new();
static UNIVERSE: OnceLock<IpSpace> = OnceLock::new();
static GLOBAL: OnceLock<SpaceInterner> = OnceLock::new();

/// Hands out one shared [`IpSpace`] per distinct [`IpSpaceKind`].
///
/// Safe to use from many threads at once: two threads interning the same
/// kind concurrently both receive the allocation that won the insert.
/// Entries live until [`clear`](Self::clear) is called.
#[derive(Debug, Default)]
pub struct SpaceInterner {
    cache: DashMap<IpSpaceKind, IpSpace>,
}

impl SpaceInterner {
    /// An empty interner, independent of the global one.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide interner used by the [`IpSpace`] constructors.
    pub fn global() -> &'static SpaceInterner {
        GLOBAL.get_or_init(SpaceInterner::new)
    }

    /// The empty-space singleton.
    pub fn empty() -> IpSpace {
        EMPTY
            .get_or_init(|| IpSpace::from_kind(IpSpaceKind::Empty))
            .clone()
    }

    /// The universe-space singleton.
    pub fn universe() -> IpSpace {
        UNIVERSE
            .get_or_init(|| IpSpace::from_kind(IpSpaceKind::Universe))
            .clone()
    }

    /// The shared single-address space for `ip`.
    pub fn ip(&self, ip: Ip) -> IpSpace {
        self.intern(IpSpaceKind::Ip(ip))
    }

    /// The shared space for `prefix`; a zero-length prefix is the
    /// universe.
    pub fn prefix(&self, prefix: Prefix) -> IpSpace {
        if prefix.length() == 0 {
            return Self::universe();
        }
        self.intern(IpSpaceKind::Prefix(prefix))
    }

    /// The shared space for `wildcard`, reduced to an address or prefix
    /// when the mask allows.
    ///
    /// A wildcard never matches addresses of the other family, so an
    /// all-"don't care" mask reduces to the whole family, not the universe.
    pub fn wildcard(&self, wildcard: IpWildcard) -> IpSpace {
        if wildcard.is_single_ip() {
            return self.ip(wildcard.ip());
        }
        match wildcard.as_prefix() {
            Some(prefix) if prefix.length() == 0 => self.intern(IpSpaceKind::Prefix(prefix)),
            Some(prefix) => self.prefix(prefix),
            None => self.intern(IpSpaceKind::Wildcard(wildcard)),
        }
    }

    /// The shared reference space for `name`.
    pub fn reference(&self, name: impl Into<String>) -> IpSpace {
        self.intern(IpSpaceKind::Reference(name.into()))
    }

    /// The shared space for an arbitrary kind.
    pub fn intern(&self, kind: IpSpaceKind) -> IpSpace {
        match kind {
            IpSpaceKind::Empty => return Self::empty(),
            IpSpaceKind::Universe => return Self::universe(),
            _ => {}
        }
        if let Some(hit) = self.cache.get(&kind) {
            return hit.value().clone();
        }
        self.cache
            .entry(kind.clone())
            .or_insert_with(|| IpSpace::from_kind(kind))
            .value()
            .clone()
    }

    /// Drop every cached space except the two singletons.
    ///
    /// Spaces handed out earlier stay valid; they just stop being shared
    /// with spaces built afterwards. Call between unrelated snapshots to
    /// bound memory in a long-running process.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Number of cached spaces (singletons excluded).
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn private_interner_shares_by_value() {
        let interner = SpaceInterner::new();
        let a = interner.ip(Ip::from_octets(1, 1, 1, 1));
        let b = interner.ip(Ip::from_octets(1, 1, 1, 1));
        assert!(a.ptr_eq(&b));
        assert_eq!(interner.len(), 1);
    }

    #[test]
    fn singletons_bypass_the_cache() {
        let interner = SpaceInterner::new();
        assert!(interner.intern(IpSpaceKind::Empty).ptr_eq(&IpSpace::empty()));
        assert!(interner
            .prefix(Prefix::zero(netspace_core::AddressFamily::V6))
            .ptr_eq(&IpSpace::universe()));
        assert!(interner.is_empty());
    }

    #[test]
    fn clear_releases_cached_spaces() {
        let interner = SpaceInterner::new();
        let before = interner.prefix("10.0.0.0/8".parse().unwrap());
        interner.reference("lan");
        assert_eq!(interner.len(), 2);

        interner.clear();
        assert!(interner.is_empty());
        assert!(before.contains_ip(Ip::from_octets(10, 1, 2, 3)));

        let after = interner.prefix("10.0.0.0/8".parse().unwrap());
        assert_eq!(after, before);
        assert!(!after.ptr_eq(&before));
        assert!(interner.intern(IpSpaceKind::Universe).ptr_eq(&IpSpace::universe()));
    }

    #[test]
    fn whole_family_wildcard_stays_in_its_family() {
        let interner = SpaceInterner::new();
        let any_v4: IpWildcard = "0.0.0.0:255.255.255.255".parse().unwrap();
        let v6: Ip = "2001:db8::1".parse().unwrap();
        assert!(!any_v4.matches(v6));

        let space = interner.wildcard(any_v4);
        assert!(!space.is_universe());
        assert!(space.contains_ip(Ip::from_octets(203, 0, 113, 9)));
        assert!(!space.contains_ip(v6));
    }

    #[test]
    fn concurrent_interning_agrees() {
        let interner = Arc::new(SpaceInterner::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let interner = Arc::clone(&interner);
                std::thread::spawn(move || interner.reference("shared"))
            })
            .collect();
        let spaces: Vec<IpSpace> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for s in &spaces {
            assert!(s.ptr_eq(&spaces[0]));
        }
    }
}
