//! Per-variant traversal of space trees.

use indexmap::IndexSet;
use netspace_core::{Ip, IpWildcard, Prefix};

use crate::space::AclLine;

/// One method per [`IpSpaceKind`](crate::IpSpaceKind) variant.
///
/// Drive a visitor with [`IpSpace::accept`](crate::IpSpace::accept).
/// Visitors that need to descend into ACL lines call `accept` on each
/// line's space themselves.
pub trait IpSpaceVisitor {
    /// Value produced per visited space.
    type Output;

    /// The empty space.
    fn visit_empty(&mut self) -> Self::Output;
    /// The universe space.
    fn visit_universe(&mut self) -> Self::Output;
    /// A single address.
    fn visit_ip(&mut self, ip: Ip) -> Self::Output;
    /// A prefix.
    fn visit_prefix(&mut self, prefix: Prefix) -> Self::Output;
    /// A wildcard.
    fn visit_wildcard(&mut self, wildcard: IpWildcard) -> Self::Output;
    /// An include/exclude wildcard set.
    fn visit_wildcard_set(
        &mut self,
        include: &[IpWildcard],
        exclude: &[IpWildcard],
    ) -> Self::Output;
    /// An ordered ACL.
    fn visit_acl(&mut self, lines: &[AclLine]) -> Self::Output;
    /// A named reference.
    fn visit_reference(&mut self, name: &str) -> Self::Output;
}

/// Collects reference names in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct ReferenceCollector {
    names: IndexSet<String>,
}

impl ReferenceCollector {
    pub(crate) fn into_names(self) -> IndexSet<String> {
        self.names
    }
}

impl IpSpaceVisitor for ReferenceCollector {
    type Output = ();

    fn visit_empty(&mut self) {}
    fn visit_universe(&mut self) {}
    fn visit_ip(&mut self, _ip: Ip) {}
    fn visit_prefix(&mut self, _prefix: Prefix) {}
    fn visit_wildcard(&mut self, _wildcard: IpWildcard) {}
    fn visit_wildcard_set(&mut self, _include: &[IpWildcard], _exclude: &[IpWildcard]) {}

    fn visit_acl(&mut self, lines: &[AclLine]) {
        for line in lines {
            line.space().accept(self);
        }
    }

    fn visit_reference(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_string());
        }
    }
}

/// Counts variant nodes, one per space plus those nested in ACL lines.
pub(crate) struct NodeCounter;

impl IpSpaceVisitor for NodeCounter {
    type Output = usize;

    fn visit_empty(&mut self) -> usize {
        1
    }
    fn visit_universe(&mut self) -> usize {
        1
    }
    fn visit_ip(&mut self, _ip: Ip) -> usize {
        1
    }
    fn visit_prefix(&mut self, _prefix: Prefix) -> usize {
        1
    }
    fn visit_wildcard(&mut self, _wildcard: IpWildcard) -> usize {
        1
    }
    fn visit_wildcard_set(&mut self, _include: &[IpWildcard], _exclude: &[IpWildcard]) -> usize {
        1
    }
    fn visit_acl(&mut self, lines: &[AclLine]) -> usize {
        1 + lines.iter().map(|l| l.space().accept(self)).sum::<usize>()
    }
    fn visit_reference(&mut self, _name: &str) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IpSpace;

    /// Renders prefix spaces only; used to check dispatch.
    struct PrefixLengths(Vec<u8>);

    impl IpSpaceVisitor for PrefixLengths {
        type Output = ();
        fn visit_empty(&mut self) {}
        fn visit_universe(&mut self) {}
        fn visit_ip(&mut self, _ip: Ip) {}
        fn visit_prefix(&mut self, prefix: Prefix) {
            self.0.push(prefix.length());
        }
        fn visit_wildcard(&mut self, _wildcard: IpWildcard) {}
        fn visit_wildcard_set(&mut self, _include: &[IpWildcard], _exclude: &[IpWildcard]) {}
        fn visit_acl(&mut self, lines: &[AclLine]) {
            for line in lines {
                line.space().accept(self);
            }
        }
        fn visit_reference(&mut self, _name: &str) {}
    }

    #[test]
    fn custom_visitor_descends_acl() {
        let s = IpSpace::difference(
            IpSpace::prefix("10.0.0.0/8".parse().unwrap()),
            IpSpace::prefix("10.1.0.0/16".parse().unwrap()),
        );
        let mut v = PrefixLengths(Vec::new());
        s.accept(&mut v);
        assert_eq!(v.0, vec![16, 8]);
    }

    #[test]
    fn node_count_includes_nested_lines() {
        assert_eq!(IpSpace::empty().node_count(), 1);
        let s = IpSpace::prefix("10.0.0.0/8".parse().unwrap()).complement();
        // acl[deny 10/8; permit universe]
        assert_eq!(s.node_count(), 3);
    }

    #[test]
    fn duplicate_references_reported_once() {
        let s = IpSpace::union([
            IpSpace::reference("a"),
            IpSpace::reference("b"),
            IpSpace::reference("a"),
        ]);
        assert_eq!(s.referenced_names().len(), 2);
    }
}
