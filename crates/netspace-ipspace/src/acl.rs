//! Ordered ACL-style composition of spaces.

use crate::space::{AclLine, IpSpace, IpSpaceKind, LineAction};

/// Accumulates `(action, space)` lines and builds the resulting space.
///
/// The first line whose space contains an address decides it; an
/// address no line matches is denied. [`build`](Self::build) reduces
/// degenerate line lists:
///
/// - lines over the empty space never match and are dropped;
/// - lines after a universe line are unreachable and are dropped;
/// - trailing deny lines agree with the default and are dropped;
/// - no lines at all is the empty space;
/// - a single permit line is just its space.
#[derive(Clone, Debug, Default)]
pub struct AclSpaceBuilder {
    lines: Vec<AclLine>,
}

impl AclSpaceBuilder {
    /// A builder with no lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder whose first line permits `space`.
    pub fn permitting(space: IpSpace) -> Self {
        Self::new().then_permitting(space)
    }

    /// A builder whose first line denies `space`.
    pub fn rejecting(space: IpSpace) -> Self {
        Self::new().then_rejecting(space)
    }

    /// Append a permit line.
    pub fn then_permitting(self, space: IpSpace) -> Self {
        self.then_action(LineAction::Permit, space)
    }

    /// Append a deny line.
    pub fn then_rejecting(self, space: IpSpace) -> Self {
        self.then_action(LineAction::Deny, space)
    }

    /// Append a line with an explicit action.
    pub fn then_action(mut self, action: LineAction, space: IpSpace) -> Self {
        self.add_line(action, space);
        self
    }

    /// Append a permit line per space, in iteration order.
    pub fn then_permitting_all<I>(mut self, spaces: I) -> Self
    where
        I: IntoIterator<Item = IpSpace>,
    {
        for space in spaces {
            self.add_line(LineAction::Permit, space);
        }
        self
    }

    /// Append a line in place.
    pub fn add_line(&mut self, action: LineAction, space: IpSpace) {
        self.lines.push(AclLine::new(action, space));
    }

    /// Number of lines added so far.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no lines have been added.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Produce the space.
    pub fn build(self) -> IpSpace {
        let mut lines = Vec::with_capacity(self.lines.len());
        for line in self.lines {
            if line.space().is_empty_space() {
                continue;
            }
            let terminal = line.space().is_universe();
            lines.push(line);
            if terminal {
                break;
            }
        }
        while lines
            .last()
            .is_some_and(|l| l.action() == LineAction::Deny)
        {
            lines.pop();
        }
        match lines.as_slice() {
            [] => IpSpace::empty(),
            [only] if only.action() == LineAction::Permit => only.space().clone(),
            _ => IpSpace::from_kind(IpSpaceKind::Acl(lines)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netspace_core::Ip;

    fn prefix(s: &str) -> IpSpace {
        IpSpace::prefix(s.parse().unwrap())
    }

    #[test]
    fn zero_lines_is_empty() {
        assert!(AclSpaceBuilder::new().build().is_empty_space());
    }

    #[test]
    fn only_denies_is_empty() {
        let s = AclSpaceBuilder::rejecting(prefix("1.0.0.0/8"))
            .then_rejecting(prefix("2.0.0.0/8"))
            .build();
        assert!(s.is_empty_space());
    }

    #[test]
    fn single_permit_collapses() {
        let p = prefix("1.0.0.0/8");
        assert_eq!(AclSpaceBuilder::permitting(p.clone()).build(), p);
    }

    #[test]
    fn empty_lines_are_skipped() {
        let p = prefix("1.0.0.0/8");
        let s = AclSpaceBuilder::rejecting(IpSpace::empty())
            .then_permitting(IpSpace::empty())
            .then_permitting(p.clone())
            .build();
        assert_eq!(s, p);
    }

    #[test]
    fn universe_line_ends_the_list() {
        let s = AclSpaceBuilder::rejecting(prefix("1.0.0.0/8"))
            .then_permitting(IpSpace::universe())
            .then_rejecting(prefix("2.0.0.0/8"))
            .build();
        let IpSpaceKind::Acl(lines) = s.kind() else {
            panic!("expected an acl, got {s}");
        };
        assert_eq!(lines.len(), 2);
        assert!(s.contains_ip(Ip::from_octets(2, 0, 0, 1)));
        assert!(!s.contains_ip(Ip::from_octets(1, 0, 0, 1)));
    }

    #[test]
    fn first_match_wins() {
        let s = AclSpaceBuilder::permitting(prefix("1.1.1.0/24"))
            .then_rejecting(prefix("1.1.0.0/16"))
            .then_permitting(prefix("1.0.0.0/8"))
            .build();
        assert!(s.contains_ip(Ip::from_octets(1, 1, 1, 1)));
        assert!(!s.contains_ip(Ip::from_octets(1, 1, 2, 1)));
        assert!(s.contains_ip(Ip::from_octets(1, 2, 2, 1)));
        assert!(!s.contains_ip(Ip::from_octets(2, 2, 2, 1)));
    }
}
