//! The [`IpSpace`] value type and its containment and complement rules.

use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use netspace_core::{AddressFamily, Ip, IpWildcard, Prefix};
use serde::{Deserialize, Serialize};

use crate::acl::AclSpaceBuilder;
use crate::interner::SpaceInterner;
use crate::repr::IpSpaceRepr;
use crate::visitor::{IpSpaceVisitor, NodeCounter, ReferenceCollector};

/// Name → space table used to resolve [`IpSpaceKind::Reference`].
///
/// A name with no binding denotes the empty space.
pub type NamedIpSpaces = IndexMap<String, IpSpace>;

/// Outcome of an ACL line whose space matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineAction {
    /// The address is in the set.
    Permit,
    /// The address is not in the set.
    Deny,
}

impl LineAction {
    /// The opposite action.
    pub const fn flip(self) -> Self {
        match self {
            Self::Permit => Self::Deny,
            Self::Deny => Self::Permit,
        }
    }
}

impl fmt::Display for LineAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permit => write!(f, "permit"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

/// One `(action, space)` line of an ordered ACL space.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AclLine {
    action: LineAction,
    space: IpSpace,
}

impl AclLine {
    /// Create a line.
    pub fn new(action: LineAction, space: IpSpace) -> Self {
        Self { action, space }
    }

    /// A permit line.
    pub fn permit(space: IpSpace) -> Self {
        Self::new(LineAction::Permit, space)
    }

    /// A deny line.
    pub fn deny(space: IpSpace) -> Self {
        Self::new(LineAction::Deny, space)
    }

    /// Action taken when `space` matches.
    pub fn action(&self) -> LineAction {
        self.action
    }

    /// Addresses this line matches.
    pub fn space(&self) -> &IpSpace {
        &self.space
    }
}

/// The closed set of IP space shapes.
///
/// Structural equality and hashing: two kinds built along different
/// paths that happen to denote the same addresses are not necessarily
/// equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum IpSpaceKind {
    /// No addresses.
    Empty,
    /// Every address of every family.
    Universe,
    /// Exactly one address.
    Ip(Ip),
    /// All addresses under a canonical prefix.
    Prefix(Prefix),
    /// All addresses matching a wildcard.
    Wildcard(IpWildcard),
    /// Union of `include` minus union of `exclude`.
    WildcardSet {
        /// Wildcards whose union is admitted.
        include: Vec<IpWildcard>,
        /// Wildcards whose union is then removed.
        exclude: Vec<IpWildcard>,
    },
    /// Ordered lines; the first matching line decides, default deny.
    Acl(Vec<AclLine>),
    /// Indirection through a [`NamedIpSpaces`] table.
    Reference(String),
}

/// An immutable set of IP addresses.
///
/// Cloning is an `Arc` bump. Elementary spaces are interned, so
/// [`IpSpace::ptr_eq`] holds for two separately built copies of the
/// same prefix.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "IpSpaceRepr", into = "IpSpaceRepr")]
pub struct IpSpace(Arc<IpSpaceKind>);

impl IpSpace {
    pub(crate) fn from_kind(kind: IpSpaceKind) -> Self {
        Self(Arc::new(kind))
    }

    /// The empty space (process-wide singleton).
    pub fn empty() -> Self {
        SpaceInterner::empty()
    }

    /// The universe space (process-wide singleton).
    pub fn universe() -> Self {
        SpaceInterner::universe()
    }

    /// The space holding exactly `ip`.
    pub fn ip(ip: Ip) -> Self {
        SpaceInterner::global().ip(ip)
    }

    /// The space of `prefix`. A zero-length prefix is the universe.
    pub fn prefix(prefix: Prefix) -> Self {
        SpaceInterner::global().prefix(prefix)
    }

    /// Every address of one family.
    ///
    /// `prefix(0.0.0.0/0)` is the universe and so also holds IPv6
    /// addresses; this space does not.
    pub fn whole_family(family: AddressFamily) -> Self {
        SpaceInterner::global().intern(IpSpaceKind::Prefix(Prefix::zero(family)))
    }

    /// The space of `prefix`, with a zero-length prefix covering only
    /// its own family.
    pub fn family_prefix(prefix: Prefix) -> Self {
        if prefix.length() == 0 {
            Self::whole_family(prefix.family())
        } else {
            Self::prefix(prefix)
        }
    }

    /// The space matching `wildcard`, reduced to a single address or a
    /// prefix when the mask allows it. An all-"don't care" mask reduces
    /// to [`whole_family`](Self::whole_family).
    pub fn wildcard(wildcard: IpWildcard) -> Self {
        SpaceInterner::global().wildcard(wildcard)
    }

    /// A named reference, resolved at evaluation time.
    pub fn reference(name: impl Into<String>) -> Self {
        SpaceInterner::global().reference(name)
    }

    /// Union of `spaces`, in order.
    pub fn union<I>(spaces: I) -> Self
    where
        I: IntoIterator<Item = IpSpace>,
    {
        AclSpaceBuilder::new().then_permitting_all(spaces).build()
    }

    /// Addresses in `minuend` but not in `subtrahend`.
    pub fn difference(minuend: IpSpace, subtrahend: IpSpace) -> Self {
        AclSpaceBuilder::rejecting(subtrahend)
            .then_permitting(minuend)
            .build()
    }

    /// Addresses in both `a` and `b`.
    ///
    /// Evaluates as "`a` contains x and `b` contains x".
    pub fn intersection(a: IpSpace, b: IpSpace) -> Self {
        if a.is_empty_space() || b.is_empty_space() {
            return Self::empty();
        }
        if a.is_universe() {
            return b;
        }
        if b.is_universe() {
            return a;
        }
        AclSpaceBuilder::rejecting(a.complement())
            .then_permitting(b)
            .build()
    }

    /// The variant behind this space.
    pub fn kind(&self) -> &IpSpaceKind {
        &self.0
    }

    /// Whether both handles share one allocation.
    pub fn ptr_eq(&self, other: &IpSpace) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Structurally the empty space.
    pub fn is_empty_space(&self) -> bool {
        matches!(self.kind(), IpSpaceKind::Empty)
    }

    /// Structurally the universe space.
    pub fn is_universe(&self) -> bool {
        matches!(self.kind(), IpSpaceKind::Universe)
    }

    /// Whether `ip` is in this space, with every reference unbound.
    pub fn contains_ip(&self, ip: Ip) -> bool {
        self.contains_ip_with(ip, &NamedIpSpaces::new())
    }

    /// Whether `ip` is in this space, resolving references through
    /// `named`.
    ///
    /// Never fails. An unbound name, or a name already being resolved
    /// further up the same evaluation (a self-referential chain),
    /// denotes the empty space.
    pub fn contains_ip_with(&self, ip: Ip, named: &NamedIpSpaces) -> bool {
        let mut resolving = Vec::new();
        self.contains_inner(ip, named, &mut resolving)
    }

    fn contains_inner<'a>(
        &'a self,
        ip: Ip,
        named: &'a NamedIpSpaces,
        resolving: &mut Vec<&'a str>,
    ) -> bool {
        match self.kind() {
            IpSpaceKind::Empty => false,
            IpSpaceKind::Universe => true,
            IpSpaceKind::Ip(own) => *own == ip,
            IpSpaceKind::Prefix(prefix) => prefix.contains_ip(ip),
            IpSpaceKind::Wildcard(wildcard) => wildcard.matches(ip),
            IpSpaceKind::WildcardSet { include, exclude } => {
                include.iter().any(|w| w.matches(ip)) && !exclude.iter().any(|w| w.matches(ip))
            }
            IpSpaceKind::Acl(lines) => {
                for line in lines {
                    if line.space.contains_inner(ip, named, resolving) {
                        return line.action == LineAction::Permit;
                    }
                }
                false
            }
            IpSpaceKind::Reference(name) => {
                if resolving.contains(&name.as_str()) {
                    return false;
                }
                let Some(target) = named.get(name) else {
                    return false;
                };
                resolving.push(name);
                let hit = target.contains_inner(ip, named, resolving);
                resolving.pop();
                hit
            }
        }
    }

    /// The space of every address not in this one.
    ///
    /// `complement().contains_ip(x) == !contains_ip(x)` for every `x`.
    pub fn complement(&self) -> IpSpace {
        match self.kind() {
            IpSpaceKind::Empty => Self::universe(),
            IpSpaceKind::Universe => Self::empty(),
            IpSpaceKind::Acl(lines) => {
                let mut builder = AclSpaceBuilder::new();
                for line in lines {
                    builder.add_line(line.action.flip(), line.space.clone());
                }
                // A trailing universe line already decides every address.
                let decided = lines.last().is_some_and(|l| l.space.is_universe());
                if !decided {
                    builder.add_line(LineAction::Permit, Self::universe());
                }
                builder.build()
            }
            _ => AclSpaceBuilder::rejecting(self.clone())
                .then_permitting(Self::universe())
                .build(),
        }
    }

    /// Dispatch to the visitor method for this space's variant.
    pub fn accept<V: IpSpaceVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self.kind() {
            IpSpaceKind::Empty => visitor.visit_empty(),
            IpSpaceKind::Universe => visitor.visit_universe(),
            IpSpaceKind::Ip(ip) => visitor.visit_ip(*ip),
            IpSpaceKind::Prefix(prefix) => visitor.visit_prefix(*prefix),
            IpSpaceKind::Wildcard(wildcard) => visitor.visit_wildcard(*wildcard),
            IpSpaceKind::WildcardSet { include, exclude } => {
                visitor.visit_wildcard_set(include, exclude)
            }
            IpSpaceKind::Acl(lines) => visitor.visit_acl(lines),
            IpSpaceKind::Reference(name) => visitor.visit_reference(name),
        }
    }

    /// Every reference name reachable from this space, in first-seen
    /// order. Does not chase references through a table.
    pub fn referenced_names(&self) -> IndexSet<String> {
        let mut collector = ReferenceCollector::default();
        self.accept(&mut collector);
        collector.into_names()
    }

    /// Number of variant nodes in this space's tree.
    pub fn node_count(&self) -> usize {
        self.accept(&mut NodeCounter)
    }
}

impl Default for IpSpace {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Ip> for IpSpace {
    fn from(ip: Ip) -> Self {
        Self::ip(ip)
    }
}

impl From<Prefix> for IpSpace {
    fn from(prefix: Prefix) -> Self {
        Self::prefix(prefix)
    }
}

impl From<IpWildcard> for IpSpace {
    fn from(wildcard: IpWildcard) -> Self {
        Self::wildcard(wildcard)
    }
}

impl fmt::Display for IpSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            IpSpaceKind::Empty => write!(f, "empty"),
            IpSpaceKind::Universe => write!(f, "universe"),
            IpSpaceKind::Ip(ip) => write!(f, "{ip}"),
            IpSpaceKind::Prefix(prefix) => write!(f, "{prefix}"),
            IpSpaceKind::Wildcard(wildcard) => write!(f, "{wildcard}"),
            IpSpaceKind::WildcardSet { include, exclude } => {
                write!(f, "{include:?}")?;
                if !exclude.is_empty() {
                    write!(f, " - {exclude:?}")?;
                }
                Ok(())
            }
            IpSpaceKind::Acl(lines) => {
                write!(f, "acl[")?;
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} {}", line.action, line.space)?;
                }
                write!(f, "]")
            }
            IpSpaceKind::Reference(name) => write!(f, "ref({name})"),
        }
    }
}

impl fmt::Debug for IpSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IpSpace({self})")
    }
}
