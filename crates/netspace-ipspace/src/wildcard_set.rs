//! Builder for include/exclude wildcard sets.

use netspace_core::IpWildcard;

use crate::space::{IpSpace, IpSpaceKind};

/// Collects included and excluded wildcards.
///
/// The built space contains an address when some include matches and no
/// exclude does. Both lists are sorted and de-duplicated, so the order in
/// which wildcards were added does not affect equality.
#[derive(Clone, Debug, Default)]
pub struct WildcardSetBuilder {
    include: Vec<IpWildcard>,
    exclude: Vec<IpWildcard>,
}

impl WildcardSetBuilder {
    /// A builder with nothing included.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add wildcards to the include list.
    pub fn including<I>(mut self, wildcards: I) -> Self
    where
        I: IntoIterator<Item = IpWildcard>,
    {
        self.include.extend(wildcards);
        self
    }

    /// Add wildcards to the exclude list.
    pub fn excluding<I>(mut self, wildcards: I) -> Self
    where
        I: IntoIterator<Item = IpWildcard>,
    {
        self.exclude.extend(wildcards);
        self
    }

    /// Produce the space.
    pub fn build(mut self) -> IpSpace {
        self.include.sort_unstable();
        self.include.dedup();
        self.exclude.sort_unstable();
        self.exclude.dedup();
        match (self.include.as_slice(), self.exclude.is_empty()) {
            ([], _) => IpSpace::empty(),
            ([only], true) => IpSpace::wildcard(*only),
            _ => IpSpace::from_kind(IpSpaceKind::WildcardSet {
                include: self.include,
                exclude: self.exclude,
            }),
        }
    }
}
