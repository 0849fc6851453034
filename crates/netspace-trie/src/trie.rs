//! The prefix trie multimap.

use std::hash::Hash;

use indexmap::IndexSet;
use netspace_core::{AddressFamily, Ip, Prefix};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TrieError;

const ROOT: usize = 0;

/// One trie slot.
#[derive(Clone, Debug)]
struct TrieNode<V> {
    prefix: Prefix,
    values: IndexSet<V>,
    /// Indexed by the bit at position `prefix.length()`.
    children: [Option<usize>; 2],
    parent: Option<usize>,
}

impl<V> TrieNode<V> {
    fn new(prefix: Prefix, parent: Option<usize>) -> Self {
        Self {
            prefix,
            values: IndexSet::new(),
            children: [None, None],
            parent,
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// A multimap from IP prefixes to sets of values.
///
/// Nodes live in a slab (`Vec`) and refer to each other by index. Slots
/// freed by pruning go on a free list and are reused by later inserts,
/// so a trie that churns does not grow without bound.
///
/// Every key must lie under the root prefix given at construction;
/// [`ipv4`](Self::ipv4) and [`ipv6`](Self::ipv6) cover a whole family.
#[derive(Clone, Debug)]
pub struct PrefixTrieMultiMap<V> {
    nodes: Vec<TrieNode<V>>,
    free_list: Vec<usize>,
    /// Returned by reference when a lookup finds nothing.
    empty: IndexSet<V>,
}

impl<V: Eq + Hash> PrefixTrieMultiMap<V> {
    /// An empty trie accepting keys under `root`.
    pub fn new(root: Prefix) -> Self {
        Self {
            nodes: vec![TrieNode::new(root, None)],
            free_list: Vec::new(),
            empty: IndexSet::new(),
        }
    }

    /// An empty trie over all of IPv4.
    pub fn ipv4() -> Self {
        Self::new(Prefix::zero(AddressFamily::V4))
    }

    /// An empty trie over all of IPv6.
    pub fn ipv6() -> Self {
        Self::new(Prefix::zero(AddressFamily::V6))
    }

    /// The prefix every key must fall under.
    pub fn root_prefix(&self) -> Prefix {
        self.nodes[ROOT].prefix
    }

    /// Whether `prefix` may be used as a key.
    pub fn covers(&self, prefix: Prefix) -> bool {
        self.root_prefix().contains_prefix(prefix)
    }

    /// Number of live nodes, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Whether no prefix holds any value.
    pub fn is_empty(&self) -> bool {
        let root = &self.nodes[ROOT];
        root.values.is_empty() && root.is_leaf()
    }

    // ── Mutation ───────────────────────────────────────────────

    /// Attach `value` at `prefix`. Returns whether the trie changed.
    pub fn add(&mut self, prefix: Prefix, value: V) -> Result<bool, TrieError> {
        self.add_all(prefix, std::iter::once(value))
    }

    /// Attach every value at `prefix`. Returns whether the trie changed.
    ///
    /// An empty `values` leaves the trie untouched, even when `prefix`
    /// has no node yet.
    pub fn add_all<I>(&mut self, prefix: Prefix, values: I) -> Result<bool, TrieError>
    where
        I: IntoIterator<Item = V>,
    {
        self.check_covered(prefix)?;
        let idx = self.materialize(prefix);
        let mut changed = false;
        for value in values {
            changed |= self.nodes[idx].values.insert(value);
        }
        self.prune(idx);
        Ok(changed)
    }

    /// Make `value` the only value at `prefix`. Returns whether the trie
    /// changed.
    pub fn replace_all(&mut self, prefix: Prefix, value: V) -> Result<bool, TrieError> {
        self.check_covered(prefix)?;
        let idx = self.materialize(prefix);
        let values = &mut self.nodes[idx].values;
        if values.len() == 1 && values.contains(&value) {
            return Ok(false);
        }
        values.clear();
        values.insert(value);
        Ok(true)
    }

    /// Detach `value` from `prefix`.
    ///
    /// Returns `false`, without error, when `prefix` is not covered or
    /// does not hold `value`.
    pub fn remove(&mut self, prefix: Prefix, value: &V) -> bool {
        let Some(idx) = self.find(prefix) else {
            return false;
        };
        let removed = self.nodes[idx].values.shift_remove(value);
        if removed {
            self.prune(idx);
        }
        removed
    }

    /// Detach and return every value at `prefix`.
    pub fn clear(&mut self, prefix: Prefix) -> IndexSet<V> {
        let Some(idx) = self.find(prefix) else {
            return IndexSet::new();
        };
        let values = std::mem::take(&mut self.nodes[idx].values);
        self.prune(idx);
        values
    }

    /// Remove everything, keeping the root prefix.
    pub fn clear_all(&mut self) {
        let root = self.root_prefix();
        self.nodes.clear();
        self.nodes.push(TrieNode::new(root, None));
        self.free_list.clear();
    }

    // ── Lookup ─────────────────────────────────────────────────

    /// Values attached exactly at `prefix`.
    pub fn get(&self, prefix: Prefix) -> &IndexSet<V> {
        match self.find(prefix) {
            Some(idx) => &self.nodes[idx].values,
            None => &self.empty,
        }
    }

    /// Values at the most specific non-empty prefix containing `ip`.
    pub fn longest_prefix_match(&self, ip: Ip) -> &IndexSet<V> {
        self.longest_match_up_to(ip, ip.family().width())
    }

    /// Values at the most specific non-empty prefix containing `ip` that is
    /// strictly shorter than `max_length`.
    ///
    /// A prefix of exactly `max_length` bits does not match. Returns the
    /// empty set when no such prefix exists, including when `ip` lies
    /// outside the root prefix or `max_length` is zero.
    pub fn longest_prefix_match_bounded(&self, ip: Ip, max_length: u8) -> &IndexSet<V> {
        match max_length.checked_sub(1) {
            Some(longest) => self.longest_match_up_to(ip, longest),
            None => &self.empty,
        }
    }

    /// Longest match over prefixes of at most `max_length` bits.
    fn longest_match_up_to(&self, ip: Ip, max_length: u8) -> &IndexSet<V> {
        let root = &self.nodes[ROOT];
        if !root.prefix.contains_ip(ip) || root.prefix.length() > max_length {
            return &self.empty;
        }
        let mut best = &root.values;
        let mut node = root;
        while node.prefix.length() < max_length {
            let bit = ip.bit_at(node.prefix.length());
            let Some(child) = node.children[usize::from(bit)] else {
                break;
            };
            node = &self.nodes[child];
            if !node.values.is_empty() {
                best = &node.values;
            }
        }
        best
    }

    /// Total number of `(prefix, value)` pairs.
    pub fn num_elements(&self) -> usize {
        let mut total = 0;
        self.traverse_entries(|_, values| total += values.len());
        total
    }

    /// Every `(prefix, values)` pair with non-empty values, in post-order:
    /// more specific prefixes come before the prefixes containing them.
    pub fn entries(&self) -> Vec<(Prefix, &IndexSet<V>)> {
        let mut out = Vec::new();
        self.collect_entries(ROOT, &mut out);
        out
    }

    fn collect_entries<'a>(&'a self, idx: usize, out: &mut Vec<(Prefix, &'a IndexSet<V>)>) {
        let node = &self.nodes[idx];
        for child in node.children.iter().flatten() {
            self.collect_entries(*child, out);
        }
        if !node.values.is_empty() {
            out.push((node.prefix, &node.values));
        }
    }

    /// Call `f` on every non-empty `(prefix, values)` pair, in post-order.
    pub fn traverse_entries<F>(&self, mut f: F)
    where
        F: FnMut(Prefix, &IndexSet<V>),
    {
        for (prefix, values) in self.entries() {
            f(prefix, values);
        }
    }

    /// Bottom-up aggregation over every node.
    ///
    /// `f(prefix, values, left, right)` receives the results already
    /// computed for the bit-0 and bit-1 children, `None` where the child
    /// does not exist. Returns the result for the root.
    pub fn fold<R, F>(&self, mut f: F) -> R
    where
        F: FnMut(Prefix, &IndexSet<V>, Option<R>, Option<R>) -> R,
    {
        self.fold_node(ROOT, &mut f)
    }

    fn fold_node<R, F>(&self, idx: usize, f: &mut F) -> R
    where
        F: FnMut(Prefix, &IndexSet<V>, Option<R>, Option<R>) -> R,
    {
        let node = &self.nodes[idx];
        let [left, right] = node.children;
        let left = left.map(|c| self.fold_node(c, f));
        let right = right.map(|c| self.fold_node(c, f));
        f(node.prefix, &node.values, left, right)
    }

    /// Non-empty entries whose prefix shares at least one address with
    /// `prefix`: its ancestors and descendants in the trie. Post-order.
    pub fn overlapping_entries(&self, prefix: Prefix) -> Vec<(Prefix, &IndexSet<V>)> {
        let mut out = Vec::new();
        self.collect_overlapping(ROOT, prefix, &mut out);
        out
    }

    fn collect_overlapping<'a>(
        &'a self,
        idx: usize,
        target: Prefix,
        out: &mut Vec<(Prefix, &'a IndexSet<V>)>,
    ) {
        let node = &self.nodes[idx];
        if !node.prefix.overlaps(target) {
            return;
        }
        for child in node.children.iter().flatten() {
            self.collect_overlapping(*child, target, out);
        }
        if !node.values.is_empty() {
            out.push((node.prefix, &node.values));
        }
    }

    // ── Slab management ────────────────────────────────────────

    fn check_covered(&self, prefix: Prefix) -> Result<(), TrieError> {
        if self.covers(prefix) {
            Ok(())
        } else {
            Err(TrieError::PrefixNotCovered {
                prefix,
                root: self.root_prefix(),
            })
        }
    }

    /// Slot holding exactly `prefix`, if it exists.
    fn find(&self, prefix: Prefix) -> Option<usize> {
        if !self.covers(prefix) {
            return None;
        }
        let mut idx = ROOT;
        while self.nodes[idx].prefix.length() < prefix.length() {
            let bit = prefix.network().bit_at(self.nodes[idx].prefix.length());
            idx = self.nodes[idx].children[usize::from(bit)]?;
        }
        Some(idx)
    }

    /// Slot holding exactly `prefix`, creating it and every missing
    /// ancestor. `prefix` must be covered.
    fn materialize(&mut self, prefix: Prefix) -> usize {
        let mut idx = ROOT;
        while self.nodes[idx].prefix.length() < prefix.length() {
            let here = self.nodes[idx].prefix;
            let bit = prefix.network().bit_at(here.length());
            idx = match self.nodes[idx].children[usize::from(bit)] {
                Some(child) => child,
                None => {
                    let Some(child_prefix) = here.child(bit) else {
                        break;
                    };
                    let child = self.alloc(TrieNode::new(child_prefix, Some(idx)));
                    self.nodes[idx].children[usize::from(bit)] = Some(child);
                    child
                }
            };
        }
        idx
    }

    fn alloc(&mut self, node: TrieNode<V>) -> usize {
        if let Some(slot) = self.free_list.pop() {
            self.nodes[slot] = node;
            slot
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Free `idx` and then each ancestor while it is an empty, childless,
    /// non-root node.
    fn prune(&mut self, mut idx: usize) {
        while idx != ROOT {
            let node = &self.nodes[idx];
            if !node.values.is_empty() || !node.is_leaf() {
                return;
            }
            let Some(parent) = node.parent else {
                return;
            };
            let bit = node.prefix.network().bit_at(self.nodes[parent].prefix.length());
            self.nodes[parent].children[usize::from(bit)] = None;
            self.nodes[idx].parent = None;
            self.free_list.push(idx);
            idx = parent;
        }
    }
}

impl<V: Clone + Eq + Hash> PrefixTrieMultiMap<V> {
    /// Union of the values at every prefix.
    pub fn get_all_elements(&self) -> IndexSet<V> {
        let mut all = IndexSet::new();
        self.traverse_entries(|_, values| all.extend(values.iter().cloned()));
        all
    }
}

impl<V: Eq + Hash> PartialEq for PrefixTrieMultiMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.root_prefix() == other.root_prefix() && self.entries() == other.entries()
    }
}

impl<V: Eq + Hash> Eq for PrefixTrieMultiMap<V> {}

// ── Serialization ──────────────────────────────────────────────

#[derive(Serialize)]
struct TrieReprRef<'a, V> {
    root: Prefix,
    entries: Vec<(Prefix, Vec<&'a V>)>,
}

#[derive(Deserialize)]
struct TrieRepr<V> {
    root: Prefix,
    entries: Vec<(Prefix, Vec<V>)>,
}

impl<V: Serialize + Eq + Hash> Serialize for PrefixTrieMultiMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TrieReprRef {
            root: self.root_prefix(),
            entries: self
                .entries()
                .into_iter()
                .map(|(prefix, values)| (prefix, values.iter().collect()))
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de> + Eq + Hash> Deserialize<'de> for PrefixTrieMultiMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = TrieRepr::<V>::deserialize(deserializer)?;
        let mut trie = Self::new(repr.root);
        for (prefix, values) in repr.entries {
            trie.add_all(prefix, values)
                .map_err(serde::de::Error::custom)?;
        }
        Ok(trie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(s: &str) -> Prefix {
        s.parse().unwrap()
    }

    fn ip(s: &str) -> Ip {
        s.parse().unwrap()
    }

    fn set(values: &[&'static str]) -> IndexSet<&'static str> {
        values.iter().copied().collect()
    }

    #[test]
    fn longest_match_prefers_more_specific() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("1.1.1.0/24"), "x").unwrap();
        assert_eq!(trie.longest_prefix_match(ip("1.1.1.5")), &set(&["x"]));

        trie.add(p("1.1.1.128/25"), "y").unwrap();
        assert_eq!(trie.longest_prefix_match(ip("1.1.1.200")), &set(&["y"]));
        assert_eq!(trie.longest_prefix_match(ip("1.1.1.5")), &set(&["x"]));
    }

    #[test]
    fn length_bound_excludes_prefixes_of_that_length() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("1.1.1.0/24"), "x").unwrap();
        trie.add(p("1.1.1.128/25"), "y").unwrap();
        assert!(trie.longest_prefix_match_bounded(ip("1.1.1.200"), 24).is_empty());
        assert_eq!(trie.longest_prefix_match_bounded(ip("1.1.1.200"), 25), &set(&["x"]));
        assert_eq!(trie.longest_prefix_match_bounded(ip("1.1.1.200"), 26), &set(&["y"]));
        assert!(trie.longest_prefix_match_bounded(ip("1.1.1.200"), 0).is_empty());
    }

    #[test]
    fn bound_skips_empty_intermediate_nodes() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("0.0.0.0/0"), 0).unwrap();
        trie.add(p("0.0.0.0/32"), 1).unwrap();
        // 0.0.0.0/31 exists only as a path node.
        let expected: IndexSet<i32> = [0].into_iter().collect();
        assert_eq!(trie.longest_prefix_match_bounded(ip("0.0.0.0"), 31), &expected);
    }

    #[test]
    fn no_match_is_empty() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("10.0.0.0/8"), "a").unwrap();
        assert!(trie.longest_prefix_match(ip("11.0.0.1")).is_empty());
        assert!(trie.longest_prefix_match(ip("2001:db8::1")).is_empty());
    }

    #[test]
    fn add_outside_root_is_rejected() {
        let mut trie = PrefixTrieMultiMap::new(p("10.0.0.0/8"));
        let err = trie.add(p("11.0.0.0/16"), 1).unwrap_err();
        assert_eq!(
            err,
            TrieError::PrefixNotCovered {
                prefix: p("11.0.0.0/16"),
                root: p("10.0.0.0/8"),
            }
        );
        assert!(trie.add(p("::/0"), 1).is_err());
        assert!(trie.is_empty());
    }

    #[test]
    fn remove_outside_root_is_a_noop() {
        let mut trie = PrefixTrieMultiMap::new(p("10.0.0.0/8"));
        trie.add(p("10.1.0.0/16"), 1).unwrap();
        assert!(!trie.remove(p("11.0.0.0/16"), &1));
        assert!(!trie.remove(p("10.1.0.0/16"), &2));
        assert!(trie.remove(p("10.1.0.0/16"), &1));
        assert!(trie.is_empty());
    }

    #[test]
    fn add_materializes_path_and_remove_prunes_it() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("10.0.0.0/8"), "a").unwrap();
        assert_eq!(trie.node_count(), 9);
        trie.add(p("10.128.0.0/9"), "b").unwrap();
        assert_eq!(trie.node_count(), 10);

        assert!(trie.remove(p("10.128.0.0/9"), &"b"));
        assert_eq!(trie.node_count(), 9);
        assert!(trie.remove(p("10.0.0.0/8"), &"a"));
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn inner_node_with_descendants_survives_removal() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("10.0.0.0/8"), "a").unwrap();
        trie.add(p("10.1.0.0/16"), "b").unwrap();
        assert!(trie.remove(p("10.0.0.0/8"), &"a"));
        assert_eq!(trie.longest_prefix_match(ip("10.1.2.3")), &set(&["b"]));
        assert!(trie.longest_prefix_match(ip("10.2.2.3")).is_empty());
        assert_eq!(trie.node_count(), 17);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("10.0.0.0/8"), 1).unwrap();
        trie.clear(p("10.0.0.0/8"));
        let slots = trie.nodes.len();
        trie.add(p("11.0.0.0/8"), 2).unwrap();
        assert_eq!(trie.nodes.len(), slots);
    }

    #[test]
    fn empty_add_all_leaves_no_trace() {
        let mut trie: PrefixTrieMultiMap<u32> = PrefixTrieMultiMap::ipv4();
        assert!(!trie.add_all(p("10.0.0.0/8"), []).unwrap());
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn clear_returns_removed_values() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add_all(p("10.0.0.0/8"), ["a", "b"]).unwrap();
        assert_eq!(trie.clear(p("10.0.0.0/8")), set(&["a", "b"]));
        assert!(trie.clear(p("10.0.0.0/8")).is_empty());
        assert!(trie.is_empty());
    }

    #[test]
    fn replace_all_reports_change() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        assert!(trie.replace_all(p("10.0.0.0/8"), "a").unwrap());
        assert!(!trie.replace_all(p("10.0.0.0/8"), "a").unwrap());
        trie.add(p("10.0.0.0/8"), "b").unwrap();
        assert!(trie.replace_all(p("10.0.0.0/8"), "a").unwrap());
        assert_eq!(trie.get(p("10.0.0.0/8")), &set(&["a"]));
    }

    #[test]
    fn clear_all_keeps_root() {
        let mut trie = PrefixTrieMultiMap::new(p("10.0.0.0/8"));
        trie.add(p("10.1.0.0/16"), 1).unwrap();
        trie.clear_all();
        assert!(trie.is_empty());
        assert_eq!(trie.root_prefix(), p("10.0.0.0/8"));
        assert_eq!(trie.node_count(), 1);
    }

    #[test]
    fn element_queries() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add_all(p("10.0.0.0/8"), ["a", "b"]).unwrap();
        trie.add_all(p("10.1.0.0/16"), ["b", "c"]).unwrap();
        assert_eq!(trie.num_elements(), 4);
        assert_eq!(trie.get_all_elements(), set(&["a", "b", "c"]));
        assert_eq!(trie.get(p("10.1.0.0/16")), &set(&["b", "c"]));
        assert!(trie.get(p("10.1.0.0/17")).is_empty());
    }

    #[test]
    fn entries_are_post_order() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("10.0.0.0/8"), 1).unwrap();
        trie.add(p("10.128.0.0/9"), 3).unwrap();
        trie.add(p("10.0.0.0/9"), 2).unwrap();
        let keys: Vec<Prefix> = trie.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![p("10.0.0.0/9"), p("10.128.0.0/9"), p("10.0.0.0/8")]);
    }

    #[test]
    fn overlapping_entries_cover_ancestors_and_descendants() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("10.0.0.0/8"), "anc").unwrap();
        trie.add(p("10.1.0.0/16"), "self").unwrap();
        trie.add(p("10.1.1.0/24"), "desc").unwrap();
        trie.add(p("10.2.0.0/16"), "sibling").unwrap();
        let keys: Vec<Prefix> = trie
            .overlapping_entries(p("10.1.0.0/16"))
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![p("10.1.1.0/24"), p("10.1.0.0/16"), p("10.0.0.0/8")]);
    }

    #[test]
    fn fold_counts_valued_nodes() {
        let mut trie = PrefixTrieMultiMap::ipv4();
        trie.add(p("10.0.0.0/8"), 1).unwrap();
        trie.add(p("10.1.0.0/16"), 2).unwrap();
        trie.add(p("192.168.0.0/16"), 3).unwrap();
        let count = trie.fold(|_, values, l: Option<usize>, r| {
            usize::from(!values.is_empty()) + l.unwrap_or(0) + r.unwrap_or(0)
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn serde_round_trip() {
        let mut trie = PrefixTrieMultiMap::ipv6();
        trie.add(p("2001:db8::/32"), "a".to_string()).unwrap();
        trie.add(p("2001:db8:1::/48"), "b".to_string()).unwrap();
        let json = serde_json::to_string(&trie).unwrap();
        let back: PrefixTrieMultiMap<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trie);
        assert_eq!(back.node_count(), trie.node_count());
    }

    #[test]
    fn serde_rejects_uncovered_entries() {
        let json = r#"{"root":"10.0.0.0/8","entries":[["11.0.0.0/8",[1]]]}"#;
        assert!(serde_json::from_str::<PrefixTrieMultiMap<u32>>(json).is_err());
    }

    proptest! {
        #[test]
        fn longest_match_agrees_with_scan(
            keys in prop::collection::vec((any::<u32>(), 0u8..=32), 1..24),
            probe in any::<u32>(),
        ) {
            let mut trie = PrefixTrieMultiMap::ipv4();
            let mut inserted = Vec::new();
            for (i, (bits, len)) in keys.into_iter().enumerate() {
                let prefix = Prefix::new(Ip::v4(bits), len).unwrap();
                trie.add(prefix, i).unwrap();
                inserted.push(prefix);
            }
            let probe = Ip::v4(probe);
            let best = inserted
                .iter()
                .filter(|k| k.contains_ip(probe))
                .max_by_key(|k| k.length());
            match best {
                Some(k) => prop_assert_eq!(trie.longest_prefix_match(probe), trie.get(*k)),
                None => prop_assert!(trie.longest_prefix_match(probe).is_empty()),
            }
        }

        #[test]
        fn add_then_remove_everything_prunes_to_root(
            keys in prop::collection::vec((any::<u32>(), 0u8..=32), 0..16),
        ) {
            let mut trie = PrefixTrieMultiMap::ipv4();
            let prefixes: Vec<Prefix> = keys
                .into_iter()
                .map(|(bits, len)| Prefix::new(Ip::v4(bits), len).unwrap())
                .collect();
            for prefix in &prefixes {
                trie.add(*prefix, ()).unwrap();
            }
            for prefix in &prefixes {
                trie.remove(*prefix, &());
            }
            prop_assert!(trie.is_empty());
            prop_assert_eq!(trie.node_count(), 1);
        }
    }
}
