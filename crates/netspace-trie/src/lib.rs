//! Prefix trie multimap for netspace.
//!
//! [`PrefixTrieMultiMap`] maps IP prefixes to sets of values and answers
//! longest-prefix-match queries. It backs the RIB lookups of the
//! forwarding analysis.
//!
//! # Layout
//!
//! ```text
//! PrefixTrieMultiMap
//! ├── nodes: Vec<TrieNode>   (slot 0 is the root, never freed)
//! │   └── prefix, values, children[bit0, bit1], parent
//! └── free_list: Vec<usize>  (slots of pruned nodes, reused on insert)
//! ```
//!
//! One trie level per prefix bit: the children of a `/n` node are the
//! two `/n+1` prefixes under it. Inserting below a missing node
//! materializes every node on the way down; removing the last value of
//! a childless node prunes it and any ancestors left empty.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod trie;

pub use error::TrieError;
pub use trie::PrefixTrieMultiMap;
