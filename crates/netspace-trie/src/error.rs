//! Trie error types.

use std::error::Error;
use std::fmt;

use netspace_core::Prefix;

/// Errors from trie mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrieError {
    /// The prefix lies outside the trie's root prefix (or is of the
    /// other address family).
    PrefixNotCovered {
        /// The rejected prefix.
        prefix: Prefix,
        /// The trie's root prefix.
        root: Prefix,
    },
}

impl fmt::Display for TrieError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrefixNotCovered { prefix, root } => {
                write!(f, "prefix {prefix} is not covered by trie root {root}")
            }
        }
    }
}

impl Error for TrieError {}
