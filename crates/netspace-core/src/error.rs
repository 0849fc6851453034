//! Error types for address, prefix and wildcard construction.

use std::error::Error;
use std::fmt;

use crate::ip::AddressFamily;

/// Errors arising from parsing or constructing address-level values.
///
/// These are input-contract violations: callers should reject the
/// offending value at the call site rather than carry it further.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressError {
    /// A prefix length exceeds the address width of its family.
    InvalidPrefixLength {
        /// The requested length.
        length: u8,
        /// The maximum length for the family (32 or 128).
        max: u8,
    },
    /// Two values that must share an address family do not.
    FamilyMismatch {
        /// Family of the first operand.
        expected: AddressFamily,
        /// Family of the second operand.
        found: AddressFamily,
    },
    /// Text could not be parsed as an address, prefix or wildcard.
    Parse {
        /// The rejected input.
        input: String,
    },
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPrefixLength { length, max } => {
                write!(f, "prefix length {length} exceeds maximum of {max}")
            }
            Self::FamilyMismatch { expected, found } => {
                write!(f, "address family mismatch: expected {expected}, found {found}")
            }
            Self::Parse { input } => write!(f, "cannot parse '{input}'"),
        }
    }
}

impl Error for AddressError {}
