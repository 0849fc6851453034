//! Benchmark profiles and inputs for netspace.
//!
//! - [`reference_profile`]: 32-router chain, the default analysis workload
//! - [`stress_profile`]: 200-router chain for scaling runs
//! - [`probe_ips`]: deterministic IPv4 probe addresses
//! - [`dense_prefixes`]: many distinct IPv4 prefixes of mixed lengths

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use netspace_core::{Ip, Prefix};
use netspace_dataplane::DataplaneSnapshot;
use netspace_test_utils::fixtures::line_network;

/// 32 routers in a line, each with a stub LAN and static routes to
/// every other LAN.
pub fn reference_profile() -> DataplaneSnapshot {
    line_network(32)
}

/// Same shape as [`reference_profile`] with 200 routers.
pub fn stress_profile() -> DataplaneSnapshot {
    line_network(200)
}

/// `n` pseudo-random IPv4 addresses derived from `seed`.
pub fn probe_ips(n: usize, seed: u64) -> Vec<Ip> {
    (0..n as u64)
        .map(|i| {
            let bits = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(i.wrapping_mul(1442695040888963407));
            Ip::v4((bits >> 32) as u32)
        })
        .collect()
}

/// `n` distinct IPv4 prefixes with lengths cycling through 16..=28.
pub fn dense_prefixes(n: usize) -> Vec<Prefix> {
    let mut seen = std::collections::HashSet::with_capacity(n);
    let mut out = Vec::with_capacity(n);
    let mut i: u64 = 0;
    while out.len() < n {
        let length = 16 + (i % 13) as u8;
        let bits = (i.wrapping_mul(2862933555777941757) >> 32) as u32;
        if let Ok(prefix) = Prefix::new(Ip::v4(bits), length) {
            if seen.insert(prefix) {
                out.push(prefix);
            }
        }
        i += 1;
    }
    out
}
