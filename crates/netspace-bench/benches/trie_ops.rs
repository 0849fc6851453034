//! Criterion micro-benchmarks for the prefix trie and RIB.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netspace_bench::{dense_prefixes, probe_ips};
use netspace_dataplane::{Rib, Route};
use netspace_trie::PrefixTrieMultiMap;

/// Benchmark: 1K longest-prefix matches against a 10K-prefix trie.
fn bench_lpm_10k(c: &mut Criterion) {
    let mut trie = PrefixTrieMultiMap::ipv4();
    for (i, p) in dense_prefixes(10_000).into_iter().enumerate() {
        trie.add(p, i).unwrap();
    }
    let probes = probe_ips(1000, 3);

    c.bench_function("lpm_10k", |b| {
        b.iter(|| {
            for &ip in &probes {
                black_box(trie.longest_prefix_match(ip));
            }
        });
    });
}

/// Benchmark: computing per-prefix matching IPs for a 2K-route RIB.
fn bench_matching_ips_2k(c: &mut Criterion) {
    let routes: Vec<Route> = dense_prefixes(2000)
        .into_iter()
        .map(|p| Route::connected(p, "e0"))
        .collect();

    c.bench_function("matching_ips_2k", |b| {
        b.iter(|| {
            let rib = Rib::from_routes(routes.iter().cloned());
            black_box(rib.matching_ips().len());
        });
    });
}

criterion_group!(benches, bench_lpm_10k, bench_matching_ips_2k);
criterion_main!(benches);
