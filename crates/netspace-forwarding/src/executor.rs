//! Serial or rayon-parallel evaluation of independent keys.

use std::hash::Hash;

use indexmap::IndexMap;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::relation::HostVrfInterfaceMap;

/// Runs one closure per key, either inline or on a rayon pool.
///
/// Output order always follows input order.
pub(crate) struct Executor {
    parallel: bool,
    /// Dedicated pool when `max_threads` is set; otherwise the global one.
    pool: Option<ThreadPool>,
}

impl Executor {
    pub(crate) fn new(config: &AnalysisConfig, host_count: usize) -> Result<Self, AnalysisError> {
        let parallel = config.parallel && host_count >= config.min_hosts_for_parallel;
        let pool = match (parallel, config.max_threads) {
            (true, Some(threads)) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("netspace-fwd-{i}"))
                    .build()
                    .map_err(|e| AnalysisError::ThreadPool {
                        reason: e.to_string(),
                    })?,
            ),
            _ => None,
        };
        Ok(Self { parallel, pool })
    }

    pub(crate) fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// `items.map(f)`, preserving order.
    pub(crate) fn map<I, T, F>(&self, items: &[I], f: F) -> Vec<T>
    where
        I: Sync,
        T: Send,
        F: Fn(&I) -> T + Sync + Send,
    {
        if !self.parallel {
            return items.iter().map(f).collect();
        }
        let run = || items.par_iter().map(&f).collect::<Vec<T>>();
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// Apply `f` to every entry of `map`, keeping the keys.
    pub(crate) fn map_entries<K, V, T, F>(&self, map: &IndexMap<K, V>, f: F) -> IndexMap<K, T>
    where
        K: Clone + Hash + Eq + Sync,
        V: Sync,
        T: Send,
        F: Fn(&K, &V) -> T + Sync + Send,
    {
        let entries: Vec<(&K, &V)> = map.iter().collect();
        let values = self.map(&entries, |&(k, v)| f(k, v));
        map.keys().cloned().zip(values).collect()
    }

    /// Apply `f` to every `(host, vrf, interface)` entry, in parallel
    /// across hosts. Entries for which `f` returns `None` are dropped.
    pub(crate) fn map_interfaces<T, U, F>(
        &self,
        map: &HostVrfInterfaceMap<T>,
        f: F,
    ) -> HostVrfInterfaceMap<U>
    where
        T: Sync,
        U: Send,
        F: Fn(&str, &str, &str, &T) -> Option<U> + Sync + Send,
    {
        self.map_entries(map, |host, by_vrf| {
            by_vrf
                .iter()
                .map(|(vrf, by_iface)| {
                    let mapped: IndexMap<String, U> = by_iface
                        .iter()
                        .filter_map(|(iface, value)| Some((iface.clone(), f(host, vrf, iface, value)?)))
                        .collect();
                    (vrf.clone(), mapped)
                })
                .collect()
        })
    }
}
