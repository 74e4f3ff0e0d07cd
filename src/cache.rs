//! Monotone memo table for cycle lengths.
//!
//! Direct-mapped by value: slot `n` holds the cycle length of `n` once it has
//! been computed, and `0` before that (a real cycle length is always >= 1, so
//! zero is a free "unknown" sentinel). Entries only ever go unknown -> known
//! and are never invalidated, so a stored value can be returned without any
//! revalidation.
//!
//! The table is an owned value the caller threads through evaluation, not
//! process-global state; tests get isolation for free and a concurrent caller
//! can wrap it however it likes.

/// Write-once-per-key cycle-length cache over the domain `1..limit`.
pub struct CycleCache {
    table: Vec<u32>,
    limit: u32,
}

impl CycleCache {
    /// Create an empty cache covering values in `1..limit`.
    pub fn new(limit: u32) -> Self {
        Self {
            table: vec![0; limit as usize],
            limit,
        }
    }

    /// Exclusive upper bound of the addressable domain.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of entries currently known.
    pub fn known(&self) -> usize {
        self.table.iter().filter(|&&len| len != 0).count()
    }

    /// Hot path: return the cached cycle length of `n`, computing and storing
    /// it on first access. `compute` must be a pure function of `n`; it runs
    /// at most once per key over the cache's lifetime.
    ///
    /// Callers must have validated `n` against [`limit`](Self::limit) already;
    /// the bound is only debug-asserted here.
    #[inline]
    pub fn get_or_compute(&mut self, n: u32, compute: impl FnOnce(u32) -> u32) -> u32 {
        debug_assert!((1..self.limit).contains(&n));
        let slot = &mut self.table[n as usize];
        if *slot == 0 {
            *slot = compute(n);
        }
        *slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycle_length;

    #[test]
    fn first_access_computes_and_stores() {
        let mut cache = CycleCache::new(100);
        assert_eq!(cache.known(), 0);
        assert_eq!(cache.get_or_compute(9, cycle_length), cycle_length(9));
        assert_eq!(cache.known(), 1);
    }

    #[test]
    fn compute_runs_at_most_once_per_key() {
        let mut cache = CycleCache::new(100);
        let mut calls = 0;
        for _ in 0..5 {
            let len = cache.get_or_compute(27, |n| {
                calls += 1;
                cycle_length(n)
            });
            assert_eq!(len, 112);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn repeated_reads_are_idempotent() {
        let mut cache = CycleCache::new(1_000);
        for n in 1..1_000 {
            let first = cache.get_or_compute(n, cycle_length);
            assert_eq!(first, cycle_length(n));
            assert_eq!(cache.get_or_compute(n, cycle_length), first);
        }
    }

    #[test]
    fn limit_reflects_construction() {
        let cache = CycleCache::new(42);
        assert_eq!(cache.limit(), 42);
    }
}
