//! Common test utilities for integration tests
//!
//! This module provides shared utilities for integration tests that cannot
//! access the main crate's test_utils module.

use shardfacet::{ComparatorType, NumericTermsFacet, RankedEntry, ShardFacet};
use std::collections::HashMap;

/// Test constants for consistent facet configuration across integration tests
pub mod test_constants {
    #[allow(dead_code)]
    pub const DEFAULT_REQUIRED_SIZE: usize = 10;
    #[allow(dead_code)]
    pub const SHARD_COUNT: usize = 8;
    #[allow(dead_code)]
    pub const TERMS_PER_SHARD: usize = 40;
}

/// Build a shard's partial facet, ranking `terms` the way a shard would
///
/// `total` is the count of every term the shard saw, including those cut
/// from the entry list.
#[allow(dead_code)]
pub fn shard_facet(
    comparator: ComparatorType,
    required_size: usize,
    terms: &[(f64, u64)],
    missing: u64,
    total: u64,
) -> ShardFacet {
    let entries = rank(comparator, terms.to_vec())
        .into_iter()
        .enumerate()
        .map(|(sequence, (value, count))| RankedEntry::new(value, count).with_sequence(sequence as u64))
        .collect();
    NumericTermsFacet::new(comparator, required_size, entries, missing, total).into()
}

/// Shard facet whose total equals the sum of its term counts
#[allow(dead_code)]
pub fn complete_shard_facet(comparator: ComparatorType, required_size: usize, terms: &[(f64, u64)]) -> ShardFacet {
    let total = terms.iter().map(|&(_, count)| count).sum();
    shard_facet(comparator, required_size, terms, 0, total)
}

/// Entries of a facet as `(value, count)` pairs
pub fn pairs(facet: &ShardFacet) -> Vec<(f64, u64)> {
    facet.entries().iter().map(|e| (e.value(), e.count())).collect()
}

/// Sort `(value, count)` pairs into comparator order
pub fn rank(comparator: ComparatorType, mut terms: Vec<(f64, u64)>) -> Vec<(f64, u64)> {
    terms.sort_by(|a, b| comparator.compare_domain(&RankedEntry::new(a.0, a.1), &RankedEntry::new(b.0, b.1)));
    terms
}

/// Merge the listed entries of `partials` by brute force
///
/// Sums counts per term, sorts every distinct term and keeps the first
/// `required_size`.
#[allow(dead_code)]
pub fn reference_merge(comparator: ComparatorType, required_size: usize, partials: &[ShardFacet]) -> Vec<(f64, u64)> {
    let mut counts: HashMap<u64, u64> = HashMap::new();
    for facet in partials {
        for entry in facet.entries() {
            *counts.entry(entry.term_key()).or_insert(0) += entry.count();
        }
    }

    let merged = counts
        .into_iter()
        .map(|(bits, count)| (f64::from_bits(bits), count))
        .collect();
    let mut ranked = rank(comparator, merged);
    ranked.truncate(required_size);
    ranked
}

/// Deterministic term generator for repeatable shard contents
#[allow(dead_code)]
pub struct TermGenerator {
    state: u64,
}

#[allow(dead_code)]
impl TermGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 33
    }

    /// Up to `count` distinct terms drawn from `0..distinct_values`, halved so
    /// values are not all integral, with counts in `1..=max_count`
    pub fn terms(&mut self, count: usize, distinct_values: u64, max_count: u64) -> Vec<(f64, u64)> {
        let mut seen = HashMap::new();
        for _ in 0..count {
            let value = (self.next_u64() % distinct_values) as f64 / 2.0;
            let term_count = self.next_u64() % max_count + 1;
            seen.entry(value.to_bits()).or_insert(term_count);
        }
        seen.into_iter().map(|(bits, c)| (f64::from_bits(bits), c)).collect()
    }
}
