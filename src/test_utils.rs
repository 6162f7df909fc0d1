//! Test utilities for shardfacet testing
//!
//! Builders and helpers for constructing partial facets and inspecting merged
//! results without repeating entry bookkeeping in every test.

use crate::comparator::ComparatorType;
use crate::entry::RankedEntry;
use crate::facet::{NumericTermsFacet, ShardFacet};

/// Standard test constants for consistent facet configuration
pub mod test_constants {
    pub const DEFAULT_REQUIRED_SIZE: usize = 10;
    pub const SMALL_REQUIRED_SIZE: usize = 3;
}

/// Build a numeric facet from `(value, count)` pairs
///
/// Entries keep the given order; their sequence is their position.
pub fn numeric_facet(
    comparator: ComparatorType,
    required_size: usize,
    terms: &[(f64, u64)],
    missing: u64,
    total: u64,
) -> ShardFacet {
    let entries = terms
        .iter()
        .enumerate()
        .map(|(sequence, &(value, count))| RankedEntry::new(value, count).with_sequence(sequence as u64))
        .collect();
    NumericTermsFacet::new(comparator, required_size, entries, missing, total).into()
}

/// Entries of a facet as `(value, count)` pairs
pub fn pairs(facet: &ShardFacet) -> Vec<(f64, u64)> {
    facet.entries().iter().map(|e| (e.value(), e.count())).collect()
}

/// Builder pattern for numeric test facets
///
/// Defaults to the count comparator with the default required size, no
/// entries and zero counts.
pub struct FacetBuilder {
    comparator: ComparatorType,
    required_size: usize,
    terms: Vec<(f64, u64)>,
    missing: u64,
    total: u64,
}

impl FacetBuilder {
    pub fn new() -> Self {
        Self {
            comparator: ComparatorType::Count,
            required_size: test_constants::DEFAULT_REQUIRED_SIZE,
            terms: Vec::new(),
            missing: 0,
            total: 0,
        }
    }

    pub fn comparator(mut self, comparator: ComparatorType) -> Self {
        self.comparator = comparator;
        self
    }

    pub fn required_size(mut self, required_size: usize) -> Self {
        self.required_size = required_size;
        self
    }

    /// Add an entry; the total grows by its count
    pub fn entry(mut self, value: f64, count: u64) -> Self {
        self.terms.push((value, count));
        self.total += count;
        self
    }

    pub fn missing(mut self, missing: u64) -> Self {
        self.missing = missing;
        self
    }

    /// Override the total computed from the entries
    pub fn total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    pub fn build(self) -> ShardFacet {
        numeric_facet(self.comparator, self.required_size, &self.terms, self.missing, self.total)
    }
}

impl Default for FacetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_builder_defaults() {
        let facet = FacetBuilder::new().build();
        assert_eq!(facet.comparator(), ComparatorType::Count);
        assert_eq!(facet.required_size(), test_constants::DEFAULT_REQUIRED_SIZE);
        assert!(facet.entries().is_empty());
        assert_eq!(facet.total_count(), 0);
    }

    #[test]
    fn test_facet_builder_accumulates_total() {
        let facet = FacetBuilder::new()
            .comparator(ComparatorType::Term)
            .required_size(test_constants::SMALL_REQUIRED_SIZE)
            .entry(2.0, 3)
            .entry(1.0, 4)
            .missing(1)
            .build();

        assert_eq!(pairs(&facet), vec![(2.0, 3), (1.0, 4)]);
        assert_eq!(facet.total_count(), 7);
        assert_eq!(facet.missing_count(), 1);
        assert_eq!(facet.entries()[1].sequence(), 1);
    }
}
