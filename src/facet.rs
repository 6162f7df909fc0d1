//! Partial and merged terms facets
//!
//! A shard answers a terms facet request with a [`ShardFacet`]: either a
//! [`NumericTermsFacet`] holding its locally ranked entries, or an
//! [`UnmappedTermsFacet`] placeholder when the field does not exist on that
//! shard. Merged results use the same types.

use crate::comparator::ComparatorType;
use crate::entry::RankedEntry;
use serde::{Deserialize, Serialize};

/// Terms facet over numeric values
///
/// Holds at most `required_size` entries; construction truncates longer lists,
/// keeping the leading (best ranked) entries. Deserialization goes through the
/// same truncation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "NumericTermsFacetFields")]
pub struct NumericTermsFacet {
    comparator: ComparatorType,
    required_size: usize,
    entries: Vec<RankedEntry>,
    missing: u64,
    total: u64,
}

impl NumericTermsFacet {
    /// Create a facet, truncating `entries` to `required_size`
    pub fn new(
        comparator: ComparatorType,
        required_size: usize,
        mut entries: Vec<RankedEntry>,
        missing: u64,
        total: u64,
    ) -> Self {
        entries.truncate(required_size);
        Self {
            comparator,
            required_size,
            entries,
            missing,
            total,
        }
    }

    /// Create a facet with no observed terms
    pub fn empty(comparator: ComparatorType, required_size: usize) -> Self {
        Self::new(comparator, required_size, Vec::new(), 0, 0)
    }

    /// Comparator the entries are ranked by
    pub fn comparator(&self) -> ComparatorType {
        self.comparator
    }

    /// Maximum number of entries
    pub fn required_size(&self) -> usize {
        self.required_size
    }

    /// Ranked entries
    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    /// Documents lacking the field
    pub fn missing_count(&self) -> u64 {
        self.missing
    }

    /// Term occurrences counted, including those outside the top entries
    pub fn total_count(&self) -> u64 {
        self.total
    }

    /// Occurrences of terms not listed in the entries
    pub fn other_count(&self) -> u64 {
        other_count(self.total, &self.entries)
    }

    /// Consume the facet into its entries
    pub fn into_entries(self) -> Vec<RankedEntry> {
        self.entries
    }
}

/// Serialized form of [`NumericTermsFacet`] before truncation
#[derive(Deserialize)]
struct NumericTermsFacetFields {
    comparator: ComparatorType,
    required_size: usize,
    entries: Vec<RankedEntry>,
    missing: u64,
    total: u64,
}

impl From<NumericTermsFacetFields> for NumericTermsFacet {
    fn from(fields: NumericTermsFacetFields) -> Self {
        Self::new(
            fields.comparator,
            fields.required_size,
            fields.entries,
            fields.missing,
            fields.total,
        )
    }
}

/// Placeholder answered by a shard where the facet field is unmapped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmappedTermsFacet {
    comparator: ComparatorType,
    required_size: usize,
    missing: u64,
    total: u64,
}

impl UnmappedTermsFacet {
    /// Create a placeholder
    pub fn new(comparator: ComparatorType, required_size: usize, missing: u64, total: u64) -> Self {
        Self {
            comparator,
            required_size,
            missing,
            total,
        }
    }

    /// Comparator requested for the facet
    pub fn comparator(&self) -> ComparatorType {
        self.comparator
    }

    /// Requested number of entries
    pub fn required_size(&self) -> usize {
        self.required_size
    }

    /// Documents lacking the field
    pub fn missing_count(&self) -> u64 {
        self.missing
    }

    /// Term occurrences counted
    pub fn total_count(&self) -> u64 {
        self.total
    }
}

/// A shard's answer to a terms facet request, or a merge of several
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShardFacet {
    /// Facet over a mapped numeric field
    Numeric(NumericTermsFacet),
    /// Placeholder for an unmapped field
    Unmapped(UnmappedTermsFacet),
}

impl ShardFacet {
    /// Comparator of the facet
    pub fn comparator(&self) -> ComparatorType {
        match self {
            Self::Numeric(facet) => facet.comparator(),
            Self::Unmapped(facet) => facet.comparator(),
        }
    }

    /// Requested number of entries
    pub fn required_size(&self) -> usize {
        match self {
            Self::Numeric(facet) => facet.required_size(),
            Self::Unmapped(facet) => facet.required_size(),
        }
    }

    /// Ranked entries (always empty for a placeholder)
    pub fn entries(&self) -> &[RankedEntry] {
        match self {
            Self::Numeric(facet) => facet.entries(),
            Self::Unmapped(_) => &[],
        }
    }

    /// Documents lacking the field
    pub fn missing_count(&self) -> u64 {
        match self {
            Self::Numeric(facet) => facet.missing_count(),
            Self::Unmapped(facet) => facet.missing_count(),
        }
    }

    /// Term occurrences counted
    pub fn total_count(&self) -> u64 {
        match self {
            Self::Numeric(facet) => facet.total_count(),
            Self::Unmapped(facet) => facet.total_count(),
        }
    }

    /// Occurrences of terms not listed in the entries
    pub fn other_count(&self) -> u64 {
        other_count(self.total_count(), self.entries())
    }

    /// Check if this is an unmapped-field placeholder
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Unmapped(_))
    }

    /// Numeric facet, if this is one
    pub fn as_numeric(&self) -> Option<&NumericTermsFacet> {
        match self {
            Self::Numeric(facet) => Some(facet),
            Self::Unmapped(_) => None,
        }
    }
}

impl From<NumericTermsFacet> for ShardFacet {
    fn from(facet: NumericTermsFacet) -> Self {
        Self::Numeric(facet)
    }
}

impl From<UnmappedTermsFacet> for ShardFacet {
    fn from(facet: UnmappedTermsFacet) -> Self {
        Self::Unmapped(facet)
    }
}

// Saturates at zero for inconsistent inputs whose entry counts exceed the total
fn other_count(total: u64, entries: &[RankedEntry]) -> u64 {
    entries
        .iter()
        .fold(total, |remaining, entry| remaining.saturating_sub(entry.count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(f64, u64)]) -> Vec<RankedEntry> {
        pairs.iter().map(|&(v, c)| RankedEntry::new(v, c)).collect()
    }

    #[test]
    fn test_new_truncates_to_required_size() {
        let facet = NumericTermsFacet::new(
            ComparatorType::Count,
            2,
            entries(&[(1.0, 5), (2.0, 3), (3.0, 1)]),
            0,
            9,
        );
        assert_eq!(facet.entries().len(), 2);
        assert_eq!(facet.entries()[1].value(), 2.0);
        assert_eq!(facet.other_count(), 1);
    }

    #[test]
    fn test_zero_required_size_drops_entries() {
        let facet = NumericTermsFacet::new(ComparatorType::Term, 0, entries(&[(1.0, 5)]), 2, 5);
        assert!(facet.entries().is_empty());
        assert_eq!(facet.other_count(), 5);
    }

    #[test]
    fn test_other_count() {
        let facet = NumericTermsFacet::new(
            ComparatorType::Count,
            2,
            entries(&[(1.0, 7), (3.0, 4)]),
            1,
            14,
        );
        assert_eq!(facet.other_count(), 3);
    }

    #[test]
    fn test_other_count_saturates() {
        let facet = NumericTermsFacet::new(ComparatorType::Count, 1, entries(&[(1.0, 7)]), 0, 3);
        assert_eq!(facet.other_count(), 0);
    }

    #[test]
    fn test_shard_facet_accessors() {
        let numeric: ShardFacet =
            NumericTermsFacet::new(ComparatorType::ReverseTerm, 3, entries(&[(1.0, 2)]), 4, 6).into();
        assert_eq!(numeric.comparator(), ComparatorType::ReverseTerm);
        assert_eq!(numeric.required_size(), 3);
        assert_eq!(numeric.entries().len(), 1);
        assert_eq!(numeric.missing_count(), 4);
        assert_eq!(numeric.total_count(), 6);
        assert_eq!(numeric.other_count(), 4);
        assert!(!numeric.is_placeholder());
        assert!(numeric.as_numeric().is_some());

        let unmapped: ShardFacet = UnmappedTermsFacet::new(ComparatorType::Count, 10, 12, 0).into();
        assert!(unmapped.is_placeholder());
        assert!(unmapped.entries().is_empty());
        assert_eq!(unmapped.missing_count(), 12);
        assert_eq!(unmapped.required_size(), 10);
        assert!(unmapped.as_numeric().is_none());
    }

    #[test]
    fn test_empty_facet() {
        let facet = NumericTermsFacet::empty(ComparatorType::Count, 10);
        assert!(facet.entries().is_empty());
        assert_eq!(facet.missing_count(), 0);
        assert_eq!(facet.total_count(), 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let facet: ShardFacet =
            NumericTermsFacet::new(ComparatorType::Count, 2, entries(&[(1.5, 2)]), 0, 2).into();
        let json = serde_json::to_string(&facet).unwrap();
        assert!(json.contains("\"kind\":\"numeric\""));
        let restored: ShardFacet = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, facet);
    }

    #[test]
    fn test_deserialize_truncates_to_required_size() {
        let json = r#"{
            "kind": "numeric",
            "comparator": "count",
            "required_size": 1,
            "entries": [{"value": 1.0, "count": 5}, {"value": 2.0, "count": 3}],
            "missing": 0,
            "total": 8
        }"#;
        let facet: ShardFacet = serde_json::from_str(json).unwrap();

        assert_eq!(facet.required_size(), 1);
        assert_eq!(facet.entries().len(), 1);
        assert_eq!(facet.entries()[0].value(), 1.0);
        assert_eq!(facet.other_count(), 3);

        let decoded = crate::codec::decode(&crate::codec::encode(&facet)).unwrap();
        assert_eq!(decoded, facet);
    }
}
