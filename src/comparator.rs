//! Comparator family used to rank facet entries
//!
//! Each comparator has a stable one-byte id used on the wire and a name used in
//! configuration. All comparators finish with the entry sequence number, so two
//! distinct entries never compare equal.

use crate::entry::RankedEntry;
use crate::error::FacetError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Ordering applied when selecting and listing the top entries of a facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparatorType {
    /// Highest count first, ties broken by the larger term
    #[default]
    Count,
    /// Lowest count first, ties broken by the smaller term
    ReverseCount,
    /// Smallest term first, ties broken by the lower count
    Term,
    /// Largest term first, ties broken by the higher count
    ReverseTerm,
}

impl ComparatorType {
    /// Every comparator, in id order
    pub const ALL: [Self; 4] = [Self::Count, Self::ReverseCount, Self::Term, Self::ReverseTerm];

    /// Stable wire id
    pub fn id(self) -> u8 {
        match self {
            Self::Count => 0,
            Self::ReverseCount => 1,
            Self::Term => 2,
            Self::ReverseTerm => 3,
        }
    }

    /// Resolve a wire id
    pub fn from_id(id: u8) -> Result<Self, FacetError> {
        match id {
            0 => Ok(Self::Count),
            1 => Ok(Self::ReverseCount),
            2 => Ok(Self::Term),
            3 => Ok(Self::ReverseTerm),
            other => Err(FacetError::InvalidComparatorId(other)),
        }
    }

    /// Configuration name
    pub fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::ReverseCount => "reverse_count",
            Self::Term => "term",
            Self::ReverseTerm => "reverse_term",
        }
    }

    /// Compare two entries, falling back to the sequence number on domain ties
    pub fn compare(self, a: &RankedEntry, b: &RankedEntry) -> Ordering {
        self.compare_domain(a, b)
            .then_with(|| a.sequence().cmp(&b.sequence()))
    }

    /// Compare two entries by term and count only
    ///
    /// Returns `Equal` exactly when value and count are both equal.
    pub fn compare_domain(self, a: &RankedEntry, b: &RankedEntry) -> Ordering {
        match self {
            Self::Count => b
                .count()
                .cmp(&a.count())
                .then_with(|| b.value().total_cmp(&a.value())),
            Self::ReverseCount => Self::Count.compare_domain(a, b).reverse(),
            Self::Term => a
                .value()
                .total_cmp(&b.value())
                .then_with(|| a.count().cmp(&b.count())),
            Self::ReverseTerm => Self::Term.compare_domain(a, b).reverse(),
        }
    }
}

impl Display for ComparatorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComparatorType {
    type Err = FacetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(Self::Count),
            "reverse_count" | "reversecount" => Ok(Self::ReverseCount),
            "term" => Ok(Self::Term),
            "reverse_term" | "reverseterm" => Ok(Self::ReverseTerm),
            _ => Err(FacetError::unknown_comparator(s)),
        }
    }
}
