//! Ranked facet entries
//!
//! A [`RankedEntry`] pairs a numeric term with the number of times it was
//! observed. The sequence number is not part of the entry's identity: it only
//! gives the ranking set a strict order when two entries tie on term and count.

use serde::{Deserialize, Serialize};

/// A term value with its occurrence count
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RankedEntry {
    value: f64,
    count: u64,
    #[serde(skip)]
    sequence: u64,
}

impl RankedEntry {
    /// Create an entry with sequence number 0
    pub fn new(value: f64, count: u64) -> Self {
        Self {
            value,
            count,
            sequence: 0,
        }
    }

    /// Assign the tie-break sequence number
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Term value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Number of occurrences
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Tie-break sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Textual form of the term
    ///
    /// Uses Rust's shortest round-trip float formatting (`{:?}`): `"1.0"`,
    /// `"-2.5"`, `"1e-8"`, `"NaN"`, `"inf"`.
    pub fn term(&self) -> String {
        format!("{:?}", self.value)
    }

    /// Key identifying this entry's term in accumulator maps
    ///
    /// Terms are keyed by bit pattern, so `0.0` and `-0.0` are distinct terms
    /// and every NaN payload is its own term.
    pub fn term_key(&self) -> u64 {
        self.value.to_bits()
    }
}

impl PartialEq for RankedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.value.to_bits() == other.value.to_bits() && self.count == other.count
    }
}

impl Eq for RankedEntry {}
