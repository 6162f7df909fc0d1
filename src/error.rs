//! Error types for shardfacet operations
//!
//! Decoding failures are reported with enough context to identify the field
//! that could not be read, so a coordinator can reject a single shard's
//! contribution without guessing at what went wrong.

use thiserror::Error;

/// Main error type for all shardfacet operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FacetError {
    /// Buffer ended before a field could be read completely
    #[error("Truncated facet buffer: reading {field} needs {needed} bytes, {available} available")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// Type tag does not name a known facet encoding
    #[error("Unknown facet type tag: {tag:?}")]
    UnknownTypeTag { tag: [u8; 4] },

    /// Comparator byte does not map to a comparator type
    #[error("Invalid comparator id: {0}")]
    InvalidComparatorId(u8),

    /// Comparator name could not be parsed
    #[error("Unknown comparator: {name}. {suggestion}")]
    UnknownComparator { name: String, suggestion: String },

    /// Variable-length integer ran past ten bytes
    #[error("Malformed varint while reading {field}: exceeded 10 bytes")]
    VarintOverflow { field: &'static str },

    /// Decoded integer does not fit the target type
    #[error("Value out of range for {field}: {value}")]
    ValueOutOfRange { field: &'static str, value: u64 },

    /// Encoded entry list is longer than the facet's required size
    #[error("Entry count {entries} exceeds required size {required_size}")]
    EntryCountExceedsRequiredSize { entries: u64, required_size: usize },

    /// Unmapped placeholder was encoded with entries
    #[error("Unmapped facet placeholder carries {entries} entries")]
    PlaceholderWithEntries { entries: u64 },

    /// Decoding would exceed a configured limit
    #[error("Limit exceeded: {limit} is {maximum}, buffer declares {actual}")]
    LimitExceeded {
        limit: &'static str,
        maximum: u64,
        actual: u64,
    },

    /// Bytes remained after a complete facet was decoded
    #[error("Trailing bytes after facet: {remaining} bytes left unread")]
    TrailingBytes { remaining: usize },

    /// Reduce was called without any partial results
    #[error("Cannot reduce an empty set of partial facets. {suggestion}")]
    EmptyReduceInput { suggestion: String },

    /// Configuration validation failed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FacetError {
    /// Create a truncation error for a field
    pub fn truncated(field: &'static str, needed: usize, available: usize) -> Self {
        Self::Truncated {
            field,
            needed,
            available,
        }
    }

    /// Create an unknown comparator error with a suggestion listing valid names
    pub fn unknown_comparator(name: impl Into<String>) -> Self {
        Self::UnknownComparator {
            name: name.into(),
            suggestion: "Use one of: count, reverse_count, term, reverse_term".to_string(),
        }
    }

    /// Create the error returned by reduce for an empty input
    pub fn empty_reduce_input() -> Self {
        Self::EmptyReduceInput {
            suggestion: "Substitute an empty partial facet for shards that did not answer".to_string(),
        }
    }

    /// Create a limit exceeded error
    pub fn limit_exceeded(limit: &'static str, maximum: u64, actual: u64) -> Self {
        Self::LimitExceeded { limit, maximum, actual }
    }

    /// Create a detailed config error
    pub fn config_error(field: impl Into<String>, reason: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Config(format!("{} - {}: {}", field.into(), reason.into(), suggestion.into()))
    }

    /// Check if this error came from malformed wire data
    ///
    /// Malformed data is terminal for the shard that produced it: retrying the
    /// decode of the same bytes cannot succeed.
    pub fn is_malformed_wire(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::UnknownTypeTag { .. }
                | Self::InvalidComparatorId(_)
                | Self::VarintOverflow { .. }
                | Self::ValueOutOfRange { .. }
                | Self::EntryCountExceedsRequiredSize { .. }
                | Self::PlaceholderWithEntries { .. }
                | Self::TrailingBytes { .. }
        )
    }

    /// Check if this error was raised by a configured limit rather than bad data
    pub fn is_limit(&self) -> bool {
        matches!(self, Self::LimitExceeded { .. })
    }
}
