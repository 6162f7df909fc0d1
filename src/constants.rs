//! Central constants for the facet wire format
//!
//! This module provides a single source of truth for the type tags written at
//! the start of every encoded facet and the limits shared across the codec.

/// Facet type tags identifying the term encoding that follows
pub mod type_tag {
    /// Numeric (f64) terms facet
    pub const NUMERIC_TERMS: &[u8; 4] = b"DTRM";

    /// Placeholder answered by shards where the field is unmapped
    pub const UNMAPPED_TERMS: &[u8; 4] = b"UTRM";

    /// Width of every type tag in bytes
    pub const WIDTH: usize = 4;
}

/// Maximum number of bytes needed to encode a u64 as LEB128 varint.
pub const MAX_VARINT_BYTES: usize = 10;

/// Width of an encoded term value (IEEE-754 double, big-endian).
pub const TERM_VALUE_WIDTH: usize = 8;

/// Type label carried by structured facet reports
pub const REPORT_TYPE_LABEL: &str = "terms";
