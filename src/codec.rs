//! Binary wire codec for terms facets
//!
//! Facets travel from shards to the coordinator in a compact field-by-field
//! layout:
//!
//! | field           | encoding                                   |
//! |-----------------|--------------------------------------------|
//! | type tag        | 4 bytes (`DTRM` numeric, `UTRM` unmapped)  |
//! | comparator id   | 1 byte                                     |
//! | required size   | LEB128 varint                              |
//! | missing count   | LEB128 varint                              |
//! | total count     | LEB128 varint                              |
//! | entry count `n` | LEB128 varint                              |
//! | `n` entries     | 8-byte big-endian f64 bits, LEB128 count   |
//!
//! Entries are decoded in the order written; the decoder never re-ranks.
//! Malformed input fails with a [`FacetError`] and never yields defaults.
//!
//! # Usage Examples
//!
//! ```rust
//! use shardfacet::codec::{decode, encode};
//! use shardfacet::{ComparatorType, NumericTermsFacet, RankedEntry, ShardFacet};
//!
//! # fn example() -> Result<(), shardfacet::FacetError> {
//! let facet: ShardFacet = NumericTermsFacet::new(
//!     ComparatorType::Count,
//!     10,
//!     vec![RankedEntry::new(1.0, 7), RankedEntry::new(3.0, 4)],
//!     1,
//!     14,
//! )
//! .into();
//!
//! let bytes = encode(&facet);
//! assert_eq!(decode(&bytes)?, facet);
//! # Ok(())
//! # }
//! ```

use crate::comparator::ComparatorType;
use crate::config::{CodecLimits, ShardFacetConfig};
use crate::constants::{type_tag, MAX_VARINT_BYTES, TERM_VALUE_WIDTH};
use crate::entry::RankedEntry;
use crate::error::FacetError;
use crate::facet::{NumericTermsFacet, ShardFacet, UnmappedTermsFacet};

/// Smallest encoded size of one entry (8-byte value plus 1-byte count)
const MIN_ENTRY_BYTES: usize = TERM_VALUE_WIDTH + 1;

/// Encode a facet into a new buffer
pub fn encode(facet: &ShardFacet) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_size_hint(facet));
    encode_into(facet, &mut out);
    out
}

/// Append the encoding of a facet to `out`
pub fn encode_into(facet: &ShardFacet, out: &mut Vec<u8>) {
    let tag = match facet {
        ShardFacet::Numeric(_) => type_tag::NUMERIC_TERMS,
        ShardFacet::Unmapped(_) => type_tag::UNMAPPED_TERMS,
    };
    out.extend_from_slice(tag);
    out.push(facet.comparator().id());
    write_varint(out, facet.required_size() as u64);
    write_varint(out, facet.missing_count());
    write_varint(out, facet.total_count());

    let entries = facet.entries();
    write_varint(out, entries.len() as u64);
    for entry in entries {
        out.extend_from_slice(&entry.value().to_bits().to_be_bytes());
        write_varint(out, entry.count());
    }
}

/// Decode exactly one facet from `bytes`
///
/// Fails with [`FacetError::TrailingBytes`] if bytes remain after the facet.
pub fn decode(bytes: &[u8]) -> Result<ShardFacet, FacetError> {
    decode_with_limits(bytes, CodecLimits::unbounded())
}

fn decode_with_limits(bytes: &[u8], limits: CodecLimits) -> Result<ShardFacet, FacetError> {
    let mut reader = FacetReader::with_limits(bytes, limits);
    let facet = reader.read_facet()?;
    if !reader.is_exhausted() {
        return Err(FacetError::TrailingBytes {
            remaining: reader.remaining(),
        });
    }
    Ok(facet)
}

/// Upper bound of the encoded size, used to size output buffers
pub fn encoded_size_hint(facet: &ShardFacet) -> usize {
    type_tag::WIDTH + 1 + 4 * MAX_VARINT_BYTES + facet.entries().len() * (TERM_VALUE_WIDTH + MAX_VARINT_BYTES)
}

/// Append `value` as a LEB128 varint
fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Cursor decoding facets written back to back in one buffer
#[derive(Debug, Clone)]
pub struct FacetReader<'a> {
    buf: &'a [u8],
    pos: usize,
    limits: CodecLimits,
}

impl<'a> FacetReader<'a> {
    /// Create a reader without decoding limits
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_limits(buf, CodecLimits::unbounded())
    }

    /// Create a reader enforcing `limits`
    pub fn with_limits(buf: &'a [u8], limits: CodecLimits) -> Self {
        Self { buf, pos: 0, limits }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Check if every byte has been consumed
    pub fn is_exhausted(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Decode the next facet
    ///
    /// On error the reader position is unspecified; the rest of the buffer
    /// should be discarded.
    pub fn read_facet(&mut self) -> Result<ShardFacet, FacetError> {
        let tag = self.read_tag()?;
        let placeholder = match &tag {
            t if t == type_tag::NUMERIC_TERMS => false,
            t if t == type_tag::UNMAPPED_TERMS => true,
            _ => return Err(FacetError::UnknownTypeTag { tag }),
        };

        let comparator = ComparatorType::from_id(self.read_u8("comparator id")?)?;

        let required_size = self.read_varint("required size")?;
        let required_size = usize::try_from(required_size).map_err(|_| FacetError::ValueOutOfRange {
            field: "required size",
            value: required_size,
        })?;
        if required_size > self.limits.max_required_size {
            return Err(FacetError::limit_exceeded(
                "max_required_size",
                self.limits.max_required_size as u64,
                required_size as u64,
            ));
        }

        let missing = self.read_varint("missing count")?;
        let total = self.read_varint("total count")?;
        let entry_count = self.read_varint("entry count")?;

        if placeholder {
            if entry_count != 0 {
                return Err(FacetError::PlaceholderWithEntries { entries: entry_count });
            }
            return Ok(UnmappedTermsFacet::new(comparator, required_size, missing, total).into());
        }

        if entry_count > required_size as u64 {
            return Err(FacetError::EntryCountExceedsRequiredSize {
                entries: entry_count,
                required_size,
            });
        }
        if entry_count > self.limits.max_entries as u64 {
            return Err(FacetError::limit_exceeded(
                "max_entries",
                self.limits.max_entries as u64,
                entry_count,
            ));
        }

        // entry_count <= required_size, which fits usize
        let entry_count = entry_count as usize;
        let mut entries = Vec::with_capacity(entry_count.min(self.remaining() / MIN_ENTRY_BYTES));
        for sequence in 0..entry_count {
            let value = self.read_f64("term value")?;
            let count = self.read_varint("term count")?;
            entries.push(RankedEntry::new(value, count).with_sequence(sequence as u64));
        }

        Ok(NumericTermsFacet::new(comparator, required_size, entries, missing, total).into())
    }

    fn take(&mut self, len: usize, field: &'static str) -> Result<&'a [u8], FacetError> {
        if self.remaining() < len {
            return Err(FacetError::truncated(field, len, self.remaining()));
        }
        let bytes = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn read_tag(&mut self) -> Result<[u8; type_tag::WIDTH], FacetError> {
        let mut tag = [0u8; type_tag::WIDTH];
        tag.copy_from_slice(self.take(type_tag::WIDTH, "type tag")?);
        Ok(tag)
    }

    fn read_u8(&mut self, field: &'static str) -> Result<u8, FacetError> {
        Ok(self.take(1, field)?[0])
    }

    fn read_f64(&mut self, field: &'static str) -> Result<f64, FacetError> {
        let mut bits = [0u8; TERM_VALUE_WIDTH];
        bits.copy_from_slice(self.take(TERM_VALUE_WIDTH, field)?);
        Ok(f64::from_bits(u64::from_be_bytes(bits)))
    }

    fn read_varint(&mut self, field: &'static str) -> Result<u64, FacetError> {
        let mut value: u64 = 0;
        for index in 0..MAX_VARINT_BYTES {
            let byte = self.read_u8(field)?;
            // The tenth byte may only carry the top bit of a u64
            if index == MAX_VARINT_BYTES - 1 && byte > 1 {
                return Err(FacetError::VarintOverflow { field });
            }
            value |= u64::from(byte & 0x7F) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(FacetError::VarintOverflow { field })
    }
}

impl Iterator for FacetReader<'_> {
    type Item = Result<ShardFacet, FacetError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_exhausted() {
            return None;
        }
        let result = self.read_facet();
        if result.is_err() {
            // Nothing after a malformed facet can be trusted
            self.pos = self.buf.len();
        }
        Some(result)
    }
}

/// Codec applying decoding limits to untrusted shard responses
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetCodec {
    limits: CodecLimits,
}

impl FacetCodec {
    /// Create a codec with the given limits
    pub fn new(limits: CodecLimits) -> Self {
        Self { limits }
    }

    /// Create a codec from the validated configuration
    pub fn from_config(config: &ShardFacetConfig) -> Result<Self, FacetError> {
        config.validate()?;
        Ok(Self::new(config.codec))
    }

    /// Decoding limits
    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    /// Encode a facet
    pub fn encode(&self, facet: &ShardFacet) -> Vec<u8> {
        encode(facet)
    }

    /// Decode exactly one facet, enforcing the limits
    pub fn decode(&self, bytes: &[u8]) -> Result<ShardFacet, FacetError> {
        decode_with_limits(bytes, self.limits).map_err(|error| {
            tracing::warn!(len = bytes.len(), %error, "Rejected encoded facet");
            error
        })
    }

    /// Reader over back-to-back facets, enforcing the limits
    pub fn reader<'a>(&self, bytes: &'a [u8]) -> FacetReader<'a> {
        FacetReader::with_limits(bytes, self.limits)
    }
}
