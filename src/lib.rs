//! Shardfacet - shard-level terms facet aggregation
//!
//! A search request fans out to many shards; each shard answers a terms facet
//! with its locally best `required_size` numeric terms, their counts and the
//! number of documents lacking the field. Shardfacet moves those partial
//! results over the wire and merges them into one global top-K answer.
//!
//! # Usage Examples
//!
//! ```rust
//! use shardfacet::codec::{decode, encode};
//! use shardfacet::{ComparatorType, FacetReducer, NumericTermsFacet, RankedEntry, ShardFacet};
//!
//! # fn example() -> shardfacet::Result<()> {
//! let shard_a: ShardFacet = NumericTermsFacet::new(
//!     ComparatorType::Count,
//!     2,
//!     vec![RankedEntry::new(1.0, 5), RankedEntry::new(2.0, 3)],
//!     1,
//!     8,
//! )
//! .into();
//! let shard_b: ShardFacet = NumericTermsFacet::new(
//!     ComparatorType::Count,
//!     2,
//!     vec![RankedEntry::new(1.0, 2), RankedEntry::new(3.0, 4)],
//!     0,
//!     6,
//! )
//! .into();
//!
//! // Shards send their results as bytes
//! let partials = vec![decode(&encode(&shard_a))?, decode(&encode(&shard_b))?];
//!
//! let reducer = FacetReducer::with_default_pool();
//! let merged = reducer.reduce(partials)?;
//!
//! assert_eq!(merged.entries()[0].value(), 1.0);
//! assert_eq!(merged.entries()[0].count(), 7);
//! assert_eq!(merged.other_count(), 3);
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod comparator;
pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod facet;
pub mod ranking;
pub mod reduce;
pub mod report;
pub mod scratch_pool;

#[cfg(test)]
pub mod test_utils;

pub use codec::{FacetCodec, FacetReader};
pub use comparator::ComparatorType;
pub use config::{CodecLimits, ScratchPoolConfig, ShardFacetConfig};
pub use entry::RankedEntry;
pub use error::FacetError;
pub use facet::{NumericTermsFacet, ShardFacet, UnmappedTermsFacet};
pub use ranking::BoundedRankingSet;
pub use reduce::{FacetReducer, ReduceStatistics};
pub use report::{TermCount, TermsFacetReport};
pub use scratch_pool::{PoolStatistics, PooledCountMap, ScratchMapPool};

/// Type alias for Results using FacetError
pub type Result<T> = std::result::Result<T, FacetError>;
