//! Merge-reduce of partial facets
//!
//! [`FacetReducer`] combines the facets answered by every shard into one
//! result: counts are summed per distinct term, the best `required_size` terms
//! are selected with a [`BoundedRankingSet`], and missing/total counts are
//! summed across shards.
//!
//! The output's comparator and required size come from the carrier, the first
//! numeric facet in input order. Inputs are assumed to share configuration;
//! mismatches are logged, not rejected. When every input is an unmapped
//! placeholder the first input is the carrier and the result is a placeholder
//! carrying the summed counts.

use crate::config::ShardFacetConfig;
use crate::entry::RankedEntry;
use crate::error::FacetError;
use crate::facet::{NumericTermsFacet, ShardFacet, UnmappedTermsFacet};
use crate::ranking::BoundedRankingSet;
use crate::scratch_pool::ScratchMapPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Counters describing the reductions performed by a reducer
#[derive(Debug, Default)]
pub struct ReduceStatistics {
    /// Reductions completed
    pub reductions: AtomicU64,
    /// Reductions answered by the single-input fast path
    pub fast_path_hits: AtomicU64,
    /// Reductions where every input was an unmapped placeholder
    pub placeholder_fallbacks: AtomicU64,
    /// Distinct terms accumulated across all reductions
    pub terms_accumulated: AtomicU64,
    /// Distinct terms cut by the required size
    pub terms_truncated: AtomicU64,
}

impl ReduceStatistics {
    /// Fraction of reductions answered by the fast path
    pub fn fast_path_ratio(&self) -> f64 {
        let reductions = self.reductions.load(Ordering::Relaxed);
        if reductions == 0 {
            0.0
        } else {
            self.fast_path_hits.load(Ordering::Relaxed) as f64 / reductions as f64
        }
    }
}

/// Combines partial facets into one merged facet
#[derive(Debug, Clone)]
pub struct FacetReducer {
    pool: Arc<ScratchMapPool>,
    stats: Arc<ReduceStatistics>,
}

impl FacetReducer {
    /// Create a reducer drawing scratch maps from `pool`
    pub fn new(pool: Arc<ScratchMapPool>) -> Self {
        Self {
            pool,
            stats: Arc::new(ReduceStatistics::default()),
        }
    }

    /// Create a reducer with its own default pool
    pub fn with_default_pool() -> Self {
        Self::new(Arc::new(ScratchMapPool::new()))
    }

    /// Create a reducer with a pool built from the configuration
    pub fn from_config(config: &ShardFacetConfig) -> Result<Self, FacetError> {
        config.validate()?;
        Ok(Self::new(Arc::new(ScratchMapPool::with_config(
            config.scratch_pool.clone(),
        ))))
    }

    /// Scratch pool used by this reducer
    pub fn pool(&self) -> &Arc<ScratchMapPool> {
        &self.pool
    }

    /// Reduction statistics
    pub fn statistics(&self) -> &ReduceStatistics {
        &self.stats
    }

    /// Merge partial facets into one
    ///
    /// A single input is returned unchanged. An empty input is an error.
    pub fn reduce(&self, mut partials: Vec<ShardFacet>) -> Result<ShardFacet, FacetError> {
        if partials.is_empty() {
            return Err(FacetError::empty_reduce_input());
        }

        self.stats.reductions.fetch_add(1, Ordering::Relaxed);

        if partials.len() == 1 {
            self.stats.fast_path_hits.fetch_add(1, Ordering::Relaxed);
            trace!("Single partial facet, returning unchanged");
            return Ok(partials.swap_remove(0));
        }

        let carrier_index = match partials.iter().position(|facet| !facet.is_placeholder()) {
            Some(index) => index,
            None => {
                self.stats.placeholder_fallbacks.fetch_add(1, Ordering::Relaxed);
                debug!(
                    partials = partials.len(),
                    "All partial facets are unmapped placeholders, using the first as carrier"
                );
                0
            }
        };
        let carrier = &partials[carrier_index];
        let comparator = carrier.comparator();
        let required_size = carrier.required_size();

        let mut missing: u64 = 0;
        let mut total: u64 = 0;
        let mut accumulated = self.pool.acquire();

        for facet in &partials {
            if facet.comparator() != comparator || facet.required_size() != required_size {
                debug!(
                    carrier_comparator = %comparator,
                    carrier_required_size = required_size,
                    comparator = %facet.comparator(),
                    required_size = facet.required_size(),
                    "Partial facet configuration differs from carrier"
                );
            }

            missing = missing.saturating_add(facet.missing_count());
            total = total.saturating_add(facet.total_count());
            for entry in facet.entries() {
                accumulated.add(entry);
            }
        }

        if carrier.is_placeholder() {
            return Ok(UnmappedTermsFacet::new(comparator, required_size, missing, total).into());
        }

        let mut ranked = BoundedRankingSet::new(comparator, required_size);
        for (sequence, (value, count)) in accumulated.iter().enumerate() {
            ranked.insert(RankedEntry::new(value, count).with_sequence(sequence as u64));
        }

        let distinct = accumulated.len();
        drop(accumulated);

        let truncated = distinct - ranked.len();
        self.stats.terms_accumulated.fetch_add(distinct as u64, Ordering::Relaxed);
        self.stats.terms_truncated.fetch_add(truncated as u64, Ordering::Relaxed);

        debug!(
            partials = partials.len(),
            distinct_terms = distinct,
            truncated,
            missing,
            total,
            "Reduced partial facets"
        );

        Ok(NumericTermsFacet::new(comparator, required_size, ranked.into_sorted_vec(), missing, total).into())
    }
}

impl Default for FacetReducer {
    fn default() -> Self {
        Self::with_default_pool()
    }
}
