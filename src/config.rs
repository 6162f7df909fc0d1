//! Configuration structures for shardfacet
//!
//! This module provides the configuration system for facet reduction and wire
//! decoding, including parameter validation and builder pattern implementation.

use crate::error::FacetError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the scratch aggregation map pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScratchPoolConfig {
    /// Maximum number of idle maps kept in the pool
    pub max_pool_size: usize,
    /// Maximum capacity of a map returned to the pool (larger maps are discarded)
    pub max_map_capacity: usize,
    /// Capacity of freshly allocated maps
    pub initial_capacity: usize,
    /// Maximum time a map may sit idle before cleanup removes it
    pub max_idle: Duration,
}

impl Default for ScratchPoolConfig {
    fn default() -> Self {
        Self {
            max_pool_size: 64,
            max_map_capacity: 1 << 20,
            initial_capacity: 256,
            max_idle: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl ScratchPoolConfig {
    /// Create a new pool configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of idle maps
    pub fn max_pool_size(mut self, size: usize) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Set the maximum capacity of a map kept for reuse
    pub fn max_map_capacity(mut self, capacity: usize) -> Self {
        self.max_map_capacity = capacity;
        self
    }

    /// Set the capacity of freshly allocated maps
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the idle time after which pooled maps are cleaned up
    pub fn max_idle(mut self, max_idle: Duration) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Validate the pool configuration
    pub fn validate(&self) -> Result<(), FacetError> {
        if self.initial_capacity > self.max_map_capacity {
            return Err(FacetError::config_error(
                "scratch_pool.initial_capacity",
                format!(
                    "value {} exceeds max_map_capacity ({})",
                    self.initial_capacity, self.max_map_capacity
                ),
                "Fresh maps larger than max_map_capacity would be discarded on release; lower initial_capacity",
            ));
        }

        if self.max_idle.is_zero() {
            return Err(FacetError::config_error(
                "scratch_pool.max_idle",
                "must be greater than 0",
                "Set max_idle to how long unused maps may be kept (recommended: 1-10 minutes)",
            ));
        }

        Ok(())
    }

    /// Build the configuration after validation
    pub fn build(self) -> Result<Self, FacetError> {
        self.validate()?;
        Ok(self)
    }
}

/// Limits applied while decoding facets from untrusted buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecLimits {
    /// Maximum number of entries a single facet may declare
    pub max_entries: usize,
    /// Maximum required size a facet may declare
    pub max_required_size: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_entries: 100_000,
            max_required_size: 100_000,
        }
    }
}

impl CodecLimits {
    /// Create limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits accepting anything representable on this platform
    pub fn unbounded() -> Self {
        Self {
            max_entries: usize::MAX,
            max_required_size: usize::MAX,
        }
    }

    /// Set the maximum number of entries per facet
    pub fn max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Set the maximum required size per facet
    pub fn max_required_size(mut self, max_required_size: usize) -> Self {
        self.max_required_size = max_required_size;
        self
    }

    /// Validate the codec limits
    pub fn validate(&self) -> Result<(), FacetError> {
        if self.max_required_size == 0 {
            return Err(FacetError::config_error(
                "codec.max_required_size",
                "must be greater than 0",
                "Set max_required_size to the largest facet size your queries request (e.g. 10000)",
            ));
        }

        if self.max_entries == 0 {
            return Err(FacetError::config_error(
                "codec.max_entries",
                "must be greater than 0",
                "Set max_entries to at least the largest requested facet size",
            ));
        }

        Ok(())
    }
}

/// Top-level configuration for facet reduction and transport
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShardFacetConfig {
    /// Scratch map pool used by the reducer
    pub scratch_pool: ScratchPoolConfig,
    /// Decoding limits used by the codec
    pub codec: CodecLimits,
}

impl ShardFacetConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scratch pool configuration
    pub fn scratch_pool(mut self, config: ScratchPoolConfig) -> Self {
        self.scratch_pool = config;
        self
    }

    /// Set the codec limits
    pub fn codec(mut self, limits: CodecLimits) -> Self {
        self.codec = limits;
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), FacetError> {
        self.scratch_pool.validate()?;
        self.codec.validate()?;
        Ok(())
    }

    /// Build the configuration after validation
    pub fn build(self) -> Result<Self, FacetError> {
        self.validate()?;
        Ok(self)
    }
}
