//! Performance benchmarks for facet reduction and the wire codec
//!
//! This benchmark suite covers:
//! - Merging partial facets from a growing number of shards
//! - Scratch map pool reuse versus fresh allocation
//! - Encoding and decoding partial facets

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shardfacet::codec::{decode, encode};
use shardfacet::{
    ComparatorType, FacetReducer, NumericTermsFacet, RankedEntry, ScratchMapPool, ScratchPoolConfig, ShardFacet,
};
use std::sync::Arc;

/// Benchmark configuration
struct BenchConfig {
    /// Entries each shard returns
    required_size: usize,
    /// Distinct term values across all shards
    distinct_terms: u64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            required_size: 100,
            distinct_terms: 2_000,
        }
    }
}

/// Generate one shard's partial facet; shards overlap on part of their terms
fn generate_shard(config: &BenchConfig, shard: u64) -> ShardFacet {
    let entries: Vec<RankedEntry> = (0..config.required_size as u64)
        .map(|i| {
            let value = ((shard * 37 + i * 13) % config.distinct_terms) as f64 * 0.5;
            let count = config.required_size as u64 - i + shard % 7;
            RankedEntry::new(value, count).with_sequence(i)
        })
        .collect();
    let total = entries.iter().map(|e| e.count()).sum::<u64>() * 2;
    NumericTermsFacet::new(ComparatorType::Count, config.required_size, entries, shard, total).into()
}

fn generate_shards(config: &BenchConfig, count: u64) -> Vec<ShardFacet> {
    (0..count).map(|shard| generate_shard(config, shard)).collect()
}

/// Benchmark merging shard results
fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");
    let config = BenchConfig::default();
    let reducer = FacetReducer::with_default_pool();

    for shard_count in [2u64, 8, 32, 128] {
        let shards = generate_shards(&config, shard_count);
        group.throughput(Throughput::Elements(shard_count * config.required_size as u64));
        group.bench_with_input(BenchmarkId::new("merge_shards", shard_count), &shards, |b, shards| {
            b.iter_with_setup(
                || shards.clone(),
                |partials| black_box(reducer.reduce(partials).map(|merged| merged.entries().len())),
            )
        });
    }

    group.finish();
}

/// Benchmark pooled versus freshly allocated scratch maps
fn bench_scratch_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("scratch_pool");
    let config = BenchConfig::default();
    let shards = generate_shards(&config, 16);

    for max_pool_size in [0usize, 4] {
        let pool = Arc::new(ScratchMapPool::with_config(
            ScratchPoolConfig::new().max_pool_size(max_pool_size),
        ));
        pool.prewarm(max_pool_size);
        let reducer = FacetReducer::new(Arc::clone(&pool));

        group.bench_with_input(
            BenchmarkId::new("reduce_with_pool_size", max_pool_size),
            &shards,
            |b, shards| {
                b.iter_with_setup(|| shards.clone(), |partials| black_box(reducer.reduce(partials).is_ok()))
            },
        );

        black_box(pool.statistics().hit_ratio());
    }

    group.finish();
}

/// Benchmark the wire codec
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for required_size in [10usize, 100, 1000] {
        let config = BenchConfig {
            required_size,
            ..Default::default()
        };
        let facet = generate_shard(&config, 1);
        let bytes = encode(&facet);

        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", required_size), &facet, |b, facet| {
            b.iter(|| black_box(encode(facet)))
        });
        group.bench_with_input(BenchmarkId::new("decode", required_size), &bytes, |b, bytes| {
            b.iter(|| black_box(decode(bytes).is_ok()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reduce, bench_scratch_pool, bench_codec);
criterion_main!(benches);
