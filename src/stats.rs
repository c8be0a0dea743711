//! Provides the statistics snapshot of a cache.

mod cache_stats;
pub(crate) mod stats_counter;

pub use cache_stats::CacheStats;
