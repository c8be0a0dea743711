use super::Cache;

use std::{
    collections::hash_map::RandomState,
    hash::{BuildHasher, Hash},
    marker::PhantomData,
};

/// Builds a [`Cache`][cache-struct] with various configuration knobs.
///
/// [cache-struct]: ./struct.Cache.html
///
/// # Examples
///
/// ```rust
/// use upcache::sync::CacheBuilder;
///
/// let cache = CacheBuilder::new()
///     // The name is used as a prefix of log lines when the `logging` feature
///     // is enabled.
///     .name("file sizes")
///     // Reserve room for 1,000 entries up front.
///     .initial_capacity(1_000)
///     // Record hits, misses and generator runs.
///     .record_stats(true)
///     // Create the cache.
///     .build();
///
/// cache.get_or_add("Cargo.toml", || 2_048u64);
/// assert_eq!(cache.stats().miss_count(), 1);
/// ```
///
#[must_use]
pub struct CacheBuilder<K, V, C> {
    name: Option<String>,
    initial_capacity: Option<usize>,
    record_stats: bool,
    cache_type: PhantomData<(K, V, C)>,
}

impl<K, V> Default for CacheBuilder<K, V, Cache<K, V, RandomState>>
where
    K: Hash + Eq,
    V: Clone,
{
    fn default() -> Self {
        Self {
            name: None,
            initial_capacity: None,
            record_stats: false,
            cache_type: PhantomData,
        }
    }
}

impl<K, V> CacheBuilder<K, V, Cache<K, V, RandomState>>
where
    K: Hash + Eq,
    V: Clone,
{
    /// Construct a new `CacheBuilder` that will be used to build a `Cache`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a `Cache<K, V>`.
    pub fn build(self) -> Cache<K, V, RandomState> {
        let build_hasher = RandomState::default();
        Cache::with_everything(
            self.name,
            self.initial_capacity,
            build_hasher,
            self.record_stats,
        )
    }

    /// Builds a `Cache<K, V, S>`, with the given `hasher`.
    pub fn build_with_hasher<S>(self, hasher: S) -> Cache<K, V, S>
    where
        S: BuildHasher,
    {
        Cache::with_everything(
            self.name,
            self.initial_capacity,
            hasher,
            self.record_stats,
        )
    }
}

impl<K, V, C> CacheBuilder<K, V, C> {
    /// Sets the name of the cache. Currently the name is used for identification
    /// only in logging messages.
    pub fn name(self, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..self
        }
    }

    /// Sets the initial capacity (number of entries) of the cache.
    pub fn initial_capacity(self, number_of_entries: usize) -> Self {
        Self {
            initial_capacity: Some(number_of_entries),
            ..self
        }
    }

    /// Enables or disables recording of the cache statistics. Disabled by
    /// default.
    ///
    /// When disabled, [`Cache::stats`][stats-method] returns all-zero counters.
    ///
    /// [stats-method]: ./struct.Cache.html#method.stats
    pub fn record_stats(self, enabled: bool) -> Self {
        Self {
            record_stats: enabled,
            ..self
        }
    }
}
