use std::fmt::{self, Debug};

/// A snapshot of the statistics recorded by a cache.
///
/// Statistics are recorded only when the cache was built with
/// [`CacheBuilder::record_stats`][record-stats] set to `true`. Otherwise every
/// counter stays zero.
///
/// [record-stats]: ../sync/struct.CacheBuilder.html#method.record_stats
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    hit_count: u64,
    miss_count: u64,
    generate_success_count: u64,
    generate_failure_count: u64,
    update_count: u64,
    total_generate_time_nanos: u64,
}

impl Debug for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStats")
            .field("request_count", &self.request_count())
            .field("hit_count", &self.hit_count)
            .field("hit_rate", &self.hit_rate())
            .field("miss_count", &self.miss_count)
            .field("miss_rate", &self.miss_rate())
            .field("generate_success_count", &self.generate_success_count)
            .field("generate_failure_count", &self.generate_failure_count)
            .field("update_count", &self.update_count)
            .field("total_generate_time_nanos", &self.total_generate_time_nanos)
            .field(
                "average_generate_penalty_nanos",
                &self.average_generate_penalty_nanos(),
            )
            .finish()
    }
}

impl CacheStats {
    pub(crate) fn set_req_counts(&mut self, hit_count: u64, miss_count: u64) -> &mut Self {
        self.hit_count = hit_count;
        self.miss_count = miss_count;
        self
    }

    pub(crate) fn set_generate_counts(
        &mut self,
        generate_success_count: u64,
        generate_failure_count: u64,
        total_generate_time_nanos: u64,
    ) -> &mut Self {
        self.generate_success_count = generate_success_count;
        self.generate_failure_count = generate_failure_count;
        self.total_generate_time_nanos = total_generate_time_nanos;
        self
    }

    pub(crate) fn set_update_count(&mut self, update_count: u64) -> &mut Self {
        self.update_count = update_count;
        self
    }

    /// Number of lookups, whether they hit or missed.
    pub fn request_count(&self) -> u64 {
        self.hit_count.saturating_add(self.miss_count)
    }

    /// Number of lookups that found an existing value.
    pub fn hit_count(&self) -> u64 {
        self.hit_count
    }

    /// Ratio of hits to requests. `1.0` when there were no requests.
    pub fn hit_rate(&self) -> f64 {
        let req_count = self.request_count();
        if req_count == 0 {
            1.0
        } else {
            self.hit_count as f64 / req_count as f64
        }
    }

    /// Number of lookups that did not find a value and ran the generator.
    pub fn miss_count(&self) -> u64 {
        self.miss_count
    }

    /// Ratio of misses to requests. `0.0` when there were no requests.
    pub fn miss_rate(&self) -> f64 {
        let req_count = self.request_count();
        if req_count == 0 {
            0.0
        } else {
            self.miss_count as f64 / req_count as f64
        }
    }

    /// Number of generator runs that produced a value.
    pub fn generate_success_count(&self) -> u64 {
        self.generate_success_count
    }

    /// Number of generator runs that returned an error or panicked.
    pub fn generate_failure_count(&self) -> u64 {
        self.generate_failure_count
    }

    /// Number of updater runs on existing entries.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Total nanoseconds spent in generators, including failed runs.
    pub fn total_generate_time_nanos(&self) -> u64 {
        self.total_generate_time_nanos
    }

    /// Average nanoseconds spent per generator run.
    pub fn average_generate_penalty_nanos(&self) -> f64 {
        let generate_count = self
            .generate_success_count
            .saturating_add(self.generate_failure_count);
        if generate_count == 0 {
            0.0
        } else {
            self.total_generate_time_nanos as f64 / generate_count as f64
        }
    }
}
