use super::CacheStats;

use crossbeam_utils::atomic::AtomicCell;

pub(crate) fn saturating_add(counter: &AtomicCell<u64>, value: u64) {
    let mut v0 = counter.load();
    loop {
        let v1 = v0.saturating_add(value);
        match counter.compare_exchange(v0, v1) {
            Ok(_) => break,
            Err(v2) => v0 = v2,
        }
    }
}

/// Records cache events. Every method has a no-op default so that a disabled
/// counter costs nothing on the hot path.
pub(crate) trait StatsCounter {
    fn is_enabled(&self) -> bool {
        false
    }

    fn record_hit(&self) {}

    fn record_miss(&self) {}

    fn record_update(&self) {}

    #[allow(unused_variables)]
    fn record_generate_success(&self, generate_time_nanos: u64) {}

    #[allow(unused_variables)]
    fn record_generate_failure(&self, generate_time_nanos: u64) {}

    fn snapshot(&self) -> CacheStats;
}

/// A `StatsCounter` that does not record any cache events.
pub(crate) struct DisabledStatsCounter;

impl StatsCounter for DisabledStatsCounter {
    fn snapshot(&self) -> CacheStats {
        // Return a `CacheStats` with all fields set to 0.
        CacheStats::default()
    }
}

#[derive(Default)]
pub(crate) struct DefaultStatsCounter {
    hit_count: AtomicCell<u64>,
    miss_count: AtomicCell<u64>,
    generate_success_count: AtomicCell<u64>,
    generate_failure_count: AtomicCell<u64>,
    update_count: AtomicCell<u64>,
    total_generate_time: AtomicCell<u64>,
}

impl StatsCounter for DefaultStatsCounter {
    fn is_enabled(&self) -> bool {
        true
    }

    fn record_hit(&self) {
        saturating_add(&self.hit_count, 1);
    }

    fn record_miss(&self) {
        saturating_add(&self.miss_count, 1);
    }

    fn record_update(&self) {
        saturating_add(&self.update_count, 1);
    }

    fn record_generate_success(&self, generate_time_nanos: u64) {
        saturating_add(&self.generate_success_count, 1);
        saturating_add(&self.total_generate_time, generate_time_nanos);
    }

    fn record_generate_failure(&self, generate_time_nanos: u64) {
        saturating_add(&self.generate_failure_count, 1);
        saturating_add(&self.total_generate_time, generate_time_nanos);
    }

    fn snapshot(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        stats
            .set_req_counts(self.hit_count.load(), self.miss_count.load())
            .set_generate_counts(
                self.generate_success_count.load(),
                self.generate_failure_count.load(),
                self.total_generate_time.load(),
            )
            .set_update_count(self.update_count.load());
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::{saturating_add, DefaultStatsCounter, DisabledStatsCounter, StatsCounter};
    use crossbeam_utils::atomic::AtomicCell;

    #[test]
    fn saturating_add_stops_at_max() {
        let counter = AtomicCell::new(u64::MAX - 1);
        saturating_add(&counter, 5);
        assert_eq!(counter.load(), u64::MAX);
    }

    #[test]
    fn disabled_counter_records_nothing() {
        let counter = DisabledStatsCounter;
        counter.record_hit();
        counter.record_miss();
        counter.record_generate_success(10);
        assert!(!counter.is_enabled());
        assert_eq!(counter.snapshot().request_count(), 0);
    }

    #[test]
    fn default_counter_records_events() {
        let counter = DefaultStatsCounter::default();
        counter.record_hit();
        counter.record_hit();
        counter.record_miss();
        counter.record_update();
        counter.record_generate_success(30);
        counter.record_generate_failure(10);

        let stats = counter.snapshot();
        assert_eq!(stats.hit_count(), 2);
        assert_eq!(stats.miss_count(), 1);
        assert_eq!(stats.update_count(), 1);
        assert_eq!(stats.generate_success_count(), 1);
        assert_eq!(stats.generate_failure_count(), 1);
        assert_eq!(stats.total_generate_time_nanos(), 40);
    }
}
