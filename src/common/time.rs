use std::time::Duration;

#[cfg_attr(feature = "quanta", path = "time/clock_quanta.rs")]
#[cfg_attr(not(feature = "quanta"), path = "time/clock_compat.rs")]
mod clock;

/// A point in time used to measure how long user callbacks run.
///
/// Wraps either `quanta::Instant` or `std::time::Instant` depending on the
/// `quanta` feature.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub(crate) struct Instant(clock::Instant);

impl Instant {
    pub(crate) fn now() -> Instant {
        Instant(clock::now())
    }

    /// Returns the nanoseconds elapsed since `self`, saturating at zero if the
    /// clock went backwards and at `u64::MAX` on overflow.
    pub(crate) fn elapsed_nanos(self) -> u64 {
        let elapsed = clock::now()
            .checked_duration_since(self.0)
            .unwrap_or(Duration::ZERO);
        u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX)
    }
}
