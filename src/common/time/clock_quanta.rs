pub(super) type Instant = quanta::Instant;

pub(super) fn now() -> Instant {
    quanta::Instant::now()
}
