pub(super) type Instant = std::time::Instant;

pub(super) fn now() -> Instant {
    std::time::Instant::now()
}
