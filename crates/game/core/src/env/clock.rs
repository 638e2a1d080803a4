use std::time::Instant;

/// Wall-clock source for UI-pacing guards (item cooldown, animation watchdog).
///
/// Turn resolution never reads the clock; only debounce and watchdog checks do.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
