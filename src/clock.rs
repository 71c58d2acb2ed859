use std::time::SystemTime;

/// The source of "now" for timestamp checks.
///
/// Servers use [`SystemClock`]; tests and replays can pin time by passing a `SystemTime`,
/// which acts as a clock that never advances.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// The operating system's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl Clock for SystemTime {
    fn now(&self) -> SystemTime {
        *self
    }
}
