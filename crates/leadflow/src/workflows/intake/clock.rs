use chrono::{DateTime, Local};

/// Time source for the clock-dependent timing factor. Injected so tests can
/// pin the wall clock instead of reading the system time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Production clock backed by the local system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
