//! Clocks

use jiff::Zoned;

/// Source of the current zoned time.
pub trait Clock: Send + Sync {
    /// The current instant in the local time zone.
    fn now(&self) -> Zoned;
}

/// Wall clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Zoned::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone)]
pub struct FixedClock(pub Zoned);

impl Clock for FixedClock {
    fn now(&self) -> Zoned {
        self.0.clone()
    }
}
