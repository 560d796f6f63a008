//! The source of the current time.
//!
//! Anything that depends on "now", such as validating transaction dates or
//! bucketing spending by time frame, reads the time through a [Clock] so tests
//! can pin it to a fixed instant.

use time::{OffsetDateTime, UtcOffset};

/// Provides the current date and time in the user's local offset.
pub trait Clock {
    /// The current date and time.
    fn now(&self) -> OffsetDateTime;
}

/// Reads the system clock and converts it to a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    offset: UtcOffset,
}

impl SystemClock {
    /// Create a clock that reports the system time in `offset`.
    pub fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

/// A clock that always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}
