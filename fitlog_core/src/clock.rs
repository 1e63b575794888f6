//! Time source used to stamp new workouts and find "today".

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

/// Source of the current local time
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    /// Calendar date of `now()`
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall-clock time in the local timezone, truncated to whole seconds
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }
}

/// A clock frozen at one instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
