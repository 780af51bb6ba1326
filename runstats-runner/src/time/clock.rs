// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, FixedOffset, Local, Utc};
use std::{cell::Cell, rc::Rc, time::Duration};

/// A source of wall-clock timestamps.
///
/// The [`StatsCollector`](crate::reporter::StatsCollector) reads the clock when a run begins and
/// when it ends.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// A [`Clock`] backed by the system's local time.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A [`Clock`] that only moves when told to.
///
/// Clones share the same underlying time, so one clone can be handed to a collector while another
/// is advanced by the caller. Used for replaying recorded timestamps and in tests.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<FixedOffset>>>,
}

impl ManualClock {
    /// Creates a new clock set to `now`.
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Sets the current time.
    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    /// Moves the current time forward by `by`.
    ///
    /// Saturates at the latest representable time.
    pub fn advance(&self, by: Duration) {
        let now = self.now.get();
        let next = chrono::Duration::from_std(by)
            .ok()
            .and_then(|by| now.checked_add_signed(by))
            .unwrap_or(DateTime::<Utc>::MAX_UTC.fixed_offset());
        self.now.set(next);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_shared_between_clones() {
        let start = DateTime::parse_from_rfc3339("2024-05-01T10:00:00+02:00").unwrap();
        let clock = ManualClock::new(start);
        let reader = clock.clone();

        clock.advance(Duration::from_millis(1250));
        assert_eq!(
            reader.now(),
            DateTime::parse_from_rfc3339("2024-05-01T10:00:01.250+02:00").unwrap()
        );
        assert_eq!(reader.now().offset(), start.offset(), "offset is preserved");

        clock.set(start);
        assert_eq!(reader.now(), start);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
