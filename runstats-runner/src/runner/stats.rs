// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, FixedOffset};
use runstats_metadata::{RunStatus, RunSummary};
use std::{cell::RefCell, rc::Rc, time::Duration};

/// Statistics for a test run.
///
/// Counters are updated incrementally as events arrive, so a snapshot taken mid-run is valid but
/// partial.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// The number of non-root suites entered.
    pub suites: usize,

    /// The number of suites entered with a non-empty title.
    ///
    /// This is counted at suite granularity, not per test.
    pub tests: usize,

    /// The number of distinct test groups currently considered passing.
    pub passes: usize,

    /// The number of pending tests observed. Not deduplicated.
    pub pending: usize,

    /// The number of distinct test groups currently considered failing.
    pub failures: usize,

    /// The time at which the run began.
    pub start: Option<DateTime<FixedOffset>>,

    /// The time at which the run ended.
    pub end: Option<DateTime<FixedOffset>>,

    /// The time between `start` and `end`, at millisecond precision.
    ///
    /// Only set at the end of a run that has a start time.
    pub duration: Option<Duration>,
}

impl RunStats {
    /// Returns true if this run is considered a success, i.e. no test groups failed.
    pub fn is_success(&self) -> bool {
        !self.has_failures()
    }

    /// Returns true if any test groups are currently failing.
    #[inline]
    pub fn has_failures(&self) -> bool {
        self.failures > 0
    }

    /// Returns the number of pass, fail and pending outcomes recorded.
    pub fn outcome_count(&self) -> usize {
        self.passes + self.failures + self.pending
    }

    /// Returns the duration in whole milliseconds, if the run has finished.
    pub fn duration_ms(&self) -> Option<u64> {
        self.duration
            .map(|duration| u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    /// Computes the overall status of the run.
    ///
    /// If `fail_on_pending` is true, pending tests make the run fail.
    pub fn status(&self, fail_on_pending: bool) -> RunStatus {
        if self.has_failures() || (fail_on_pending && self.pending > 0) {
            RunStatus::Failed
        } else if self.outcome_count() == 0 {
            RunStatus::NoTestsRun
        } else {
            RunStatus::Passed
        }
    }

    /// Converts these statistics into their machine-readable form.
    pub fn to_summary(&self, fail_on_pending: bool) -> RunSummary {
        RunSummary {
            status: self.status(fail_on_pending),
            suites: self.suites,
            tests: self.tests,
            passes: self.passes,
            pending: self.pending,
            failures: self.failures,
            start: self.start,
            end: self.end,
            duration_ms: self.duration_ms(),
        }
    }
}

/// A shared, read-only view of the [`RunStats`] maintained by a
/// [`StatsCollector`](crate::reporter::StatsCollector).
///
/// Cloning the handle is cheap, and all clones observe the same record. Only the collector that
/// created the handle can modify the record.
#[derive(Clone, Debug)]
pub struct StatsHandle {
    inner: Rc<RefCell<RunStats>>,
}

impl StatsHandle {
    pub(crate) fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RunStats::default())),
        }
    }

    /// Returns a copy of the current statistics.
    pub fn snapshot(&self) -> RunStats {
        self.inner.borrow().clone()
    }

    /// Calls `f` with a reference to the current statistics.
    pub fn read<T>(&self, f: impl FnOnce(&RunStats) -> T) -> T {
        f(&self.inner.borrow())
    }

    /// Returns true if both handles refer to the same record.
    pub fn same_record(&self, other: &StatsHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut RunStats)) {
        f(&mut self.inner.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_is_success() {
        assert!(RunStats::default().is_success(), "empty run => success");
        assert!(
            RunStats {
                passes: 3,
                pending: 2,
                ..RunStats::default()
            }
            .is_success(),
            "passes and pending only => success"
        );
        assert!(
            !RunStats {
                passes: 3,
                failures: 1,
                ..RunStats::default()
            }
            .is_success(),
            "failures => failure"
        );
    }

    #[test_case(RunStats::default(), false, RunStatus::NoTestsRun ; "empty")]
    #[test_case(
        RunStats { suites: 4, tests: 4, ..RunStats::default() },
        false,
        RunStatus::NoTestsRun
        ; "suites without outcomes"
    )]
    #[test_case(
        RunStats { passes: 1, pending: 1, ..RunStats::default() },
        false,
        RunStatus::Passed
        ; "pending allowed"
    )]
    #[test_case(
        RunStats { passes: 1, pending: 1, ..RunStats::default() },
        true,
        RunStatus::Failed
        ; "fail on pending"
    )]
    #[test_case(
        RunStats { pending: 1, ..RunStats::default() },
        false,
        RunStatus::Passed
        ; "only pending"
    )]
    #[test_case(
        RunStats { passes: 2, failures: 1, ..RunStats::default() },
        false,
        RunStatus::Failed
        ; "failures"
    )]
    fn run_status(stats: RunStats, fail_on_pending: bool, expected: RunStatus) {
        assert_eq!(stats.status(fail_on_pending), expected);
    }

    #[test]
    fn handle_clones_share_record() {
        let handle = StatsHandle::new();
        let reader = handle.clone();
        assert!(handle.same_record(&reader));
        assert!(!handle.same_record(&StatsHandle::new()));

        handle.update(|stats| stats.pending += 1);
        assert_eq!(reader.read(|stats| stats.pending), 1);
        assert_eq!(
            reader.snapshot(),
            RunStats {
                pending: 1,
                ..RunStats::default()
            }
        );
    }

    #[test]
    fn summary_duration() {
        let stats = RunStats {
            passes: 1,
            duration: Some(Duration::from_millis(1500)),
            ..RunStats::default()
        };
        let summary = stats.to_summary(false);
        assert_eq!(summary.status, RunStatus::Passed);
        assert_eq!(summary.duration_ms, Some(1500));
        assert_eq!(summary.start, None);
    }
}
