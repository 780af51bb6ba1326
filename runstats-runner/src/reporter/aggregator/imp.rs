// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::AttachError,
    reporter::{EventKind, RunEvent, SuiteInfo},
    runner::{EventSource, StatsHandle},
    time::{Clock, SystemClock},
};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use std::{cell::RefCell, rc::Rc, time::Duration};
use tracing::{debug, trace};

/// Derives run statistics from the events of an [`EventSource`].
///
/// A collector is created by [`attach`](Self::attach), which registers one handler per
/// [`EventKind`] on the source and installs a fresh [`StatsHandle`] on it. From then on the
/// handlers own the collector; the returned handle (or [`EventSource::stats`]) is used to read the
/// statistics.
///
/// Pass and fail outcomes are deduplicated by the title of the test's parent group:
///
/// * the first pass for a title counts once, and later passes are ignored;
/// * a fail for a passing title moves it from `passes` to `failures`;
/// * a fail for an unknown title counts once, and later fails are ignored.
///
/// A fail never flips back to a pass. Pending outcomes are not deduplicated.
#[derive(Debug)]
pub struct StatsCollector<C = SystemClock> {
    stats: StatsHandle,
    outcomes: GroupOutcomes,
    clock: C,
}

impl StatsCollector<SystemClock> {
    /// Attaches a collector to `source`, timestamping the run with the system clock.
    ///
    /// Returns a handle to the statistics, which are also installed on the source.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::InvalidArgument`] if `source` is `None`. In that case nothing is
    /// registered and no statistics are created.
    pub fn attach<S: EventSource + ?Sized>(
        source: Option<&mut S>,
    ) -> Result<StatsHandle, AttachError> {
        Self::attach_with_clock(source, SystemClock)
    }
}

impl<C: Clock + 'static> StatsCollector<C> {
    /// Attaches a collector to `source`, timestamping the run with `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`AttachError::InvalidArgument`] if `source` is `None`.
    pub fn attach_with_clock<S: EventSource + ?Sized>(
        source: Option<&mut S>,
        clock: C,
    ) -> Result<StatsHandle, AttachError> {
        let source = source.ok_or(AttachError::InvalidArgument { argument: "source" })?;

        let stats = StatsHandle::new();
        source.set_stats(stats.clone());

        let collector = Rc::new(RefCell::new(Self {
            stats: stats.clone(),
            outcomes: GroupOutcomes::default(),
            clock,
        }));

        for kind in EventKind::ALL {
            let collector = collector.clone();
            let handler = Box::new(move |event: &RunEvent| {
                collector.borrow_mut().handle_event(event);
            });
            if kind.fires_once() {
                source.once(kind, handler);
            } else {
                source.on(kind, handler);
            }
        }

        debug!("attached stats collector");
        Ok(stats)
    }

    fn handle_event(&mut self, event: &RunEvent) {
        match event {
            RunEvent::RunBegin => {
                let start = self.clock.now();
                self.stats.update(|stats| stats.start = Some(start));
                debug!(%start, "run started");
            }
            RunEvent::SuiteBegin { suite } => self.handle_suite_begin(suite),
            RunEvent::TestPass { test } => {
                let title = &test.parent.title;
                if self.outcomes.record_pass(title) {
                    self.stats.update(|stats| stats.passes += 1);
                    trace!(%title, "group passed");
                } else {
                    trace!(%title, "ignoring pass for group with a recorded outcome");
                }
            }
            RunEvent::TestFail { test, .. } => {
                let title = &test.parent.title;
                match self.outcomes.record_fail(title) {
                    Transition::Recorded => {
                        self.stats.update(|stats| stats.failures += 1);
                        trace!(%title, "group failed");
                    }
                    Transition::PassedToFailed => {
                        self.stats.update(|stats| {
                            stats.passes -= 1;
                            stats.failures += 1;
                        });
                        debug!(%title, "group flipped from passed to failed");
                    }
                    Transition::Unchanged => {
                        trace!(%title, "ignoring repeated failure for group");
                    }
                }
            }
            RunEvent::TestPending { test } => {
                self.stats.update(|stats| stats.pending += 1);
                trace!(title = %test.title, "test pending");
            }
            // Outcomes are already counted by the pass, fail and pending events.
            RunEvent::TestEnd { .. } => {}
            RunEvent::RunEnd => {
                let end = self.clock.now();
                self.stats.update(|stats| {
                    stats.end = Some(end);
                    stats.duration = stats.start.map(|start| elapsed_millis(start, end));
                });
                self.stats.read(|stats| {
                    debug!(
                        suites = stats.suites,
                        tests = stats.tests,
                        passes = stats.passes,
                        failures = stats.failures,
                        pending = stats.pending,
                        duration_ms = ?stats.duration_ms(),
                        "run finished",
                    );
                });
            }
        }
    }

    fn handle_suite_begin(&mut self, suite: &SuiteInfo) {
        let is_root = suite.root;
        let has_title = !suite.title.is_empty();
        self.stats.update(|stats| {
            if !is_root {
                stats.suites += 1;
            }
            if has_title {
                stats.tests += 1;
            }
        });
        trace!(title = %suite.title, root = is_root, "suite entered");
    }
}

/// Returns `end - start` truncated to whole milliseconds, clamped to zero.
fn elapsed_millis(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Duration {
    let millis = (end - start).num_milliseconds().max(0);
    Duration::from_millis(millis.unsigned_abs())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum GroupOutcome {
    Passed,
    Failed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Transition {
    Recorded,
    PassedToFailed,
    Unchanged,
}

/// The current outcome of every test group reported so far, keyed by title.
#[derive(Debug, Default)]
struct GroupOutcomes {
    outcomes: IndexMap<String, GroupOutcome>,
}

impl GroupOutcomes {
    /// Records a pass, returning true if the group had no outcome yet.
    fn record_pass(&mut self, title: &str) -> bool {
        if self.outcomes.contains_key(title) {
            false
        } else {
            self.outcomes.insert(title.to_owned(), GroupOutcome::Passed);
            true
        }
    }

    fn record_fail(&mut self, title: &str) -> Transition {
        match self.outcomes.get_mut(title) {
            Some(outcome) => match outcome {
                GroupOutcome::Passed => {
                    *outcome = GroupOutcome::Failed;
                    Transition::PassedToFailed
                }
                GroupOutcome::Failed => Transition::Unchanged,
            },
            None => {
                self.outcomes.insert(title.to_owned(), GroupOutcome::Failed);
                Transition::Recorded
            }
        }
    }

    #[cfg(test)]
    fn count(&self, outcome: GroupOutcome) -> usize {
        self.outcomes.values().filter(|o| **o == outcome).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        reporter::TestInfo,
        runner::{RunStats, Runner},
        time::ManualClock,
    };
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use test_strategy::{Arbitrary, proptest};

    fn t0() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-05-01T10:00:00+00:00").unwrap()
    }

    fn attached() -> (Runner, StatsHandle, ManualClock) {
        let mut runner = Runner::new();
        let clock = ManualClock::new(t0());
        let stats = StatsCollector::attach_with_clock(Some(&mut runner), clock.clone()).unwrap();
        (runner, stats, clock)
    }

    fn pass(group: &str) -> RunEvent {
        RunEvent::TestPass {
            test: TestInfo::new(format!("{group} test"), group),
        }
    }

    fn fail(group: &str) -> RunEvent {
        RunEvent::TestFail {
            test: TestInfo::new(format!("{group} test"), group),
            error: None,
        }
    }

    fn pending(group: &str) -> RunEvent {
        RunEvent::TestPending {
            test: TestInfo::new(format!("{group} test"), group),
        }
    }

    #[test]
    fn attach_without_source() {
        let error = StatsCollector::attach::<Runner>(None).unwrap_err();
        assert_eq!(error, AttachError::InvalidArgument { argument: "source" });
    }

    #[test]
    fn attach_installs_fresh_stats() {
        let mut runner = Runner::new();
        let stats = StatsCollector::attach(Some(&mut runner)).unwrap();

        assert_eq!(stats.snapshot(), RunStats::default());
        let installed = runner.stats().expect("stats installed on source");
        assert!(installed.same_record(&stats));
        for kind in EventKind::ALL {
            assert_eq!(runner.handler_count(kind), 1, "one handler for {kind}");
        }
    }

    #[test]
    fn attach_twice_replaces_stats() {
        let mut runner = Runner::new();
        let first = StatsCollector::attach(Some(&mut runner)).unwrap();
        let second = StatsCollector::attach(Some(&mut runner)).unwrap();

        assert!(!first.same_record(&second));
        assert!(runner.stats().unwrap().same_record(&second));
    }

    #[test]
    fn duplicate_pass_counts_once() {
        let (mut runner, stats, _) = attached();
        runner.emit(&pass("A"));
        runner.emit(&pass("A"));
        assert_eq!(stats.read(|s| (s.passes, s.failures)), (1, 0));
    }

    #[test]
    fn pass_then_fail_flips() {
        let (mut runner, stats, _) = attached();
        runner.emit(&pass("A"));
        runner.emit(&fail("A"));
        assert_eq!(stats.read(|s| (s.passes, s.failures)), (0, 1));

        // A later pass does not flip the group back.
        runner.emit(&pass("A"));
        assert_eq!(stats.read(|s| (s.passes, s.failures)), (0, 1));
    }

    #[test]
    fn repeated_fail_counts_once() {
        let (mut runner, stats, _) = attached();
        runner.emit(&fail("A"));
        runner.emit(&fail("A"));
        assert_eq!(stats.read(|s| (s.passes, s.failures)), (0, 1));
    }

    #[test]
    fn pending_not_deduplicated() {
        let (mut runner, stats, _) = attached();
        runner.emit(&pending("A"));
        runner.emit(&pending("A"));
        runner.emit(&pending("B"));
        assert_eq!(stats.read(|s| s.pending), 3);
    }

    #[test]
    fn suite_counting() {
        let (mut runner, stats, _) = attached();
        let suites = [
            SuiteInfo::root(),
            SuiteInfo {
                root: true,
                title: "named root".to_owned(),
            },
            SuiteInfo::new(""),
            SuiteInfo::new("Suite1"),
        ];
        for suite in suites {
            runner.emit(&RunEvent::SuiteBegin { suite });
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.suites, 2, "root suites are not counted");
        assert_eq!(snapshot.tests, 2, "suites with empty titles are not counted");
    }

    #[test]
    fn test_end_is_ignored() {
        let (mut runner, stats, _) = attached();
        runner.emit(&RunEvent::TestEnd {
            test: TestInfo::new("t1", "A"),
        });
        assert_eq!(stats.snapshot(), RunStats::default());
    }

    #[test]
    fn run_timing() {
        let (mut runner, stats, clock) = attached();
        let t1 = t0() + chrono::Duration::milliseconds(1234);

        runner.emit(&RunEvent::RunBegin);
        clock.set(t1);
        runner.emit(&RunEvent::RunEnd);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.start, Some(t0()));
        assert_eq!(snapshot.end, Some(t1));
        assert_eq!(snapshot.duration, Some(Duration::from_millis(1234)));
    }

    #[test]
    fn run_begin_and_end_fire_once() {
        let (mut runner, stats, clock) = attached();
        runner.emit(&RunEvent::RunBegin);
        clock.advance(Duration::from_secs(1));
        runner.emit(&RunEvent::RunBegin);
        runner.emit(&RunEvent::RunEnd);
        clock.advance(Duration::from_secs(1));
        runner.emit(&RunEvent::RunEnd);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.start, Some(t0()));
        assert_eq!(snapshot.duration, Some(Duration::from_secs(1)));
        assert_eq!(runner.handler_count(EventKind::RunBegin), 0);
        assert_eq!(runner.handler_count(EventKind::RunEnd), 0);
    }

    #[test]
    fn run_end_without_start() {
        let (mut runner, stats, _) = attached();
        runner.emit(&RunEvent::RunEnd);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.start, None);
        assert_eq!(snapshot.end, Some(t0()));
        assert_eq!(snapshot.duration, None);
    }

    #[test]
    fn duration_truncates_and_clamps() {
        let start = t0();
        assert_eq!(
            elapsed_millis(start, start + chrono::Duration::microseconds(1_999)),
            Duration::from_millis(1)
        );
        assert_eq!(
            elapsed_millis(start, start - chrono::Duration::seconds(5)),
            Duration::ZERO
        );
    }

    #[test]
    fn end_to_end() {
        let (mut runner, stats, clock) = attached();
        let events = [
            RunEvent::RunBegin,
            RunEvent::SuiteBegin {
                suite: SuiteInfo::root(),
            },
            // A titled root suite: counted under `tests` but not under `suites`.
            RunEvent::SuiteBegin {
                suite: SuiteInfo {
                    root: true,
                    title: "Suite1".to_owned(),
                },
            },
            pass("t1"),
            fail("t2"),
            pending("t3"),
        ];
        for event in &events {
            runner.emit(event);
        }
        clock.advance(Duration::from_millis(20));
        runner.emit(&RunEvent::RunEnd);

        assert_eq!(
            stats.snapshot(),
            RunStats {
                suites: 0,
                tests: 1,
                passes: 1,
                pending: 1,
                failures: 1,
                start: Some(t0()),
                end: Some(t0() + chrono::Duration::milliseconds(20)),
                duration: Some(Duration::from_millis(20)),
            }
        );
    }

    #[test]
    fn end_to_end_nested_suite() {
        let (mut runner, stats, _) = attached();
        runner.emit(&RunEvent::RunBegin);
        runner.emit(&RunEvent::SuiteBegin {
            suite: SuiteInfo::root(),
        });
        runner.emit(&RunEvent::SuiteBegin {
            suite: SuiteInfo::new("Suite1"),
        });
        runner.emit(&pass("t1"));
        runner.emit(&RunEvent::RunEnd);

        let snapshot = stats.snapshot();
        assert_eq!((snapshot.suites, snapshot.tests), (1, 1));
        assert_eq!(snapshot.passes, 1);
    }

    #[derive(Clone, Debug, Arbitrary)]
    enum Outcome {
        Pass(#[strategy(0..4u8)] u8),
        Fail(#[strategy(0..4u8)] u8),
        Pending(#[strategy(0..4u8)] u8),
    }

    #[proptest]
    fn counters_match_group_outcomes(outcomes: Vec<Outcome>) {
        let (mut runner, stats, _) = attached();
        let mut model: HashMap<u8, GroupOutcome> = HashMap::new();
        let mut pending_count = 0;

        for outcome in &outcomes {
            match *outcome {
                Outcome::Pass(group) => {
                    runner.emit(&pass(&group.to_string()));
                    model.entry(group).or_insert(GroupOutcome::Passed);
                }
                Outcome::Fail(group) => {
                    runner.emit(&fail(&group.to_string()));
                    model.insert(group, GroupOutcome::Failed);
                }
                Outcome::Pending(group) => {
                    runner.emit(&pending(&group.to_string()));
                    pending_count += 1;
                }
            }

            let snapshot = stats.snapshot();
            assert!(snapshot.passes + snapshot.failures <= model.len());
        }

        let expected_passes = model
            .values()
            .filter(|o| **o == GroupOutcome::Passed)
            .count();
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.passes, expected_passes);
        assert_eq!(snapshot.failures, model.len() - expected_passes);
        assert_eq!(snapshot.pending, pending_count);
    }

    #[test]
    fn group_outcomes_transitions() {
        let mut outcomes = GroupOutcomes::default();
        assert!(outcomes.record_pass("A"));
        assert!(!outcomes.record_pass("A"));
        assert_eq!(outcomes.record_fail("A"), Transition::PassedToFailed);
        assert_eq!(outcomes.record_fail("A"), Transition::Unchanged);
        assert!(!outcomes.record_pass("A"));
        assert_eq!(outcomes.record_fail("B"), Transition::Recorded);

        assert_eq!(outcomes.count(GroupOutcome::Passed), 0);
        assert_eq!(outcomes.count(GroupOutcome::Failed), 2);
    }
}
