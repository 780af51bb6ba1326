// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::EventKindParseError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A lifecycle event emitted by a test-execution engine.
///
/// Events are delivered by an [`EventSource`](crate::runner::EventSource) and consumed by
/// handlers such as the [`StatsCollector`](crate::reporter::StatsCollector).
///
/// In serialized form, events are tagged by the `event` field, using the names returned by
/// [`EventKind::as_str`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum RunEvent {
    /// The test run started.
    #[serde(rename = "start")]
    RunBegin,

    /// A suite was entered.
    #[serde(rename = "suite")]
    SuiteBegin {
        /// The suite that was entered.
        suite: SuiteInfo,
    },

    /// A test passed.
    #[serde(rename = "pass")]
    TestPass {
        /// The test that passed.
        test: TestInfo,
    },

    /// A test failed.
    #[serde(rename = "fail")]
    TestFail {
        /// The test that failed.
        test: TestInfo,

        /// The failure message reported by the engine, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },

    /// A test was skipped or marked pending.
    #[serde(rename = "pending")]
    TestPending {
        /// The test that is pending.
        test: TestInfo,
    },

    /// A test completed, regardless of its outcome.
    #[serde(rename = "test end")]
    TestEnd {
        /// The test that completed.
        test: TestInfo,
    },

    /// The test run finished.
    #[serde(rename = "end")]
    RunEnd,
}

impl RunEvent {
    /// Returns the kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            RunEvent::RunBegin => EventKind::RunBegin,
            RunEvent::SuiteBegin { .. } => EventKind::SuiteBegin,
            RunEvent::TestPass { .. } => EventKind::TestPass,
            RunEvent::TestFail { .. } => EventKind::TestFail,
            RunEvent::TestPending { .. } => EventKind::TestPending,
            RunEvent::TestEnd { .. } => EventKind::TestEnd,
            RunEvent::RunEnd => EventKind::RunEnd,
        }
    }
}

/// A suite descriptor, carried by [`RunEvent::SuiteBegin`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteInfo {
    /// True if this is the implicit root suite.
    #[serde(default)]
    pub root: bool,

    /// The title of the suite. The root suite usually has an empty title.
    pub title: String,
}

impl SuiteInfo {
    /// Creates the implicit root suite, with an empty title.
    pub fn root() -> Self {
        Self {
            root: true,
            title: String::new(),
        }
    }

    /// Creates a non-root suite with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            root: false,
            title: title.into(),
        }
    }
}

/// A test descriptor, carried by test events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestInfo {
    /// The title of the test.
    pub title: String,

    /// The test group the test belongs to.
    pub parent: ParentInfo,
}

impl TestInfo {
    /// Creates a new test descriptor.
    pub fn new(title: impl Into<String>, parent_title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            parent: ParentInfo {
                title: parent_title.into(),
            },
        }
    }
}

/// The test group enclosing a test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentInfo {
    /// The title of the group. Pass and fail outcomes are deduplicated by this title.
    pub title: String,
}

/// The kind of a [`RunEvent`], used as the key for subscriptions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum EventKind {
    /// See [`RunEvent::RunBegin`].
    RunBegin,
    /// See [`RunEvent::SuiteBegin`].
    SuiteBegin,
    /// See [`RunEvent::TestPass`].
    TestPass,
    /// See [`RunEvent::TestFail`].
    TestFail,
    /// See [`RunEvent::TestPending`].
    TestPending,
    /// See [`RunEvent::TestEnd`].
    TestEnd,
    /// See [`RunEvent::RunEnd`].
    RunEnd,
}

impl EventKind {
    /// All event kinds, in lifecycle order.
    pub const ALL: [EventKind; 7] = [
        EventKind::RunBegin,
        EventKind::SuiteBegin,
        EventKind::TestPass,
        EventKind::TestFail,
        EventKind::TestPending,
        EventKind::TestEnd,
        EventKind::RunEnd,
    ];

    /// Returns the wire name of this event kind.
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::RunBegin => "start",
            EventKind::SuiteBegin => "suite",
            EventKind::TestPass => "pass",
            EventKind::TestFail => "fail",
            EventKind::TestPending => "pending",
            EventKind::TestEnd => "test end",
            EventKind::RunEnd => "end",
        }
    }

    /// Returns string representations of all known variants.
    pub fn variants() -> [&'static str; 7] {
        Self::ALL.map(Self::as_str)
    }

    /// Returns true if the engine emits this kind at most once per run.
    pub fn fires_once(self) -> bool {
        matches!(self, EventKind::RunBegin | EventKind::RunEnd)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = EventKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EventKindParseError::new(s))
    }
}
