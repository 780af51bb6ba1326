// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The final statistics for a replayed test run, in machine-readable form.
///
/// Produced by `runstats replay --format json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunSummary {
    /// The overall status of the run.
    pub status: RunStatus,

    /// The number of non-root suites entered.
    pub suites: usize,

    /// The number of suites with a non-empty title.
    pub tests: usize,

    /// The number of test groups currently considered passing.
    pub passes: usize,

    /// The number of pending tests observed.
    pub pending: usize,

    /// The number of test groups currently considered failing.
    pub failures: usize,

    /// The time at which the run began, if a run-begin event was seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<FixedOffset>>,

    /// The time at which the run ended, if a run-end event was seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<FixedOffset>>,

    /// The duration of the run in milliseconds.
    ///
    /// Only present if both the start and the end of the run were seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl RunSummary {
    /// Parses a summary from the JSON produced by `runstats replay --format json`.
    pub fn parse_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes this summary to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The overall status of a run, as recorded in a [`RunSummary`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// No test groups failed.
    Passed,

    /// At least one test group failed, or pending tests were treated as failures.
    Failed,

    /// No pass, fail or pending outcomes were observed.
    NoTestsRun,
}

impl RunStatus {
    /// Returns true if this status represents a successful run.
    pub fn is_success(self) -> bool {
        match self {
            RunStatus::Passed | RunStatus::NoTestsRun => true,
            RunStatus::Failed => false,
        }
    }
}
