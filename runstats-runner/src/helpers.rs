// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for runstats-runner.

/// Utilities for pluralizing various words based on count.
pub mod plural {
    /// Returns "suite" if `count` is 1, otherwise "suites".
    pub fn suites_str(count: usize) -> &'static str {
        if count == 1 { "suite" } else { "suites" }
    }

    /// Returns "test" if `count` is 1, otherwise "tests".
    pub fn tests_str(count: usize) -> &'static str {
        if count == 1 { "test" } else { "tests" }
    }

    /// Returns "event" if `count` is 1, otherwise "events".
    pub fn events_str(count: usize) -> &'static str {
        if count == 1 { "event" } else { "events" }
    }
}
