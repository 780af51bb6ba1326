// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `runstats` failures.
///
/// `runstats` invocations may fail for a variety of reasons. This structure documents the exit
/// codes that may occur in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum RunstatsExitCode {}

impl RunstatsExitCode {
    /// No errors occurred and runstats exited normally.
    pub const OK: i32 = 0;

    /// The replayed logs contained no pass, fail or pending outcomes, but no other errors
    /// occurred.
    pub const NO_TESTS_RUN: i32 = 4;

    /// A user issue happened while setting up a runstats invocation, for example an invalid
    /// config file.
    pub const SETUP_ERROR: i32 = 96;

    /// One or more test groups failed, or pending tests were found with `fail-on-pending` set.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// An event log could not be read or parsed.
    pub const EVENT_LOG_FAILED: i32 = 107;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
