// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replay recorded test-run event logs and summarize the results.
//!
//! The `runstats` binary reads one or more JSON-lines event logs, feeds their events through a
//! [`StatsCollector`](runstats_runner::reporter::StatsCollector), and prints the final statistics
//! in human-readable or JSON form. The process exit code reflects the outcome of the run; see
//! [`RunstatsExitCode`](runstats_metadata::RunstatsExitCode).

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
