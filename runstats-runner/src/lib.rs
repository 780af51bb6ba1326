// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for runstats: aggregate the lifecycle events of a test run into statistics.
//!
//! The basic flow is:
//!
//! 1. Create an event source, such as a [`Runner`](runner::Runner).
//! 2. Attach a [`StatsCollector`](reporter::StatsCollector) to it, which registers handlers for
//!    every [`EventKind`](reporter::EventKind) and returns a [`StatsHandle`](runner::StatsHandle).
//! 3. Emit [`RunEvent`](reporter::RunEvent)s, either directly or by replaying an
//!    [`EventLog`](event_log::EventLog).
//! 4. Read the [`RunStats`](runner::RunStats) through the handle.

pub mod config;
pub mod errors;
pub mod event_log;
mod helpers;
pub mod loader;
pub mod reporter;
pub mod runner;
pub mod time;
