// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate the events of a test run and report the results.
//!
//! The main type here is [`StatsCollector`], which subscribes to the [`RunEvent`]s delivered by
//! an [`EventSource`](crate::runner::EventSource).

mod aggregator;
mod events;
mod summary;

pub use aggregator::*;
pub use events::*;
pub use summary::*;
