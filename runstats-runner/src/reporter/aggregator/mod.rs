// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregates lifecycle events into a [`RunStats`](crate::runner::RunStats) record.

mod imp;

pub use imp::*;
