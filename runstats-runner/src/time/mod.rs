// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wall-clock time sources for timestamping runs.

mod clock;

pub use clock::*;
