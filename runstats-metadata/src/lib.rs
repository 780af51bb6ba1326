// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Machine-readable output for [runstats](https://crates.io/crates/runstats-cli).
//!
//! `runstats replay --format json` writes a [`RunSummary`] to standard output. The process exit
//! codes are documented in [`RunstatsExitCode`].

mod exit_codes;
mod summary;

pub use exit_codes::*;
pub use summary::*;
