// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for runstats.
//!
//! Configuration is layered: the embedded [default config](RunstatsConfig::DEFAULT_CONFIG) comes
//! first, then a user-provided file (either an explicit path, or
//! [`.config/runstats.toml`](RunstatsConfig::CONFIG_PATH) if present).

mod imp;

pub use imp::*;
