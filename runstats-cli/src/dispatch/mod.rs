// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command dispatch and execution.

mod app;
mod imp;
mod replay;

pub use app::RunstatsApp;
pub use imp::main_impl;
