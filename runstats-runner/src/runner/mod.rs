// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event sources and the statistics they carry.
//!
//! The main structure in this module is [`Runner`], an in-memory [`EventSource`] that dispatches
//! [`RunEvent`](crate::reporter::RunEvent)s to subscribed handlers.

mod imp;
mod stats;

pub use imp::*;
pub use stats::*;
