// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Main entry point implementation.

use super::app::RunstatsApp;
use clap::Parser;

/// Main entry point for runstats.
///
/// Parses the command line, initializes output and runs the requested command, then exits with
/// the command's exit code.
pub fn main_impl() -> ! {
    let opts = RunstatsApp::parse();
    let output = opts.init_output();

    match opts.exec(output, &mut crate::OutputWriter::default()) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            error.display_to_stderr(&output.stderr_styles());
            std::process::exit(error.process_exit_code())
        }
    }
}
