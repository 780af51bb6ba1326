// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{helpers::plural, runner::RunStats};
use owo_colors::{OwoColorize, Style};
use runstats_metadata::RunStatus;
use std::{fmt, io, time::Duration};
use swrite::{SWrite, swrite};

/// Writes the human-readable summary line for a run.
#[derive(Clone, Debug, Default)]
pub struct SummaryDisplayer {
    styles: Styles,
    fail_on_pending: bool,
}

impl SummaryDisplayer {
    /// Creates a new displayer, with colors disabled.
    ///
    /// If `fail_on_pending` is true, pending tests are displayed as a failed run.
    pub fn new(fail_on_pending: bool) -> Self {
        Self {
            styles: Styles::default(),
            fail_on_pending,
        }
    }

    /// Enables ANSI colors in the output.
    pub fn colorize(&mut self) {
        self.styles.colorize();
    }

    /// Writes the summary line for `stats`, followed by a newline.
    pub fn write_summary(&self, stats: &RunStats, writer: &mut dyn io::Write) -> io::Result<()> {
        let summary_style = match stats.status(self.fail_on_pending) {
            RunStatus::Passed => self.styles.pass,
            RunStatus::NoTestsRun => self.styles.skip,
            RunStatus::Failed => self.styles.fail,
        };
        write!(writer, "{:>12} ", "Summary".style(summary_style))?;

        // The duration is only known if both the start and the end of the run were seen.
        if let Some(duration) = stats.duration {
            write!(writer, "{}", DisplayBracketedDuration(duration))?;
        }

        let mut summary_str = String::new();
        write_summary_str(stats, &self.styles, &mut summary_str);
        writeln!(writer, "{summary_str}")
    }
}

#[derive(Clone, Debug, Default)]
struct Styles {
    count: Style,
    pass: Style,
    fail: Style,
    skip: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
    }
}

struct DisplayBracketedDuration(Duration);

impl fmt::Display for DisplayBracketedDuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // * > means right-align.
        // * 8 is the number of characters to pad to.
        // * .3 means print three digits after the decimal point.
        write!(f, "[{:>8.3?}s] ", self.0.as_secs_f64())
    }
}

fn write_summary_str(run_stats: &RunStats, styles: &Styles, out: &mut String) {
    // Written in this style to ensure new fields are accounted for.
    let &RunStats {
        suites,
        tests,
        passes,
        pending,
        failures,
        start: _,
        end: _,
        duration: _,
    } = run_stats;

    swrite!(
        out,
        "{} {}, {} {}: ",
        suites.style(styles.count),
        plural::suites_str(suites),
        tests.style(styles.count),
        plural::tests_str(tests),
    );

    swrite!(
        out,
        "{} {}, ",
        passes.style(styles.count),
        "passed".style(styles.pass)
    );

    if failures > 0 {
        swrite!(
            out,
            "{} {}, ",
            failures.style(styles.count),
            "failed".style(styles.fail),
        );
    }

    swrite!(
        out,
        "{} {}",
        pending.style(styles.count),
        "pending".style(styles.skip),
    );
}
