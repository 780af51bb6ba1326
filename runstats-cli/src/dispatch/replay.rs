// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Replay command options and execution.

use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputWriter},
};
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};
use runstats_metadata::{RunStatus, RunstatsExitCode};
use runstats_runner::{
    config::{RunstatsConfig, SummaryFormat},
    event_log::{EventLog, EventLogLoader},
    loader::load_files,
    reporter::{StatsCollector, SummaryDisplayer},
    runner::{RunStats, Runner},
    time::{Clock, ManualClock, SystemClock},
};
use std::io::Write;
use tracing::{debug, info, warn};

/// Options for the replay command.
#[derive(Debug, Args)]
pub(crate) struct ReplayOpts {
    /// Event logs to replay, in order; `-` reads standard input
    #[arg(required = true, value_name = "LOG")]
    pub(crate) logs: Vec<Utf8PathBuf>,

    /// Summary format [default: from config, or human]
    #[arg(long, value_enum, value_name = "FMT")]
    pub(crate) format: Option<SummaryFormatOpt>,

    /// Treat pending tests as a failed run
    #[arg(long)]
    pub(crate) fail_on_pending: bool,

    /// Config file [default: .config/runstats.toml in the current directory]
    #[arg(long, value_name = "PATH")]
    pub(crate) config_file: Option<Utf8PathBuf>,
}

/// Summary format options.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum SummaryFormatOpt {
    /// A single human-readable line.
    Human,
    /// A JSON summary object.
    Json,
}

impl From<SummaryFormatOpt> for SummaryFormat {
    fn from(opt: SummaryFormatOpt) -> Self {
        match opt {
            SummaryFormatOpt::Human => SummaryFormat::Human,
            SummaryFormatOpt::Json => SummaryFormat::Json,
        }
    }
}

/// Executes the replay command.
pub(crate) fn exec_replay(
    replay_opts: ReplayOpts,
    output: OutputContext,
    output_writer: &mut OutputWriter,
) -> Result<i32> {
    let root = current_dir()?;
    let config = RunstatsConfig::from_sources(&root, replay_opts.config_file.as_deref())
        .map_err(ExpectedError::config_parse_error)?;
    if let Some(config_file) = config.config_file() {
        debug!("using config file `{config_file}`");
    }

    let format = replay_opts
        .format
        .map_or(config.summary().format, SummaryFormat::from);
    let fail_on_pending = replay_opts.fail_on_pending || config.summary().fail_on_pending;

    let mut runner = Runner::new();
    let clock = ManualClock::new(SystemClock.now());
    let stats = StatsCollector::attach_with_clock(Some(&mut runner), clock.clone())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| ExpectedError::TokioRuntimeCreateError { err })?;

    let verbose = output.verbose;
    runtime.block_on(load_files(
        &replay_opts.logs,
        &EventLogLoader,
        |path| {
            if verbose {
                info!("loading event log `{path}`");
            }
        },
        |_, log: EventLog| {
            if log.is_empty() {
                warn!("event log `{}` contains no events", log.name());
            }
            log.replay(&mut runner, &clock);
        },
    ))?;

    let run_stats = stats.snapshot();
    write_summary(&run_stats, format, fail_on_pending, output, output_writer)
        .map_err(ExpectedError::write_output_error)?;

    match run_stats.status(fail_on_pending) {
        RunStatus::Passed => Ok(RunstatsExitCode::OK),
        RunStatus::Failed => Err(ExpectedError::test_run_failed()),
        RunStatus::NoTestsRun => Err(ExpectedError::NoTestsRun),
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let dir = std::env::current_dir().map_err(|err| ExpectedError::CurrentDirFailed { err })?;
    Utf8PathBuf::from_path_buf(dir).map_err(|path| ExpectedError::CurrentDirInvalidUtf8 { path })
}

fn write_summary(
    run_stats: &RunStats,
    format: SummaryFormat,
    fail_on_pending: bool,
    output: OutputContext,
    output_writer: &mut OutputWriter,
) -> std::io::Result<()> {
    let mut writer = output_writer.stdout_writer();
    match format {
        SummaryFormat::Human => {
            let mut displayer = SummaryDisplayer::new(fail_on_pending);
            if output.color.should_colorize(supports_color::Stream::Stdout) {
                displayer.colorize();
            }
            displayer.write_summary(run_stats, &mut writer)?;
        }
        SummaryFormat::Json => {
            let summary = run_stats.to_summary(fail_on_pending);
            serde_json::to_writer_pretty(&mut writer, &summary)?;
            writeln!(writer)?;
        }
    }
    writer.flush()
}
