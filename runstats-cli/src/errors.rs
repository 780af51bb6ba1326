// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use owo_colors::OwoColorize;
use runstats_metadata::RunstatsExitCode;
use runstats_runner::errors::{AttachError, ConfigParseError, LoadError};
use std::{error::Error, path::PathBuf};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected failure: one that is reported to the user with a documented exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    CurrentDirFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 { path: PathBuf },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("stats collector attach error")]
    AttachError {
        #[from]
        err: AttachError,
    },
    #[error("failed to create tokio runtime")]
    TokioRuntimeCreateError {
        #[source]
        err: std::io::Error,
    },
    #[error("event log load error")]
    EventLogLoadError {
        #[from]
        err: LoadError,
    },
    #[error("error writing output")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
    #[error("test run failed")]
    TestRunFailed,
    #[error("no tests run")]
    NoTestsRun,
}

impl ExpectedError {
    pub(crate) fn config_parse_error(err: ConfigParseError) -> Self {
        Self::ConfigParseError { err }
    }

    pub(crate) fn write_output_error(err: std::io::Error) -> Self {
        Self::WriteOutputError { err }
    }

    pub(crate) fn test_run_failed() -> Self {
        Self::TestRunFailed
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. }
            | Self::AttachError { .. }
            | Self::TokioRuntimeCreateError { .. } => RunstatsExitCode::SETUP_ERROR,
            Self::EventLogLoadError { .. } => RunstatsExitCode::EVENT_LOG_FAILED,
            Self::WriteOutputError { .. } => RunstatsExitCode::WRITE_OUTPUT_ERROR,
            Self::TestRunFailed => RunstatsExitCode::TEST_RUN_FAILED,
            Self::NoTestsRun => RunstatsExitCode::NO_TESTS_RUN,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { err } => {
                error!("could not determine the current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { path } => {
                error!(
                    "current directory `{}` is not valid UTF-8",
                    path.display().style(styles.bold)
                );
                None
            }
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse config file `{}`",
                    err.config_file().style(styles.bold)
                );
                err.source()
            }
            Self::AttachError { err } => {
                error!("failed to attach stats collector");
                Some(err as &dyn Error)
            }
            Self::TokioRuntimeCreateError { err } => {
                error!("failed to create tokio runtime");
                Some(err as &dyn Error)
            }
            Self::EventLogLoadError { err } => {
                error!(
                    "failed to load event log `{}`",
                    err.path().style(styles.bold)
                );
                err.source()
            }
            Self::WriteOutputError { err } => {
                error!("failed to write summary to output");
                Some(err as &dyn Error)
            }
            Self::TestRunFailed => {
                error!("test run failed");
                None
            }
            Self::NoTestsRun => {
                error!("no tests were run");
                None
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
