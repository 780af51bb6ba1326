// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by runstats.

use crate::reporter::EventKind;
use camino::{Utf8Path, Utf8PathBuf};
use config::ConfigError;
use std::{error::Error, fmt};
use thiserror::Error;

/// An error that occurred while attaching a
/// [`StatsCollector`](crate::reporter::StatsCollector) to an event source.
///
/// If this error is returned, no handlers were registered and no stats record was created.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttachError {
    /// A required argument was not supplied.
    #[error("invalid argument `{argument}`: no event source was supplied")]
    InvalidArgument {
        /// The name of the missing argument.
        argument: &'static str,
    },
}

/// Error returned while parsing an [`EventKind`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized event kind: {input}\n(known values: {})",
    EventKind::variants().join(", "),
)]
pub struct EventKindParseError {
    input: String,
}

impl EventKindParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An error that occurred while parsing a JSON-lines event log.
#[derive(Debug, Error)]
#[error("line {line_number} of `{name}` is not a valid event record")]
pub struct EventLogParseError {
    name: String,
    line_number: usize,
    #[source]
    error: serde_json::Error,
}

impl EventLogParseError {
    pub(crate) fn new(name: impl Into<String>, line_number: usize, error: serde_json::Error) -> Self {
        Self {
            name: name.into(),
            line_number,
            error,
        }
    }

    /// Returns the name of the log that failed to parse.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the 1-based line number of the first malformed record.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// An error that occurred while loading a file through a
/// [`ModuleLoader`](crate::loader::ModuleLoader).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    /// The file cannot be loaded synchronously. Loaders return this from
    /// [`load_sync`](crate::loader::ModuleLoader::load_sync) to request the asynchronous path.
    #[error("`{path}` must be loaded asynchronously")]
    RequiresAsync {
        /// The path of the file.
        path: Utf8PathBuf,
    },

    /// An I/O error occurred while reading the file.
    #[error("failed to read `{path}`")]
    Read {
        /// The path of the file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The file was read but its contents could not be parsed.
    #[error("failed to parse `{path}`")]
    Parse {
        /// The path of the file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: EventLogParseError,
    },
}

impl LoadError {
    /// Returns the path of the file that failed to load.
    pub fn path(&self) -> &Utf8Path {
        match self {
            LoadError::RequiresAsync { path }
            | LoadError::Read { path, .. }
            | LoadError::Parse { path, .. } => path,
        }
    }
}

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse runstats config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    err: ConfigError,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, err: ConfigError) -> Self {
        Self {
            config_file: config_file.into(),
            err,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8Path {
        &self.config_file
    }
}

/// Displays an error along with its full chain of causes.
///
/// The first line is the error itself, and each cause follows on its own line.
#[derive(Debug)]
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain` for the given error.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let Some(mut cause) = self.error.source() else {
            return Ok(());
        };
        write!(f, "\n  caused by:")?;
        loop {
            write!(f, "\n  - {cause}")?;
            let Some(next_cause) = cause.source() else {
                break Ok(());
            };
            cause = next_cause;
        }
    }
}
