// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recorded event logs.
//!
//! An event log is a JSON-lines file with one [`EventRecord`] per line: the [`RunEvent`] fields,
//! tagged by `event`, plus an optional RFC 3339 `timestamp`. Blank lines are ignored.
//!
//! ```text
//! {"timestamp":"2024-05-01T10:00:00Z","event":"start"}
//! {"event":"suite","suite":{"root":true,"title":""}}
//! {"event":"pass","test":{"title":"works","parent":{"title":"parser"}}}
//! {"timestamp":"2024-05-01T10:00:01.250Z","event":"end"}
//! ```

use crate::{
    errors::{EventLogParseError, LoadError},
    helpers::plural,
    loader::ModuleLoader,
    reporter::RunEvent,
    runner::Runner,
    time::{Clock, ManualClock, SystemClock},
};
use camino::Utf8Path;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tracing::debug;

/// The path that stands for standard input.
pub const STDIN_PATH: &str = "-";

const STDIN_NAME: &str = "<stdin>";

/// A single line of an event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// The time at which the event was emitted, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<FixedOffset>>,

    /// The event.
    #[serde(flatten)]
    pub event: RunEvent,
}

/// A parsed event log.
#[derive(Clone, Debug)]
pub struct EventLog {
    name: String,
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Parses the JSON-lines `text` of a log. `name` is used in error messages.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, EventLogParseError> {
        let name = name.into();
        let mut records = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record = serde_json::from_str(line)
                .map_err(|error| EventLogParseError::new(name.clone(), index + 1, error))?;
            records.push(record);
        }

        Ok(Self { name, records })
    }

    /// Returns the name of this log.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the records in this log, in order.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the log has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Emits every record on `runner`, in order.
    ///
    /// Before each event is emitted, `clock` is set to the record's timestamp, or to the current
    /// system time if the record has none. Pass the same clock to
    /// [`StatsCollector::attach_with_clock`](crate::reporter::StatsCollector::attach_with_clock)
    /// to time the run by its recorded timestamps.
    pub fn replay(&self, runner: &mut Runner, clock: &ManualClock) {
        debug!(
            "replaying {} {} from `{}`",
            self.len(),
            plural::events_str(self.len()),
            self.name,
        );
        for record in &self.records {
            clock.set(record.timestamp.unwrap_or_else(|| SystemClock.now()));
            runner.emit(&record.event);
        }
    }
}

/// A [`ModuleLoader`] for event logs.
///
/// Files are read synchronously. [`STDIN_PATH`] stands for standard input, which is only read
/// asynchronously.
#[derive(Copy, Clone, Debug, Default)]
pub struct EventLogLoader;

impl EventLogLoader {
    fn parse(path: &Utf8Path, name: &str, text: &str) -> Result<EventLog, LoadError> {
        EventLog::parse(name, text).map_err(|error| LoadError::Parse {
            path: path.to_owned(),
            error,
        })
    }
}

impl ModuleLoader for EventLogLoader {
    type Module = EventLog;

    fn load_sync(&self, path: &Utf8Path) -> Result<EventLog, LoadError> {
        if path.as_str() == STDIN_PATH {
            return Err(LoadError::RequiresAsync {
                path: path.to_owned(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|error| LoadError::Read {
            path: path.to_owned(),
            error,
        })?;
        Self::parse(path, path.as_str(), &text)
    }

    async fn load_async(&self, path: &Utf8Path) -> Result<EventLog, LoadError> {
        let read_error = |error| LoadError::Read {
            path: path.to_owned(),
            error,
        };
        if path.as_str() == STDIN_PATH {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(read_error)?;
            Self::parse(path, STDIN_NAME, &text)
        } else {
            let text = tokio::fs::read_to_string(path).await.map_err(read_error)?;
            Self::parse(path, path.as_str(), &text)
        }
    }
}
