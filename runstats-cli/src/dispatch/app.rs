// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Top-level application and command routing.

use super::replay::{ReplayOpts, exec_replay};
use crate::{
    Result,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use clap::Subcommand;

/// Summarize recorded test runs.
///
/// runstats reads JSON-lines event logs emitted by a test-execution engine, aggregates them into
/// run statistics and prints a summary.
#[derive(Debug, clap::Parser)]
#[command(
    version,
    bin_name = "runstats",
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct RunstatsApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl RunstatsApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::Replay(opts) => exec_replay(*opts, output, output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay event logs and print a summary of the run
    ///
    /// Each log is a JSON-lines file with one event per line. Logs are replayed in the order
    /// given, into a single run. Use `-` to read a log from standard input.
    Replay(Box<ReplayOpts>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use camino_tempfile::Utf8TempDir;
    use clap::{CommandFactory, Parser};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use runstats_metadata::{RunStatus, RunSummary, RunstatsExitCode};

    const PASSING_LOG: &str = indoc! {r#"
        {"timestamp":"2024-05-01T10:00:00+00:00","event":"start"}
        {"event":"suite","suite":{"root":true,"title":""}}
        {"event":"suite","suite":{"title":"parser"}}
        {"event":"pass","test":{"title":"parses","parent":{"title":"parser"}}}
        {"event":"pass","test":{"title":"rejects","parent":{"title":"parser"}}}
        {"event":"pending","test":{"title":"streams","parent":{"title":"parser"}}}
        {"timestamp":"2024-05-01T10:00:01.234+00:00","event":"end"}
    "#};

    const FAILING_LOG: &str = indoc! {r#"
        {"timestamp":"2024-05-01T10:00:00+00:00","event":"start"}
        {"event":"suite","suite":{"title":"lexer"}}
        {"event":"pass","test":{"title":"tokens","parent":{"title":"lexer"}}}
        {"event":"fail","test":{"title":"spans","parent":{"title":"lexer"}},"error":"off by one"}
        {"timestamp":"2024-05-01T10:00:00.020+00:00","event":"end"}
    "#};

    fn write_log(dir: &Utf8TempDir, name: &str, contents: &str) -> String {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path.into_string()
    }

    /// Runs the app in-process, returning the exit code (or error) and captured stdout.
    fn run(args: &[&str]) -> (Result<i32>, String) {
        let app = RunstatsApp::try_parse_from(std::iter::once("runstats").chain(args.iter().copied()))
            .unwrap();
        let output = app.init_output();
        let mut writer = OutputWriter::Test { stdout: Vec::new() };
        let result = app.exec(output, &mut writer);
        let OutputWriter::Test { stdout } = writer else {
            unreachable!("writer is a test writer");
        };
        (result, String::from_utf8(stdout).unwrap())
    }

    #[test]
    fn verify_app() {
        RunstatsApp::command().debug_assert();
    }

    #[test]
    fn replay_human_summary() {
        let dir = Utf8TempDir::new().unwrap();
        let log = write_log(&dir, "pass.jsonl", PASSING_LOG);

        let (result, stdout) = run(&["replay", "--color", "never", &log]);
        assert_eq!(result.unwrap(), RunstatsExitCode::OK);
        assert_eq!(
            stdout,
            "     Summary [   1.234s] 1 suite, 1 test: 1 passed, 1 pending\n"
        );
    }

    #[test]
    fn replay_json_summary() {
        let dir = Utf8TempDir::new().unwrap();
        let log = write_log(&dir, "fail.jsonl", FAILING_LOG);

        let (result, stdout) = run(&["replay", "--format", "json", &log]);
        let error = result.unwrap_err();
        assert_eq!(error.process_exit_code(), RunstatsExitCode::TEST_RUN_FAILED);

        let summary = RunSummary::parse_json(&stdout).unwrap();
        assert_eq!(summary.status, RunStatus::Failed);
        assert_eq!(
            (summary.suites, summary.tests, summary.passes, summary.failures),
            (1, 1, 0, 1),
            "the lexer group flipped from passed to failed"
        );
        assert_eq!(summary.duration_ms, Some(20));
    }

    #[test]
    fn replay_multiple_logs() {
        let dir = Utf8TempDir::new().unwrap();
        let first = write_log(&dir, "pass.jsonl", PASSING_LOG);
        let second = write_log(&dir, "fail.jsonl", FAILING_LOG);

        let (result, stdout) = run(&["replay", "--format", "json", &first, &second]);
        assert_eq!(
            result.unwrap_err().process_exit_code(),
            RunstatsExitCode::TEST_RUN_FAILED
        );

        let summary = RunSummary::parse_json(&stdout).unwrap();
        assert_eq!(
            (summary.passes, summary.failures, summary.pending),
            (1, 1, 1)
        );
        // The run begins and ends once, with the first log's timestamps.
        assert_eq!(summary.duration_ms, Some(1234));
    }

    #[test]
    fn replay_fail_on_pending_from_config() {
        let dir = Utf8TempDir::new().unwrap();
        let log = write_log(&dir, "pass.jsonl", PASSING_LOG);
        let config = write_log(
            &dir,
            "runstats.toml",
            indoc! {r#"
                [summary]
                format = "json"
                fail-on-pending = true
            "#},
        );

        let (result, stdout) = run(&["replay", "--config-file", &config, &log]);
        assert_eq!(
            result.unwrap_err().process_exit_code(),
            RunstatsExitCode::TEST_RUN_FAILED
        );
        let summary = RunSummary::parse_json(&stdout).unwrap();
        assert_eq!(summary.status, RunStatus::Failed);
    }

    #[test]
    fn replay_no_tests() {
        let dir = Utf8TempDir::new().unwrap();
        let log = write_log(
            &dir,
            "empty.jsonl",
            "{\"event\":\"start\"}\n{\"event\":\"end\"}\n",
        );

        let (result, stdout) = run(&["replay", "--color", "never", &log]);
        assert_eq!(
            result.unwrap_err().process_exit_code(),
            RunstatsExitCode::NO_TESTS_RUN
        );
        assert!(stdout.contains("0 passed, 0 pending"), "{stdout}");
    }

    #[test]
    fn replay_invalid_log() {
        let dir = Utf8TempDir::new().unwrap();
        let good = write_log(&dir, "pass.jsonl", PASSING_LOG);
        let bad = write_log(&dir, "bad.jsonl", "{\"event\":\"start\"}\nnot json\n");

        let (result, stdout) = run(&["replay", &good, &bad]);
        let error = result.unwrap_err();
        assert_eq!(error.process_exit_code(), RunstatsExitCode::EVENT_LOG_FAILED);
        let crate::ExpectedError::EventLogLoadError { err } = &error else {
            panic!("expected an event log error, found {error:?}");
        };
        assert_eq!(err.path(), Utf8Path::new(&bad));
        assert_eq!(stdout, "", "no summary is printed");
    }

    #[test]
    fn replay_missing_config() {
        let dir = Utf8TempDir::new().unwrap();
        let log = write_log(&dir, "pass.jsonl", PASSING_LOG);
        let missing = dir.path().join("missing.toml");

        let (result, _) = run(&["replay", "--config-file", missing.as_str(), &log]);
        assert_eq!(
            result.unwrap_err().process_exit_code(),
            RunstatsExitCode::SETUP_ERROR
        );
    }

    #[test]
    fn replay_requires_logs() {
        let error = RunstatsApp::try_parse_from(["runstats", "replay"]).unwrap_err();
        assert_eq!(
            error.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }
}
