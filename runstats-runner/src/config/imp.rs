// Copyright (c) The runstats Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::errors::ConfigParseError;
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Trait for handling configuration warnings.
///
/// The default implementation, [`DefaultConfigWarnings`], logs warnings. Tests collect them
/// instead.
pub trait ConfigWarnings {
    /// Handle unknown configuration keys found in a config file.
    fn unknown_config_keys(
        &mut self,
        config_file: &Utf8Path,
        root: &Utf8Path,
        unknown: &BTreeSet<String>,
    );
}

/// Default implementation of [`ConfigWarnings`] that logs warnings using the tracing crate.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(
        &mut self,
        config_file: &Utf8Path,
        root: &Utf8Path,
        unknown: &BTreeSet<String>,
    ) {
        let mut unknown_str = String::new();
        if unknown.len() == 1 {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.extend(unknown.iter().map(String::as_str));
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                unknown_str.push('\n');
                unknown_str.push_str("  - ");
                unknown_str.push_str(ignored_key);
            }
        }

        warn!(
            "in config file {}, ignoring unknown configuration {unknown_str}",
            config_file.strip_prefix(root).unwrap_or(config_file),
        )
    }
}

/// Overall configuration for runstats.
#[derive(Clone, Debug)]
pub struct RunstatsConfig {
    config_file: Option<Utf8PathBuf>,
    summary: SummaryConfig,
}

impl RunstatsConfig {
    /// The default location of the config within a directory: `.config/runstats.toml`.
    pub const CONFIG_PATH: &'static str = ".config/runstats.toml";

    /// Contains the default config as a TOML file.
    ///
    /// User configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../../default-config.toml");

    /// Reads the config from `config_file`, or if not specified from `.config/runstats.toml` under
    /// `root`.
    ///
    /// An explicitly specified file must exist. If no file is specified and `root` doesn't have
    /// `.config/runstats.toml`, the default config is used.
    pub fn from_sources(
        root: &Utf8Path,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        Self::from_sources_with_warnings(root, config_file, &mut DefaultConfigWarnings)
    }

    /// Reads the config with custom warning handling.
    pub fn from_sources_with_warnings(
        root: &Utf8Path,
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = root.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };
        let exists = config_file.exists();

        let builder = Self::make_default_config().add_source(source);
        let (config, unknown) = Self::build_and_deserialize_config(&builder)
            .map_err(|error| ConfigParseError::new(&config_file, error))?;

        if !unknown.is_empty() {
            warnings.unknown_config_keys(&config_file, root, &unknown);
        }

        Ok(Self {
            config_file: exists.then_some(config_file),
            summary: config.summary,
        })
    }

    /// Returns the default config.
    pub fn default_config() -> Self {
        Self {
            config_file: None,
            summary: SummaryConfig::default(),
        }
    }

    /// Returns the user config file that was read, if any.
    pub fn config_file(&self) -> Option<&Utf8Path> {
        self.config_file.as_deref()
    }

    /// Returns the configuration for the final summary.
    pub fn summary(&self) -> &SummaryConfig {
        &self.summary
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(RunstatsConfigDeserialize, BTreeSet<String>), ConfigError> {
        let config = builder.build_cloned()?;

        let mut ignored = BTreeSet::new();
        let config: RunstatsConfigDeserialize =
            serde_ignored::deserialize(config, |path: serde_ignored::Path| {
                ignored.insert(path.to_string());
            })?;

        Ok((config, ignored))
    }
}

/// Configuration for the summary printed after a run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SummaryConfig {
    /// The output format.
    pub format: SummaryFormat,

    /// If true, pending tests cause the run to be reported as failed.
    pub fail_on_pending: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            format: SummaryFormat::Human,
            fail_on_pending: false,
        }
    }
}

/// The format of the summary printed after a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFormat {
    /// A single human-readable line.
    Human,

    /// A JSON [`RunSummary`](runstats_metadata::RunSummary).
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RunstatsConfigDeserialize {
    summary: SummaryConfig,
}
