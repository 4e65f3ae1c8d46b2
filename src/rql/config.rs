//! Configuration loading
//!
//! `defaults/rql.default.toml` is embedded into the binary so that the documented defaults
//! and runtime behavior stay in sync. Callers layer user files and single-key overrides on
//! top of those defaults via [`Loader`] before deserializing into [`RqlConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::rql::formats::FormatRegistry;
use crate::rql::parsing::{Parser, QueryParser};

const DEFAULT_TOML: &str = include_str!("../../defaults/rql.default.toml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("invalid value for `{key}`: {message}")]
    Invalid { key: &'static str, message: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RqlConfig {
    pub parser: ParserConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl RqlConfig {
    /// The query parser these settings describe
    pub fn query_parser(&self) -> QueryParser {
        QueryParser::new(self.parser.engine).with_max_depth(self.parser.max_depth)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub engine: Parser,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(LogLevel::Off),
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level '{}'", other)),
        }
    }
}

/// Settings sources, applied in the order they are added; later sources win
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// A loader holding only `defaults/rql.default.toml`
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Add a TOML file that must exist
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Add a TOML file, skipped when it does not exist
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn with_toml(mut self, text: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(text, FileFormat::Toml));
        self
    }

    /// Set one dotted key, e.g. `parser.max_depth`; used for command line flags
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Merge all sources into an [`RqlConfig`] and reject unusable values
    pub fn build(self) -> Result<RqlConfig, ConfigError> {
        let config: RqlConfig = self.builder.build()?.try_deserialize()?;
        validate(&config)?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(config: &RqlConfig) -> Result<(), ConfigError> {
    if config.parser.max_depth == 0 {
        return Err(ConfigError::Invalid {
            key: "parser.max_depth",
            message: "must be at least 1".into(),
        });
    }
    let registry = FormatRegistry::with_defaults();
    if !registry.has(&config.output.format) {
        return Err(ConfigError::Invalid {
            key: "output.format",
            message: format!(
                "unknown format '{}', expected one of: {}",
                config.output.format,
                registry.list_formats().join(", ")
            ),
        });
    }
    Ok(())
}

/// The embedded defaults alone
pub fn load_defaults() -> Result<RqlConfig, ConfigError> {
    Loader::new().build()
}
