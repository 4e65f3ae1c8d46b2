//! Output formats for parsed queries
//!
//! Every format is a [`Formatter`] stored in a [`FormatRegistry`] under the name it reports.
//! The CLI resolves `--format` and the `output.format` setting through the registry, so a
//! name is valid exactly when [`FormatRegistry::has`] says so.

use crate::rql::ast::Query;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// The format failed to render this query
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Renders a [`Query`] as text
pub trait Formatter: Send + Sync {
    /// Name used on the command line and in configuration
    fn name(&self) -> &str;

    fn serialize(&self, query: &Query) -> Result<String, FormatError>;

    /// One line shown by `rql formats`
    fn description(&self) -> &str {
        ""
    }
}

pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// A registry with no formats; see [`FormatRegistry::with_defaults`]
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Add `formatter` under its name, replacing a format of the same name
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Render `query` with the format called `format`
    pub fn serialize(&self, query: &Query, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(query)
    }

    /// Format names in alphabetical order
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// The built in formats: `query`, `treeviz`, `tag`, `json` and `yaml`
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(super::QueryFormatter);
        registry.register(super::TreevizFormatter);
        registry.register(super::TagFormatter);
        registry.register(super::JsonFormatter);
        registry.register(super::YamlFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
