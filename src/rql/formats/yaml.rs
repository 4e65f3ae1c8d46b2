//! YAML serialization of the query AST
//!
//! Enum variants are written as single key maps (`group: ...`, `and: [...]`), since YAML
//! tags cannot nest.

use super::registry::{FormatError, Formatter};
use crate::rql::ast::Query;
use serde_yaml::with::singleton_map_recursive;

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, query: &Query) -> Result<String, FormatError> {
        let mut buffer = Vec::new();
        {
            let mut serializer = serde_yaml::Serializer::new(&mut buffer);
            singleton_map_recursive::serialize(query, &mut serializer)
                .map_err(|err| FormatError::SerializationError(err.to_string()))?;
        }
        String::from_utf8(buffer).map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Query AST as YAML"
    }
}
