//! Output formats for parsed queries
//!
//! Every format implements [`Formatter`] and is reachable by name through a
//! [`FormatRegistry`]:
//! - `query`: canonical query text
//! - `treeviz`: one line per node, nesting drawn with connectors
//! - `tag`: XML-like tags mirroring the AST
//! - `json`, `yaml`: serde serialization of the AST

pub mod json;
pub mod query;
pub mod registry;
pub mod tag;
pub mod treeviz;
pub mod yaml;

pub use json::JsonFormatter;
pub use query::QueryFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use tag::{serialize_query as serialize_query_tag, TagFormatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};
pub use yaml::YamlFormatter;
