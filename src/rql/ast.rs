//! Typed syntax tree for RQL queries
//!
//! Both parsers produce these types. Every node renders back to canonical query text with
//! `Display`, and parsing that text again yields an equal tree.

pub mod expr;
pub mod literal;
pub mod query;

pub use expr::{CompareOp, Comparison, Expr};
pub use literal::{Literal, LiteralKind};
pub use query::{Filter, Mark, Projection, PropSpec, Query, Selector, Target};

use crate::rql::parsing::{parse, QueryError};
use std::str::FromStr;

impl FromStr for Query {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
