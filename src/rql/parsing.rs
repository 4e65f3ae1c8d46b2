//! Parsing RQL queries
//!
//! Source text becomes a [`Query`] along one of two independent paths:
//!
//! - **Grammar parser**: the [RQL grammar](crate::rql::grammar) walked by the generic
//!   [engine](crate::rql::engine), then lowered to the typed AST by
//!   [building](crate::rql::building)
//! - **Reference parser**: chumsky combinators over the logos token stream, see
//!   [reference]
//!
//! Both report failures as a [`SyntaxError`] at the furthest offset they reached.
//!
//! ```rust,ignore
//! use rql::rql::parsing::{parse, parse_with, Parser};
//!
//! let query = parse("Host(name, alerts#open{status==\"open\"})")?;
//! let same = parse_with("Host(name, alerts#open{status==\"open\"})", Parser::Reference)?;
//! assert_eq!(query, same);
//! ```

pub mod reference;

use crate::rql::ast::Query;
use crate::rql::building::build_query;
use crate::rql::engine::{Grammar, ParseError, SyntaxError};
use crate::rql::grammar::RqlGrammar;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Errors from the query level entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("element id `{text}` at offset {offset} does not fit in 64 bits")]
    InvalidNumber { offset: usize, text: String },
    #[error("unexpected `{rule}` node at offset {offset}")]
    UnexpectedNode { rule: String, offset: usize },
}

impl QueryError {
    /// The syntax error, if this is one
    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            QueryError::Parse(ParseError::Syntax(err)) => Some(err),
            _ => None,
        }
    }

    /// Byte offset the error points at, when known
    pub fn offset(&self) -> Option<usize> {
        match self {
            QueryError::Parse(ParseError::Syntax(err)) => Some(err.offset),
            QueryError::Parse(ParseError::RecursionLimit(_)) => None,
            QueryError::InvalidNumber { offset, .. } | QueryError::UnexpectedNode { offset, .. } => {
                Some(*offset)
            }
        }
    }
}

/// Parser implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Parser {
    /// Grammar engine with the RQL grammar (default)
    #[default]
    Grammar,
    /// Token based chumsky parser
    Reference,
}

impl Parser {
    pub const ALL: [Parser; 2] = [Parser::Grammar, Parser::Reference];

    pub fn as_str(&self) -> &'static str {
        match self {
            Parser::Grammar => "grammar",
            Parser::Reference => "reference",
        }
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Parser {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parser::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown parser `{}` (expected grammar or reference)", s))
    }
}

/// A configured parser
#[derive(Debug, Clone)]
pub struct QueryParser {
    parser: Parser,
    grammar: Grammar,
}

impl QueryParser {
    pub fn new(parser: Parser) -> Self {
        Self {
            parser,
            grammar: RqlGrammar::get().grammar().clone(),
        }
    }

    /// Limit nesting of filter groups
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.grammar = self.grammar.with_max_depth(max_depth);
        self
    }

    pub fn parser(&self) -> Parser {
        self.parser
    }

    /// The grammar used by [`Parser::Grammar`], carrying the depth limit
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn parse(&self, source: &str) -> Result<Query, QueryError> {
        debug!(parser = %self.parser, len = source.len(), "parsing query");
        let result = match self.parser {
            Parser::Grammar => {
                let tree = self.grammar.parse(source)?;
                build_query(&tree)
            }
            Parser::Reference => reference::parse(source, self.grammar.max_depth()),
        };
        match &result {
            Ok(query) => debug!(selectors = query.selectors.len(), "parsed query"),
            Err(err) => debug!(%err, "query rejected"),
        }
        result
    }
}

impl Default for QueryParser {
    fn default() -> Self {
        Self::new(Parser::default())
    }
}

/// Parse with the default parser
pub fn parse(source: &str) -> Result<Query, QueryError> {
    parse_with(source, Parser::default())
}

pub fn parse_with(source: &str, parser: Parser) -> Result<Query, QueryError> {
    QueryParser::new(parser).parse(source)
}
