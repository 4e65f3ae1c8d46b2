//! # rql
//!
//! Grammar engine and parsers for the RQL selector/filter query language.
//!
//! An RQL query is a comma separated list of selectors:
//!
//! ```text
//! !123,Host(name, alerts#open{status=="open" && level>2}),Message*
//! ```
//!
//! The crate ships two parsers for the language:
//!
//! - the grammar parser, built on the generic combinator [engine](rql::engine)
//!   and the [RQL grammar](rql::grammar) defined on top of it
//! - the reference parser, a chumsky parser over a logos token stream
//!
//! Both produce the same typed [AST](rql::ast). See [parsing](rql::parsing) for the
//! entry points.
//!
//! ## Testing
//!
//! For fluent assertions over parsed queries, see the [testing module](rql::testing).

pub mod rql;
