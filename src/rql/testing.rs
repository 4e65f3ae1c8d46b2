//! Testing utilities for query assertions
//!
//! Matching on nested AST enums by hand buries what a test is about under boilerplate.
//! [`assert_query`] walks a [`Query`](crate::rql::ast::Query) with a fluent API instead:
//!
//! ```rust-example
//! use rql::rql::testing::assert_query;
//!
//! assert_query(&query)
//!     .selector_count(1)
//!     .selector(0, |s| {
//!         s.kind("Host").prop_count(1).prop(0, |p| {
//!             p.name("alerts").index_mark("open").filter(|e| {
//!                 e.assert_compare().prop("status").op("==").value("\"open\"");
//!             });
//!         });
//!     });
//! ```
//!
//! Every failure message carries the path of the node being checked, e.g.
//! `selectors[0].props[1].filter.rhs`.

mod testing_assertions;
mod testing_matchers;

pub use testing_assertions::{
    assert_expr, assert_query, BinaryAssertion, ComparisonAssertion, ExprAssertion,
    PropAssertion, QueryAssertion, SelectorAssertion,
};
pub use testing_matchers::TextMatch;
