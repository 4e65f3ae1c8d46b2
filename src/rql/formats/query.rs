//! Canonical query text
//!
//! Renders the query through its `Display` impl: selectors joined by `,`, properties by
//! `, `, binary operators surrounded by single spaces. Parsing the output yields the same
//! AST.

use super::registry::{FormatError, Formatter};
use crate::rql::ast::Query;

pub struct QueryFormatter;

impl Formatter for QueryFormatter {
    fn name(&self) -> &str {
        "query"
    }

    fn serialize(&self, query: &Query) -> Result<String, FormatError> {
        Ok(query.to_string())
    }

    fn description(&self) -> &str {
        "Canonical query text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rql::parsing::parse;

    #[test]
    fn test_normalizes_spacing() {
        let query = parse("Foo ( a{x==1&&(y>2||z<3)} ,b.c ) , ! 7").unwrap();
        assert_eq!(
            QueryFormatter.serialize(&query).unwrap(),
            "Foo(a{x==1 && (y>2 || z<3)}, b.c),!7"
        );
    }

    #[test]
    fn test_marks_groups_and_empty_filters() {
        let query = parse("A( p . q { } , r # i { ( x == 1 ) } )").unwrap();
        assert_eq!(
            QueryFormatter.serialize(&query).unwrap(),
            "A(p.q{}, r#i{(x==1)})"
        );
    }
}
