//! Tracking of the furthest failure
//!
//! Every terminal that fails to match reports its offset here. Only failures at the
//! furthest offset seen so far are kept; a failure further on discards the earlier set.

use super::element::Elem;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Expected {
    Element(Elem),
    /// The grammar matched, but input remains
    EndOfStatement,
}

impl Expected {
    pub fn label(&self) -> String {
        match self {
            Expected::Element(elem) => elem.expected_label(),
            Expected::EndOfStatement => "end_of_statement".to_string(),
        }
    }

    fn same_as(&self, other: &Expected) -> bool {
        match (self, other) {
            (Expected::Element(a), Expected::Element(b)) => Arc::ptr_eq(a, b),
            (Expected::EndOfStatement, Expected::EndOfStatement) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Expecting {
    offset: usize,
    expected: Vec<Expected>,
}

impl Expecting {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, offset: usize, expected: Expected) {
        if offset > self.offset {
            self.offset = offset;
            self.expected.clear();
        }
        if offset == self.offset && !self.expected.iter().any(|e| e.same_as(&expected)) {
            self.expected.push(expected);
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn expected(&self) -> &[Expected] {
        &self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rql::engine::element::token;

    #[test]
    fn test_further_offset_replaces() {
        let mut expecting = Expecting::new();
        expecting.update(2, Expected::Element(token("a")));
        expecting.update(5, Expected::Element(token("b")));
        expecting.update(3, Expected::Element(token("c")));
        assert_eq!(expecting.offset(), 5);
        let labels: Vec<String> = expecting.expected().iter().map(Expected::label).collect();
        assert_eq!(labels, vec!["b"]);
    }

    #[test]
    fn test_same_offset_deduplicates() {
        let close = token("}");
        let mut expecting = Expecting::new();
        expecting.update(4, Expected::Element(close.clone()));
        expecting.update(4, Expected::Element(close));
        expecting.update(4, Expected::EndOfStatement);
        expecting.update(4, Expected::EndOfStatement);
        assert_eq!(expecting.expected().len(), 2);
    }
}
