//! Fluent assertion API for query ASTs

use super::testing_matchers::TextMatch;
use crate::rql::ast::{
    Comparison, Expr, LiteralKind, Mark, Projection, PropSpec, Query, Selector, Target,
};

// ============================================================================
// Entry Points
// ============================================================================

/// Create an assertion builder for a query
pub fn assert_query(query: &Query) -> QueryAssertion<'_> {
    QueryAssertion { query }
}

/// Create an assertion builder for a standalone expression
pub fn assert_expr(expr: &Expr) -> ExprAssertion<'_> {
    ExprAssertion {
        expr,
        context: "expr".to_string(),
    }
}

// ============================================================================
// Query Assertions
// ============================================================================

pub struct QueryAssertion<'a> {
    query: &'a Query,
}

impl<'a> QueryAssertion<'a> {
    /// Assert the number of selectors
    pub fn selector_count(self, expected: usize) -> Self {
        let actual = self.query.selectors.len();
        assert_eq!(
            actual, expected,
            "Expected {} selectors, found {}: {}",
            expected, actual, self.query
        );
        self
    }

    /// Assert on a specific selector by index
    pub fn selector<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(SelectorAssertion<'a>),
    {
        assert!(
            index < self.query.selectors.len(),
            "Selector index {} out of bounds (query has {} selectors)",
            index,
            self.query.selectors.len()
        );
        assertion(SelectorAssertion {
            selector: &self.query.selectors[index],
            context: format!("selectors[{}]", index),
        });
        self
    }

    /// Assert on the canonical rendering
    pub fn text(self, expected: impl Into<TextMatch>) -> Self {
        expected.into().assert(&self.query.to_string(), "query");
        self
    }
}

// ============================================================================
// Selector Assertions
// ============================================================================

pub struct SelectorAssertion<'a> {
    selector: &'a Selector,
    context: String,
}

impl<'a> SelectorAssertion<'a> {
    pub fn negated(self, expected: bool) -> Self {
        assert_eq!(
            self.selector.negated, expected,
            "{}: Expected negated = {}",
            self.context, expected
        );
        self
    }

    pub fn elem_id(self, expected: u64) -> Self {
        match &self.selector.target {
            Target::ElemId(id) => assert_eq!(
                *id, expected,
                "{}: Expected element id {}, found {}",
                self.context, expected, id
            ),
            Target::Kind(kind) => panic!(
                "{}: Expected element id {}, found kind '{}'",
                self.context, expected, kind
            ),
        }
        self
    }

    pub fn kind(self, expected: &str) -> Self {
        match &self.selector.target {
            Target::Kind(kind) => assert_eq!(
                kind, expected,
                "{}: Expected kind '{}', found '{}'",
                self.context, expected, kind
            ),
            Target::ElemId(id) => panic!(
                "{}: Expected kind '{}', found element id {}",
                self.context, expected, id
            ),
        }
        self
    }

    pub fn no_projection(self) -> Self {
        assert!(
            self.selector.projection.is_none(),
            "{}: Expected no projection, found {:?}",
            self.context,
            self.selector.projection
        );
        self
    }

    /// Assert the `*` projection
    pub fn all_props(self) -> Self {
        assert_eq!(
            self.selector.projection,
            Some(Projection::All),
            "{}: Expected `*` projection",
            self.context
        );
        self
    }

    pub fn prop_count(self, expected: usize) -> Self {
        let actual = self.props().len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} properties, found {}",
            self.context, expected, actual
        );
        self
    }

    /// Assert on a specific property by index
    pub fn prop<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(PropAssertion<'a>),
    {
        let props = self.props();
        assert!(
            index < props.len(),
            "{}: Property index {} out of bounds ({} properties)",
            self.context,
            index,
            props.len()
        );
        assertion(PropAssertion {
            prop: &props[index],
            context: format!("{}.props[{}]", self.context, index),
        });
        self
    }

    fn props(&self) -> &'a [PropSpec] {
        match &self.selector.projection {
            Some(Projection::Props(props)) => props,
            other => panic!(
                "{}: Expected a property list, found {:?}",
                self.context, other
            ),
        }
    }
}

// ============================================================================
// Property Assertions
// ============================================================================

pub struct PropAssertion<'a> {
    prop: &'a PropSpec,
    context: String,
}

impl<'a> PropAssertion<'a> {
    pub fn name(self, expected: &str) -> Self {
        assert_eq!(
            self.prop.name, expected,
            "{}: Expected property '{}', found '{}'",
            self.context, expected, self.prop.name
        );
        self
    }

    pub fn no_mark(self) -> Self {
        assert!(
            self.prop.mark.is_none(),
            "{}: Expected no mark, found {:?}",
            self.context,
            self.prop.mark
        );
        self
    }

    /// Assert a `#name` mark
    pub fn index_mark(self, expected: &str) -> Self {
        self.mark(Mark::Index(expected.to_string()))
    }

    /// Assert a `.name` mark
    pub fn rename_mark(self, expected: &str) -> Self {
        self.mark(Mark::Rename(expected.to_string()))
    }

    fn mark(self, expected: Mark) -> Self {
        assert_eq!(
            self.prop.mark.as_ref(),
            Some(&expected),
            "{}: Expected mark {}",
            self.context,
            expected
        );
        self
    }

    pub fn no_filter(self) -> Self {
        assert!(
            self.prop.filter.is_none(),
            "{}: Expected no filter, found {:?}",
            self.context,
            self.prop.filter
        );
        self
    }

    /// Assert a `{}` filter
    pub fn empty_filter(self) -> Self {
        match &self.prop.filter {
            Some(filter) => assert!(
                filter.expr.is_none(),
                "{}: Expected an empty filter, found {}",
                self.context,
                filter
            ),
            None => panic!("{}: Expected an empty filter, found none", self.context),
        }
        self
    }

    /// Assert on the filter expression
    pub fn filter<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ExprAssertion<'a>),
    {
        let expr = match &self.prop.filter {
            Some(filter) => match &filter.expr {
                Some(expr) => expr,
                None => panic!("{}: Expected a filter expression, found `{{}}`", self.context),
            },
            None => panic!("{}: Expected a filter, found none", self.context),
        };
        assertion(ExprAssertion {
            expr,
            context: format!("{}.filter", self.context),
        });
        self
    }
}

// ============================================================================
// Expression Assertions
// ============================================================================

pub struct ExprAssertion<'a> {
    expr: &'a Expr,
    context: String,
}

impl<'a> ExprAssertion<'a> {
    /// Assert on the canonical rendering of the expression
    pub fn text(self, expected: impl Into<TextMatch>) -> Self {
        expected.into().assert(&self.expr.to_string(), &self.context);
        self
    }

    pub fn assert_compare(self) -> ComparisonAssertion<'a> {
        match self.expr {
            Expr::Compare(comparison) => ComparisonAssertion {
                comparison,
                context: self.context,
            },
            other => panic!("{}: Expected a comparison, found `{}`", self.context, other),
        }
    }

    pub fn assert_and(self) -> BinaryAssertion<'a> {
        match self.expr {
            Expr::And(lhs, rhs) => BinaryAssertion {
                expr: self.expr,
                lhs,
                rhs,
                context: self.context,
            },
            other => panic!("{}: Expected a conjunction, found `{}`", self.context, other),
        }
    }

    pub fn assert_or(self) -> BinaryAssertion<'a> {
        match self.expr {
            Expr::Or(lhs, rhs) => BinaryAssertion {
                expr: self.expr,
                lhs,
                rhs,
                context: self.context,
            },
            other => panic!("{}: Expected a disjunction, found `{}`", self.context, other),
        }
    }

    /// Assert a parenthesised group and continue with its content
    pub fn assert_group(self) -> ExprAssertion<'a> {
        match self.expr {
            Expr::Group(inner) => ExprAssertion {
                expr: inner,
                context: format!("{}.group", self.context),
            },
            other => panic!("{}: Expected a group, found `{}`", self.context, other),
        }
    }
}

pub struct BinaryAssertion<'a> {
    expr: &'a Expr,
    lhs: &'a Expr,
    rhs: &'a Expr,
    context: String,
}

impl<'a> BinaryAssertion<'a> {
    /// Assert on the canonical rendering of both operands and the operator
    pub fn text(self, expected: impl Into<TextMatch>) -> Self {
        expected.into().assert(&self.expr.to_string(), &self.context);
        self
    }

    pub fn lhs<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ExprAssertion<'a>),
    {
        assertion(ExprAssertion {
            expr: self.lhs,
            context: format!("{}.lhs", self.context),
        });
        self
    }

    pub fn rhs<F>(self, assertion: F) -> Self
    where
        F: FnOnce(ExprAssertion<'a>),
    {
        assertion(ExprAssertion {
            expr: self.rhs,
            context: format!("{}.rhs", self.context),
        });
        self
    }
}

pub struct ComparisonAssertion<'a> {
    comparison: &'a Comparison,
    context: String,
}

impl ComparisonAssertion<'_> {
    pub fn prop(self, expected: &str) -> Self {
        assert_eq!(
            self.comparison.prop, expected,
            "{}: Expected property '{}', found '{}'",
            self.context, expected, self.comparison.prop
        );
        self
    }

    /// Assert the operator by its symbol, e.g. `"!~"`
    pub fn op(self, expected: &str) -> Self {
        assert_eq!(
            self.comparison.op.as_str(),
            expected,
            "{}: Expected operator '{}', found '{}'",
            self.context,
            expected,
            self.comparison.op
        );
        self
    }

    /// Assert the literal as written, quotes included
    pub fn value(self, expected: &str) -> Self {
        assert_eq!(
            self.comparison.value.raw, expected,
            "{}: Expected value {}, found {}",
            self.context, expected, self.comparison.value
        );
        self
    }

    pub fn value_kind(self, expected: LiteralKind) -> Self {
        assert_eq!(
            self.comparison.value.kind,
            expected,
            "{}: Expected a {} literal, found {}",
            self.context,
            expected.as_str(),
            self.comparison.value.kind.as_str()
        );
        self
    }
}
