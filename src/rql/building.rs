//! Building the typed AST from a grammar parse tree
//!
//! The builder only looks at named nodes. Each rule of the RQL grammar maps to one AST type:
//!
//! - `START` to [`Query`], `selector` to [`Selector`]
//! - `projection` to [`Projection`], `prop_spec` to [`PropSpec`], `index`/`rename` to [`Mark`]
//! - `filter` to [`Filter`], `expr` and its alternatives to [`Expr`]
//! - `r_uint`, `r_int`, `r_float`, `r_str` to [`Literal`]

use crate::rql::ast::{
    CompareOp, Comparison, Expr, Filter, Literal, LiteralKind, Mark, Projection, PropSpec, Query,
    Selector, Target,
};
use crate::rql::engine::{Node, ParseTree};
use crate::rql::grammar::rules::*;
use crate::rql::parsing::QueryError;

/// Build a [`Query`] from a tree produced by the RQL grammar's start rule
pub fn build_query(tree: &ParseTree) -> Result<Query, QueryError> {
    Builder {
        source: tree.source(),
    }
    .query(tree.root())
}

/// Build a [`Filter`] from a tree produced by the RQL grammar's `filter` rule
pub fn build_filter(tree: &ParseTree) -> Result<Filter, QueryError> {
    Builder {
        source: tree.source(),
    }
    .filter(tree.root())
}

struct Builder<'s> {
    source: &'s str,
}

fn unexpected(node: &Node) -> QueryError {
    QueryError::UnexpectedNode {
        rule: node.element().label(),
        offset: node.start(),
    }
}

fn expect(node: &Node, rule: &str) -> Result<(), QueryError> {
    if node.name() == Some(rule) {
        Ok(())
    } else {
        Err(unexpected(node))
    }
}

impl<'s> Builder<'s> {
    fn text(&self, node: &Node) -> &'s str {
        node.text(self.source)
    }

    fn query(&self, node: &Node) -> Result<Query, QueryError> {
        expect(node, START)?;
        let selectors = node
            .named_descendants()
            .into_iter()
            .map(|child| self.selector(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Query::new(selectors))
    }

    fn selector(&self, node: &Node) -> Result<Selector, QueryError> {
        expect(node, SELECTOR)?;
        let mut negated = false;
        let mut target = None;
        let mut projection = None;
        for child in node.named_descendants() {
            match child.name() {
                Some(NEGATION) => negated = !child.is_empty(),
                Some(ELEM_ID) => target = Some(Target::ElemId(self.elem_id(child)?)),
                Some(KIND) => target = Some(Target::Kind(self.text(child).to_string())),
                Some(PROJECTION) => projection = self.projection(child)?,
                _ => return Err(unexpected(child)),
            }
        }
        let target = target.ok_or_else(|| unexpected(node))?;
        Ok(Selector {
            negated,
            target,
            projection,
        })
    }

    fn elem_id(&self, node: &Node) -> Result<u64, QueryError> {
        let text = self.text(node);
        text.parse().map_err(|_| QueryError::InvalidNumber {
            offset: node.start(),
            text: text.to_string(),
        })
    }

    fn projection(&self, node: &Node) -> Result<Option<Projection>, QueryError> {
        if node.is_empty() {
            return Ok(None);
        }
        let specs = node.named_descendants();
        if specs.is_empty() {
            return Ok(Some(Projection::All));
        }
        let props = specs
            .into_iter()
            .map(|spec| self.prop_spec(spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Projection::Props(props)))
    }

    fn prop_spec(&self, node: &Node) -> Result<PropSpec, QueryError> {
        expect(node, PROP_SPEC)?;
        let mut name = None;
        let mut mark = None;
        let mut filter = None;
        for child in node.named_descendants() {
            match child.name() {
                Some(PROP) => name = Some(self.text(child).to_string()),
                Some(INDEX) => mark = Some(Mark::Index(self.mark(child)?)),
                Some(RENAME) => mark = Some(Mark::Rename(self.mark(child)?)),
                Some(FILTER) => filter = Some(self.filter(child)?),
                _ => return Err(unexpected(child)),
            }
        }
        let name = name.ok_or_else(|| unexpected(node))?;
        Ok(PropSpec { name, mark, filter })
    }

    fn mark(&self, node: &Node) -> Result<String, QueryError> {
        node.find_named(MARK)
            .map(|mark| self.text(mark).to_string())
            .ok_or_else(|| unexpected(node))
    }

    fn filter(&self, node: &Node) -> Result<Filter, QueryError> {
        expect(node, FILTER)?;
        match node.named_descendants().first() {
            Some(expr) => Ok(Filter::new(self.expr(expr)?)),
            None => Ok(Filter::empty()),
        }
    }

    fn expr(&self, node: &Node) -> Result<Expr, QueryError> {
        expect(node, EXPR)?;
        let alt = node.children().first().ok_or_else(|| unexpected(node))?;
        let parts = alt.named_descendants();
        match (alt.name(), parts.as_slice()) {
            (Some(COMPARISON), [prop, opr, value]) => {
                let op: CompareOp = self.text(opr).parse().map_err(|_| unexpected(opr))?;
                Ok(Expr::Compare(Comparison::new(
                    self.text(prop),
                    op,
                    self.literal(value)?,
                )))
            }
            (Some(GROUP), [inner]) => Ok(Expr::group(self.expr(inner)?)),
            (Some(CONJUNCTION), [lhs, _, rhs]) => Ok(Expr::and(self.expr(lhs)?, self.expr(rhs)?)),
            (Some(DISJUNCTION), [lhs, _, rhs]) => Ok(Expr::or(self.expr(lhs)?, self.expr(rhs)?)),
            _ => Err(unexpected(alt)),
        }
    }

    fn literal(&self, node: &Node) -> Result<Literal, QueryError> {
        let kind = match node.name() {
            Some(R_UINT) => LiteralKind::Uint,
            Some(R_INT) => LiteralKind::Int,
            Some(R_FLOAT) => LiteralKind::Float,
            Some(R_STR) => LiteralKind::Str,
            _ => return Err(unexpected(node)),
        };
        Ok(Literal::new(kind, self.text(node)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rql::grammar::RqlGrammar;

    fn build(source: &str) -> Query {
        let tree = RqlGrammar::get().parse(source).unwrap();
        build_query(&tree).unwrap()
    }

    #[test]
    fn test_selectors() {
        let query = build("!123, Foo*");
        assert_eq!(
            query.selectors,
            vec![
                Selector::new(Target::ElemId(123)).negated(),
                Selector::new(Target::Kind("Foo".into())).with_projection(Projection::All),
            ]
        );
    }

    #[test]
    fn test_prop_specs() {
        let query = build("Foo(bar#idx, baz.alias{x==1 && y>2}, qux{})");
        let Some(Projection::Props(props)) = &query.selectors[0].projection else {
            panic!("expected properties");
        };
        assert_eq!(props[0], PropSpec::new("bar").with_mark(Mark::Index("idx".into())));
        assert_eq!(props[1].mark, Some(Mark::Rename("alias".into())));
        assert_eq!(
            props[1].filter.as_ref().and_then(|f| f.expr.clone()),
            Some(Expr::and(
                Comparison::new("x", CompareOp::Eq, Literal::uint(1)).into(),
                Comparison::new("y", CompareOp::Gt, Literal::uint(2)).into(),
            ))
        );
        assert_eq!(props[2].filter, Some(Filter::empty()));
    }

    #[test]
    fn test_literal_kinds() {
        let query = build("Foo(a{a==1 || b==-1 || c==1.5 || d==\"x\"\"y\"})");
        let Some(Projection::Props(props)) = &query.selectors[0].projection else {
            panic!("expected properties");
        };
        let expr = props[0].filter.as_ref().and_then(|f| f.expr.as_ref()).unwrap();
        let kinds: Vec<LiteralKind> = expr.comparisons().iter().map(|c| c.value.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LiteralKind::Uint,
                LiteralKind::Int,
                LiteralKind::Float,
                LiteralKind::Str
            ]
        );
        assert_eq!(expr.comparisons()[3].value.as_string(), Some("xy".into()));
    }

    #[test]
    fn test_elem_id_overflow() {
        let tree = RqlGrammar::get().parse("99999999999999999999").unwrap();
        assert_eq!(
            build_query(&tree).unwrap_err(),
            QueryError::InvalidNumber {
                offset: 0,
                text: "99999999999999999999".into()
            }
        );
    }

    #[test]
    fn test_build_filter() {
        let rql = RqlGrammar::get();
        let tree = rql.grammar().parse_element(rql.filter(), "{(a<1)}").unwrap();
        let filter = build_filter(&tree).unwrap();
        assert_eq!(filter.to_string(), "{(a<1)}");
    }

    #[test]
    fn test_wrong_root() {
        let rql = RqlGrammar::get();
        let tree = rql.grammar().parse_element(rql.filter(), "{}").unwrap();
        assert!(matches!(
            build_query(&tree).unwrap_err(),
            QueryError::UnexpectedNode { .. }
        ));
    }
}
