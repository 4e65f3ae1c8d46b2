//! Reference parser for RQL using chumsky
//!
//! An independent implementation of the language over the logos token stream. Operator
//! precedence is spelled out by layering instead of a priority rule:
//!
//! ```text
//! disjunction = conjunction ("||" conjunction)*
//! conjunction = atom ("&&" atom)*
//! atom        = comparison | "(" disjunction ")"
//! ```
//!
//! The grammar parser and this parser must accept the same queries and build equal trees.

use chumsky::prelude::*;
use std::ops::Range;

use crate::rql::ast::{
    CompareOp, Comparison, Expr, Filter, Literal, LiteralKind, Mark, Projection, PropSpec, Query,
    Selector, Target,
};
use crate::rql::engine::ParseError;
use crate::rql::grammar::RqlGrammar;
use crate::rql::lexing::{tokenize, Token};
use crate::rql::parsing::QueryError;

/// Type alias for token with location
pub(crate) type TokenLocation = (Token, Range<usize>);

/// Type alias for parser error
pub(crate) type ParserError = Simple<TokenLocation>;

/// Target as written; element ids are checked after parsing
#[derive(Debug, Clone)]
enum RawTarget {
    ElemId(String, usize),
    Kind(String),
}

type RawSelector = ((bool, RawTarget), Option<Projection>);

/// Parse `source`, rejecting filters nested deeper than `max_depth`
pub fn parse(source: &str, max_depth: usize) -> Result<Query, QueryError> {
    let tokens = tokenize(source).map_err(|err| syntax_error(source, err.offset, Vec::new()))?;

    if filter_depth(&tokens) > max_depth {
        return Err(ParseError::RecursionLimit(max_depth).into());
    }

    let offsets: Vec<usize> = tokens.iter().map(|(_, span)| span.start).collect();
    let raw = query().parse(tokens).map_err(|errors| {
        let furthest = errors
            .into_iter()
            .max_by_key(|err| err.span().start)
            .map(|err| {
                let offset = offsets.get(err.span().start).copied().unwrap_or(source.len());
                (offset, expected_labels(&err))
            });
        let (offset, expected) = furthest.unwrap_or((source.len(), Vec::new()));
        syntax_error(source, offset, expected)
    })?;

    let selectors = raw
        .into_iter()
        .map(|((negated, target), projection)| {
            let target = match target {
                RawTarget::ElemId(text, offset) => Target::ElemId(
                    text.parse()
                        .map_err(|_| QueryError::InvalidNumber { offset, text })?,
                ),
                RawTarget::Kind(kind) => Target::Kind(kind),
            };
            Ok(Selector {
                negated,
                target,
                projection,
            })
        })
        .collect::<Result<Vec<_>, QueryError>>()?;
    Ok(Query::new(selectors))
}

fn syntax_error(source: &str, offset: usize, expected: Vec<String>) -> QueryError {
    let mut error = RqlGrammar::get().grammar().syntax_error(source, offset, &[]);
    error.expected = expected;
    ParseError::Syntax(error).into()
}

fn expected_labels(err: &ParserError) -> Vec<String> {
    let mut labels: Vec<String> = err
        .expected()
        .map(|expected| match expected {
            Some((token, _)) => token.to_string(),
            None => "end_of_statement".to_string(),
        })
        .collect();
    if let Some(label) = err.label() {
        labels.push(label.to_string());
    }
    labels.sort();
    labels.dedup();
    labels
}

/// Deepest nesting of parentheses inside filters, counting the filter itself
fn filter_depth(tokens: &[TokenLocation]) -> usize {
    let mut deepest: usize = 0;
    let mut depth: usize = 0;
    let mut in_filter = false;
    for (token, _) in tokens {
        match token {
            Token::LBrace => {
                in_filter = true;
                depth = 1;
            }
            Token::RBrace => in_filter = false,
            Token::LParen if in_filter => depth += 1,
            Token::RParen if in_filter => depth = depth.saturating_sub(1),
            _ => continue,
        }
        deepest = deepest.max(depth);
    }
    deepest
}

fn expected(span: Range<usize>, wanted: &[Token], found: TokenLocation) -> ParserError {
    Simple::expected_input_found(
        span,
        wanted.iter().map(|t| Some((t.clone(), 0..0))),
        Some(found),
    )
}

/// Helper: match a specific token type, ignoring the location
fn token(t: Token) -> impl Parser<TokenLocation, (), Error = ParserError> + Clone {
    filter_map(move |span, (tok, location): TokenLocation| {
        if tok == t {
            Ok(())
        } else {
            Err(expected(span, &[t.clone()], (tok, location)))
        }
    })
}

fn name() -> impl Parser<TokenLocation, String, Error = ParserError> + Clone {
    filter_map(|span, (tok, location): TokenLocation| match tok {
        Token::Name(name) => Ok(name),
        other => Err(expected(span, &[Token::Name(String::new())], (other, location))),
    })
}

fn literal() -> impl Parser<TokenLocation, Literal, Error = ParserError> + Clone {
    filter_map(|span, (tok, location): TokenLocation| match tok {
        Token::Uint(raw) => Ok(Literal::new(LiteralKind::Uint, raw)),
        Token::Int(raw) => Ok(Literal::new(LiteralKind::Int, raw)),
        Token::Float(raw) => Ok(Literal::new(LiteralKind::Float, raw)),
        Token::Str(raw) => Ok(Literal::new(LiteralKind::Str, raw)),
        other => Err(expected(
            span,
            &[
                Token::Uint(String::new()),
                Token::Int(String::new()),
                Token::Float(String::new()),
                Token::Str(String::new()),
            ],
            (other, location),
        )),
    })
}

fn comparison() -> impl Parser<TokenLocation, Expr, Error = ParserError> + Clone {
    let compare_opr = filter_map(|span, (tok, location): TokenLocation| match tok {
        Token::Compare(op) => Ok(op),
        other => Err(expected(
            span,
            &[Token::Compare(CompareOp::Eq)],
            (other, location),
        )),
    });
    name()
        .then(compare_opr)
        .then(literal())
        .map(|((prop, op), value)| Expr::Compare(Comparison::new(prop, op, value)))
}

fn expr() -> impl Parser<TokenLocation, Expr, Error = ParserError> + Clone {
    recursive(|expr| {
        let group = expr
            .delimited_by(token(Token::LParen), token(Token::RParen))
            .map(Expr::group);
        let atom = comparison().or(group);
        let conjunction = atom
            .clone()
            .then(token(Token::And).ignore_then(atom).repeated())
            .foldl(Expr::and);
        conjunction
            .clone()
            .then(token(Token::Or).ignore_then(conjunction).repeated())
            .foldl(Expr::or)
    })
}

fn filter() -> impl Parser<TokenLocation, Filter, Error = ParserError> + Clone {
    token(Token::LBrace)
        .ignore_then(expr().or_not())
        .then_ignore(token(Token::RBrace))
        .map(|expr| Filter { expr })
}

fn prop_spec() -> impl Parser<TokenLocation, PropSpec, Error = ParserError> + Clone {
    let mark = token(Token::Hash)
        .ignore_then(name())
        .map(Mark::Index)
        .or(token(Token::Dot).ignore_then(name()).map(Mark::Rename));
    name()
        .then(mark.or_not())
        .then(filter().or_not())
        .map(|((name, mark), filter)| PropSpec { name, mark, filter })
}

fn selector() -> impl Parser<TokenLocation, RawSelector, Error = ParserError> + Clone {
    let target = filter_map(|span, (tok, location): TokenLocation| match tok {
        Token::Uint(text) => Ok(RawTarget::ElemId(text, location.start)),
        Token::Name(kind) => Ok(RawTarget::Kind(kind)),
        other => Err(expected(
            span,
            &[Token::Uint(String::new()), Token::Name(String::new())],
            (other, location),
        )),
    });
    let props = prop_spec()
        .separated_by(token(Token::Comma))
        .at_least(1)
        .delimited_by(token(Token::LParen), token(Token::RParen))
        .map(Projection::Props);
    let projection = token(Token::Star).to(Projection::All).or(props);

    token(Token::Bang)
        .or_not()
        .map(|bang| bang.is_some())
        .then(target)
        .then(projection.or_not())
}

fn query() -> impl Parser<TokenLocation, Vec<RawSelector>, Error = ParserError> {
    selector()
        .separated_by(token(Token::Comma))
        .at_least(1)
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(source: &str) -> Query {
        parse(source, 500).unwrap()
    }

    #[test]
    fn test_precedence() {
        let query = parse_ok("Foo(x{a==1 || b==2 && c==3})");
        let Some(Projection::Props(props)) = &query.selectors[0].projection else {
            panic!("expected properties");
        };
        let cmp = |p: &str, v| Expr::from(Comparison::new(p, CompareOp::Eq, Literal::uint(v)));
        assert_eq!(
            props[0].filter,
            Some(Filter::new(Expr::or(
                cmp("a", 1),
                Expr::and(cmp("b", 2), cmp("c", 3))
            )))
        );
    }

    #[test]
    fn test_selectors() {
        let query = parse_ok("!7, Foo*");
        assert_eq!(query.to_string(), "!7,Foo*");
    }

    #[test]
    fn test_rejects() {
        for source in ["", "Foo,", "Foo(", "Foo()", "Foo(a#b.c)", "Foo(a{x==1)", "12abc", "1.5"] {
            assert!(parse(source, 500).is_err(), "{:?} should not parse", source);
        }
    }

    #[test]
    fn test_error_offset() {
        let err = parse("Foo(bar{x==1", 500).unwrap_err();
        assert_eq!(err.offset(), Some(12));
        let err = parse("Foo(a & b)", 500).unwrap_err();
        assert_eq!(err.offset(), Some(6));
    }

    #[test]
    fn test_elem_id_overflow() {
        assert_eq!(
            parse("1,99999999999999999999", 500).unwrap_err(),
            QueryError::InvalidNumber {
                offset: 2,
                text: "99999999999999999999".into()
            }
        );
    }

    #[test]
    fn test_filter_depth() {
        let tokens = tokenize("A(x{(a==1) && ((b==2))}, y{})").unwrap();
        assert_eq!(filter_depth(&tokens), 3);
        let tokens = tokenize("A(x)").unwrap();
        assert_eq!(filter_depth(&tokens), 0);
    }
}
