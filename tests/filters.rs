//! Filter expressions: precedence, grouping, operators and literals

use rql::rql::ast::LiteralKind;
use rql::rql::building::build_filter;
use rql::rql::grammar::RqlGrammar;
use rql::rql::parsing::{parse_with, Parser};
use rql::rql::testing::{assert_query, ExprAssertion};
use rstest::rstest;

/// Parse `Foo(p{<expr>})` and hand the filter expression to `check`
fn with_filter(parser: Parser, expr: &str, check: impl FnOnce(ExprAssertion<'_>)) {
    let source = format!("Foo(p{{{}}})", expr);
    let query = parse_with(&source, parser).unwrap_or_else(|e| panic!("{}: {}", source, e));
    assert_query(&query).selector(0, |s| {
        s.prop(0, |p| {
            p.filter(check);
        });
    });
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_and_binds_tighter_than_or(parser: Parser) {
    with_filter(parser, "a==1 && b==2 || c==3", |e| {
        e.assert_or()
            .lhs(|l| {
                l.assert_and()
                    .lhs(|a| {
                        a.assert_compare().prop("a");
                    })
                    .rhs(|b| {
                        b.assert_compare().prop("b");
                    });
            })
            .rhs(|r| {
                r.assert_compare().prop("c");
            });
    });
    with_filter(parser, "a==1 || b==2 && c==3", |e| {
        e.assert_or()
            .lhs(|l| {
                l.assert_compare().prop("a");
            })
            .rhs(|r| {
                r.assert_and().text("b==2 && c==3");
            });
    });
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_left_associative(parser: Parser) {
    with_filter(parser, "a==1 && b==2 && c==3", |e| {
        e.assert_and()
            .lhs(|l| {
                l.assert_and().text("a==1 && b==2");
            })
            .rhs(|r| {
                r.assert_compare().prop("c");
            });
    });
    with_filter(parser, "a==1 || b==2 || c==3", |e| {
        e.assert_or()
            .lhs(|l| {
                l.assert_or().text("a==1 || b==2");
            })
            .rhs(|r| {
                r.assert_compare().prop("c");
            });
    });
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_groups_are_kept(parser: Parser) {
    with_filter(parser, "(a==1 || b==2) && ((c==3))", |e| {
        e.text("(a==1 || b==2) && ((c==3))")
            .assert_and()
            .lhs(|l| {
                l.assert_group().assert_or();
            })
            .rhs(|r| {
                r.assert_group().assert_group().assert_compare().prop("c");
            });
    });
}

#[rstest(
    parser => [Parser::Grammar, Parser::Reference],
    op => ["==", "!=", "<=", ">=", "!~", "<", ">", "~"]
)]
fn test_comparison_operators(parser: Parser, op: &str) {
    with_filter(parser, &format!("x{}1", op), |e| {
        e.assert_compare().prop("x").op(op).value("1");
    });
}

#[rstest(
    parser => [Parser::Grammar, Parser::Reference],
    case => [
        ("7", LiteralKind::Uint),
        ("-7", LiteralKind::Int),
        ("+7", LiteralKind::Int),
        ("7.5", LiteralKind::Float),
        ("-.5", LiteralKind::Float),
        ("\"open\"", LiteralKind::Str),
        ("\"say \"\"hi\"\"\"", LiteralKind::Str),
        ("\"\"", LiteralKind::Str),
    ]
)]
fn test_literals(parser: Parser, case: (&str, LiteralKind)) {
    let (raw, kind) = case;
    with_filter(parser, &format!("x=={}", raw), |e| {
        e.assert_compare().value(raw).value_kind(kind);
    });
}

#[rstest(
    parser => [Parser::Grammar, Parser::Reference],
    expr => ["x==", "==1", "x 1", "x==1 &&", "(x==1", "x==1)", "x==1 & y==2", "x==abc", "()", "x==1 y==2"]
)]
fn test_rejected(parser: Parser, expr: &str) {
    let source = format!("Foo(p{{{}}})", expr);
    assert!(
        parse_with(&source, parser).is_err(),
        "{:?} should not parse with the {} parser",
        source,
        parser
    );
}

#[test]
fn test_filter_rule_on_its_own() {
    let rql = RqlGrammar::get();
    let tree = rql.grammar().parse_element(rql.filter(), "{}").unwrap();
    assert!(build_filter(&tree).unwrap().expr.is_none());

    let tree = rql
        .grammar()
        .parse_element(rql.filter(), "{ a==1 || b~\"x\" }")
        .unwrap();
    let filter = build_filter(&tree).unwrap();
    assert_eq!(filter.to_string(), "{a==1 || b~\"x\"}");
}
