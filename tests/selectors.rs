//! Selector level parsing, run against both parsers

use rql::rql::parsing::{parse_with, Parser};
use rql::rql::testing::assert_query;
use rstest::rstest;

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_elem_id(parser: Parser) {
    let query = parse_with("42", parser).unwrap();
    assert_query(&query).selector_count(1).selector(0, |s| {
        s.negated(false).elem_id(42).no_projection();
    });
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_kind(parser: Parser) {
    let query = parse_with("Foo", parser).unwrap();
    assert_query(&query).selector(0, |s| {
        s.kind("Foo").no_projection();
    });
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_negation_and_wildcard(parser: Parser) {
    let query = parse_with("!123,Foo*", parser).unwrap();
    assert_query(&query)
        .selector_count(2)
        .selector(0, |s| {
            s.negated(true).elem_id(123).no_projection();
        })
        .selector(1, |s| {
            s.negated(false).kind("Foo").all_props();
        });
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_single_property(parser: Parser) {
    let query = parse_with("Foo(bar)", parser).unwrap();
    assert_query(&query).selector(0, |s| {
        s.kind("Foo").prop_count(1).prop(0, |p| {
            p.name("bar").no_mark().no_filter();
        });
    });
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_marks_and_filters(parser: Parser) {
    let query = parse_with("Foo(bar#idx, baz.alias{x==1 && y>2}, qux{})", parser).unwrap();
    assert_query(&query)
        .text("Foo(bar#idx, baz.alias{x==1 && y>2}, qux{})")
        .selector(0, |s| {
            s.prop_count(3)
                .prop(0, |p| {
                    p.name("bar").index_mark("idx").no_filter();
                })
                .prop(1, |p| {
                    p.name("baz").rename_mark("alias").filter(|e| {
                        e.assert_and()
                            .lhs(|l| {
                                l.assert_compare().prop("x").op("==").value("1");
                            })
                            .rhs(|r| {
                                r.assert_compare().prop("y").op(">").value("2");
                            });
                    });
                })
                .prop(2, |p| {
                    p.name("qux").no_mark().empty_filter();
                });
        });
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_whitespace_is_insignificant(parser: Parser) {
    let compact = parse_with("!1,Host(name,alerts#open{a==1})", parser).unwrap();
    let spaced = parse_with("  ! 1 ,\n Host ( name , alerts # open { a == 1 } )  ", parser).unwrap();
    assert_eq!(compact, spaced);
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_ascii_whitespace_only(parser: Parser) {
    let tabbed = parse_with("Foo,\u{0B}Bar,\u{0C}\r\t7", parser).unwrap();
    assert_query(&tabbed).selector_count(3).selector(1, |s| {
        s.kind("Bar");
    });

    let err = parse_with("Foo,\u{a0}Bar", parser).unwrap_err();
    assert_eq!(err.offset(), Some(4));
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_many_selectors(parser: Parser) {
    let source = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join(",");
    let query = parse_with(&source, parser).unwrap();
    assert_query(&query).selector_count(50).selector(49, |s| {
        s.elem_id(49);
    });
}

#[rstest(
    parser => [Parser::Grammar, Parser::Reference],
    source => ["", "Foo,", ",Foo", "Foo()", "Foo(a,)", "Foo(a#b.c)", "Foo**", "12abc", "1.5", "!!Foo", "Foo(a) Bar"]
)]
fn test_rejected(parser: Parser, source: &str) {
    assert!(
        parse_with(source, parser).is_err(),
        "{:?} should not parse with the {} parser",
        source,
        parser
    );
}

#[rstest(parser => [Parser::Grammar, Parser::Reference])]
fn test_parsers_agree_on_kitchen_sink(parser: Parser) {
    let source = r#"!123,Host(name, alerts#open{status=="open" && (level>=2 || tag~"^db")}, uptime{}),Message*,7(x.y{v!=-1.5})"#;
    let query = parse_with(source, parser).unwrap();
    assert_eq!(query, parse_with(source, Parser::Grammar).unwrap());
    assert_eq!(query.to_string(), source);
}
