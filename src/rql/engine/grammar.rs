//! Grammar entry point
//!
//! A [`Grammar`] owns the start element together with the regexes that define word
//! boundaries and whitespace, and the recursion limit for `Prio`. It is validated once on
//! construction and is immutable afterwards.

use super::element::{anchored, Elem, ElementKind};
use super::error::{GrammarError, ParseError, SyntaxError, Unexpected};
use super::expecting::Expected;
use super::node::ParseTree;
use super::walker::Walker;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_KEYWORDS: &str = r"\w+";
pub const DEFAULT_WHITESPACE: &str = r"\s*";
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone)]
pub struct Grammar {
    start: Elem,
    keywords: Regex,
    whitespace: Regex,
    max_depth: usize,
}

impl Grammar {
    pub fn new(start: Elem) -> Result<Self, GrammarError> {
        validate(&start)?;
        Ok(Self {
            start,
            keywords: anchored(DEFAULT_KEYWORDS)?,
            whitespace: anchored(DEFAULT_WHITESPACE)?,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Replace the regex that delimits words for keywords and error messages
    pub fn with_keywords(mut self, pattern: &str) -> Result<Self, GrammarError> {
        self.keywords = anchored(pattern)?;
        Ok(self)
    }

    pub fn with_whitespace(mut self, pattern: &str) -> Result<Self, GrammarError> {
        self.whitespace = anchored(pattern)?;
        Ok(self)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn start(&self) -> &Elem {
        &self.start
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse the whole of `input` starting at the grammar's start element
    pub fn parse<'s>(&self, input: &'s str) -> Result<ParseTree<'s>, ParseError> {
        self.parse_element(&self.start, input)
    }

    /// Parse the whole of `input` as `elem`, which should belong to this grammar
    pub fn parse_element<'s>(&self, elem: &Elem, input: &'s str) -> Result<ParseTree<'s>, ParseError> {
        debug!(rule = %elem.label(), len = input.len(), "parsing");
        let mut walker = Walker::new(self, input);
        if let Some(root) = walker.walk(elem, 0)? {
            let rest = self.skip_whitespace(input, root.end());
            if rest == input.len() {
                return Ok(ParseTree::new(input, root));
            }
            walker.expecting_mut().update(rest, Expected::EndOfStatement);
        }
        let expecting = walker.into_expecting();
        let error = self.syntax_error(input, expecting.offset(), expecting.expected());
        debug!(%error, "parse failed");
        Err(ParseError::Syntax(error))
    }

    pub(crate) fn skip_whitespace(&self, input: &str, pos: usize) -> usize {
        match self.whitespace.find(&input[pos..]) {
            Some(found) => pos + found.end(),
            None => pos,
        }
    }

    /// Length of the word the keyword regex matches at the start of `input`
    pub fn keyword_len(&self, input: &str) -> usize {
        self.keywords.find(input).map_or(0, |found| found.end())
    }

    /// Describe a failure at `offset`: line and position, the offending word and what was
    /// expected there
    pub fn syntax_error(&self, source: &str, offset: usize, expected: &[Expected]) -> SyntaxError {
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = source[line_start..offset].chars().count();

        let rest = &source[offset..];
        let unexpected = match self.keyword_len(rest) {
            0 => {
                let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
                if digits > 0 {
                    Some(Unexpected::word(&rest[..digits]))
                } else {
                    rest.chars().next().map(Unexpected::Character)
                }
            }
            len => Some(Unexpected::word(&rest[..len])),
        };

        SyntaxError {
            offset,
            line,
            column,
            unexpected,
            expected: expected.iter().map(Expected::label).collect(),
        }
    }
}

fn validate(start: &Elem) -> Result<(), GrammarError> {
    let mut seen = HashSet::new();
    check(start, false, &mut seen)
}

fn check(elem: &Elem, in_prio: bool, seen: &mut HashSet<(usize, bool)>) -> Result<(), GrammarError> {
    if !seen.insert((Arc::as_ptr(elem) as usize, in_prio)) {
        return Ok(());
    }
    match elem.kind() {
        ElementKind::Token(text) | ElementKind::Keyword(text) => {
            if text.is_empty() {
                return Err(GrammarError::EmptyLiteral(elem.label()));
            }
        }
        ElementKind::Tokens(list) => {
            if list.is_empty() {
                return Err(GrammarError::EmptyLiteral(elem.label()));
            }
        }
        ElementKind::Regex(_) => {}
        ElementKind::Sequence(items) | ElementKind::Choice(items) => {
            for item in items {
                check(item, in_prio, seen)?;
            }
        }
        ElementKind::Optional(inner) => check(inner, in_prio, seen)?,
        ElementKind::Repeat { elem: inner, min, max } => {
            check_bounds(elem, *min, *max)?;
            check(inner, in_prio, seen)?;
        }
        ElementKind::List {
            elem: inner,
            delimiter,
            min,
            max,
            ..
        } => {
            check_bounds(elem, *min, *max)?;
            check(inner, in_prio, seen)?;
            check(delimiter, in_prio, seen)?;
        }
        ElementKind::Prio(alternatives) => {
            let starts_with_this = |alt: &Elem| match alt.kind() {
                ElementKind::Sequence(items) => {
                    matches!(items.first().map(|e| e.kind()), Some(ElementKind::This))
                }
                ElementKind::This => true,
                _ => false,
            };
            if alternatives.iter().all(starts_with_this) {
                return Err(GrammarError::PrioWithoutAtom(elem.label()));
            }
            for (index, alt) in alternatives.iter().enumerate() {
                if starts_with_this(alt) {
                    let well_formed = match alt.kind() {
                        ElementKind::Sequence(items) => {
                            items.len() >= 3
                                && matches!(items[items.len() - 1].kind(), ElementKind::This)
                        }
                        _ => false,
                    };
                    if !well_formed {
                        return Err(GrammarError::MalformedInfix {
                            prio: elem.label(),
                            index,
                        });
                    }
                }
                check(alt, true, seen)?;
            }
        }
        ElementKind::This => {
            if !in_prio {
                return Err(GrammarError::ThisOutsidePrio);
            }
        }
    }
    Ok(())
}

fn check_bounds(elem: &Elem, min: usize, max: Option<usize>) -> Result<(), GrammarError> {
    match max {
        Some(max) if max == 0 || max < min => Err(GrammarError::InvalidBounds {
            element: elem.label(),
            min,
            max,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rql::engine::element::*;

    fn names(tree: &ParseTree, name: &str) -> Vec<String> {
        fn collect(node: &crate::rql::engine::Node, name: &str, source: &str, out: &mut Vec<String>) {
            if node.name() == Some(name) {
                out.push(node.text(source).to_string());
            }
            for child in node.children() {
                collect(child, name, source, out);
            }
        }
        let mut out = Vec::new();
        collect(tree.root(), name, tree.source(), &mut out);
        out
    }

    fn syntax(err: ParseError) -> SyntaxError {
        match err {
            ParseError::Syntax(err) => err,
            other => panic!("expected a syntax error, got {:?}", other),
        }
    }

    /// Arithmetic over single digits: `*` binds tighter than `+`
    fn arithmetic() -> Grammar {
        let digit = named("digit", regex("[0-9]").unwrap());
        let group = named("group", sequence(vec![token("("), this(), token(")")]));
        let mul = named("mul", sequence(vec![this(), token("*"), this()]));
        let add = named("add", sequence(vec![this(), token("+"), this()]));
        Grammar::new(named("expr", prio(vec![digit, group, mul, add]))).unwrap()
    }

    /// Fully parenthesised rendering of an arithmetic tree
    fn render(tree: &ParseTree) -> String {
        fn go(node: &crate::rql::engine::Node, source: &str) -> String {
            match node.name() {
                Some("digit") => node.text(source).to_string(),
                Some("mul") | Some("add") => {
                    let op = if node.name() == Some("mul") { "*" } else { "+" };
                    let first = node.children().first().unwrap();
                    let last = node.children().last().unwrap();
                    format!("({}{}{})", go(first, source), op, go(last, source))
                }
                Some("group") => go(&node.children()[1], source),
                _ => go(&node.children()[0], source),
            }
        }
        go(tree.root(), tree.source())
    }

    #[test]
    fn test_tokens_longest_first() {
        let grammar = Grammar::new(named("op", tokens("< <= ="))).unwrap();
        let tree = grammar.parse("<=").unwrap();
        assert_eq!(tree.root().span(), 0..2);
    }

    #[test]
    fn test_keyword_boundary() {
        let grammar = Grammar::new(sequence(vec![keyword("in"), regex("[a-z]+").unwrap()])).unwrap();
        assert!(grammar.parse("in abc").is_ok());
        // `inabc` is one word, so the keyword does not match
        let err = syntax(grammar.parse("inabc").unwrap_err());
        assert_eq!(err.offset, 0);
        assert_eq!(err.expected, vec!["in"]);
        assert_eq!(err.unexpected, Some(Unexpected::Word("inabc".to_string())));
    }

    #[test]
    fn test_whitespace_is_skipped() {
        let grammar = Grammar::new(sequence(vec![token("a"), token("b")])).unwrap();
        let tree = grammar.parse("  a \n b  ").unwrap();
        assert_eq!(tree.root().span(), 2..7);
    }

    #[test]
    fn test_choice_is_ordered() {
        let short = named("short", token("a"));
        let long = named("long", token("ab"));
        let grammar = Grammar::new(sequence(vec![choice(vec![short, long]), optional(token("b"))])).unwrap();
        let tree = grammar.parse("ab").unwrap();
        assert_eq!(names(&tree, "short"), vec!["a"]);
        assert!(names(&tree, "long").is_empty());
    }

    #[test]
    fn test_repeat_bounds() {
        let item = named("x", token("x"));
        let grammar = Grammar::new(repeat(item, 2, Some(3))).unwrap();
        assert!(grammar.parse("x").is_err());
        assert_eq!(names(&grammar.parse("xx").unwrap(), "x").len(), 2);
        assert_eq!(names(&grammar.parse("xxx").unwrap(), "x").len(), 3);
        let err = syntax(grammar.parse("xxxx").unwrap_err());
        assert_eq!(err.offset, 3);
        assert_eq!(err.expected, vec!["end_of_statement"]);
    }

    #[test]
    fn test_list_delimiters() {
        let item = named("item", regex("[a-z]+").unwrap());
        let strict = Grammar::new(list(item.clone(), token(","), 1, None, false)).unwrap();
        assert_eq!(names(&strict.parse("a, b,c").unwrap(), "item"), vec!["a", "b", "c"]);
        assert!(strict.parse("a,b,").is_err());
        assert!(strict.parse("").is_err());

        let relaxed = Grammar::new(list(item, token(","), 0, Some(2), true)).unwrap();
        assert!(relaxed.parse("").is_ok());
        assert!(relaxed.parse("a,b,").is_ok());
        assert!(relaxed.parse("a,b,c").is_err());
    }

    #[test]
    fn test_prio_precedence() {
        let grammar = arithmetic();
        assert_eq!(render(&grammar.parse("1+2*3").unwrap()), "(1+(2*3))");
        assert_eq!(render(&grammar.parse("1*2+3").unwrap()), "((1*2)+3)");
        assert_eq!(render(&grammar.parse("(1+2)*3").unwrap()), "((1+2)*3)");
    }

    #[test]
    fn test_prio_left_associative() {
        let grammar = arithmetic();
        assert_eq!(render(&grammar.parse("1+2+3").unwrap()), "((1+2)+3)");
        assert_eq!(render(&grammar.parse("1*2*3+4*5").unwrap()), "(((1*2)*3)+(4*5))");
    }

    #[test]
    fn test_prio_expecting() {
        let err = syntax(arithmetic().parse("(1+2").unwrap_err());
        assert_eq!(err.offset, 4);
        assert_eq!(err.expected, vec!["*", "+", ")"]);
        assert_eq!(err.unexpected, None);
        assert_eq!(
            err.to_string(),
            "error at line 1, position 4, expecting: *, + or )"
        );
    }

    #[test]
    fn test_recursion_limit() {
        let grammar = arithmetic().with_max_depth(10);
        assert!(grammar.parse(&format!("{}1{}", "(".repeat(5), ")".repeat(5))).is_ok());
        let deep = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(grammar.parse(&deep).unwrap_err(), ParseError::RecursionLimit(10));
    }

    #[test]
    fn test_error_line_and_position() {
        let grammar = Grammar::new(list(token("a"), token(","), 1, None, false)).unwrap();
        let err = syntax(grammar.parse("a,\na,\n  b").unwrap_err());
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 2);
        assert_eq!(err.offset, 8);
    }

    #[test]
    fn test_this_outside_prio() {
        let err = Grammar::new(sequence(vec![token("a"), this()])).unwrap_err();
        assert!(matches!(err, GrammarError::ThisOutsidePrio));
    }

    #[test]
    fn test_prio_needs_atom() {
        let op = sequence(vec![this(), token("+"), this()]);
        let err = Grammar::new(prio(vec![op])).unwrap_err();
        assert!(matches!(err, GrammarError::PrioWithoutAtom(_)));
    }

    #[test]
    fn test_malformed_infix() {
        let left = sequence(vec![this(), token("!")]);
        let err = Grammar::new(prio(vec![token("a"), left])).unwrap_err();
        assert!(matches!(err, GrammarError::MalformedInfix { index: 1, .. }));
    }

    #[test]
    fn test_invalid_bounds() {
        let err = Grammar::new(repeat(token("a"), 3, Some(2))).unwrap_err();
        assert!(matches!(err, GrammarError::InvalidBounds { min: 3, max: 2, .. }));
        let err = Grammar::new(tokens("")).unwrap_err();
        assert!(matches!(err, GrammarError::EmptyLiteral(_)));
    }
}
