//! The RQL grammar
//!
//! A query is a comma separated list of selectors. A selector names an element id or a kind,
//! may be negated with `!`, and may be followed by `*` or by a parenthesised list of
//! properties. A property can carry one mark (`#name` or `.name`) and a filter:
//!
//! ```text
//! START       = List(selector, ',')
//! selector    = negation? (elem_id | kind) projection?
//! negation    = '!'
//! projection  = '*' | '(' List(prop_spec, ',') ')'
//! prop_spec   = prop (index | rename)? filter?
//! index       = '#' mark
//! rename      = '.' mark
//! filter      = '{' expr? '}'
//! expr        = Prio(comparison, group, conjunction, disjunction)
//! comparison  = prop compare_opr (r_uint | r_int | r_float | r_str)
//! group       = '(' This ')'
//! conjunction = This '&&' This
//! disjunction = This '||' This
//! ```
//!
//! `&&` binds tighter than `||` and both associate left. Numbers must not be followed by a
//! word character or a dot, so `3.5` is read as a float and never as `3` followed by junk.
//!
//! The grammar is built once per process, see [`RqlGrammar::get`].

use crate::rql::engine::{
    choice, list, named, optional, prio, regex, regex_guarded, repeat, sequence, this, token,
    tokens, Elem, Grammar, GrammarError, ParseError, ParseTree,
};
use once_cell::sync::Lazy;

/// Rule names used in the parse tree
pub mod rules {
    pub const START: &str = "START";
    pub const SELECTOR: &str = "selector";
    pub const NEGATION: &str = "negation";
    pub const ELEM_ID: &str = "elem_id";
    pub const KIND: &str = "kind";
    pub const PROJECTION: &str = "projection";
    pub const PROP_SPEC: &str = "prop_spec";
    pub const PROP: &str = "prop";
    pub const INDEX: &str = "index";
    pub const RENAME: &str = "rename";
    pub const MARK: &str = "mark";
    pub const FILTER: &str = "filter";
    pub const EXPR: &str = "expr";
    pub const COMPARISON: &str = "comparison";
    pub const GROUP: &str = "group";
    pub const CONJUNCTION: &str = "conjunction";
    pub const DISJUNCTION: &str = "disjunction";
    pub const COMPARE_OPR: &str = "compare_opr";
    pub const T_AND: &str = "t_and";
    pub const T_OR: &str = "t_or";
    pub const R_UINT: &str = "r_uint";
    pub const R_INT: &str = "r_int";
    pub const R_FLOAT: &str = "r_float";
    pub const R_STR: &str = "r_str";
    pub const R_NAME: &str = "r_name";
}

/// Characters that may not directly follow a numeric literal
pub const NUMBER_GUARD: &str = "[0-9A-Za-z_.]";

pub const UINT_PATTERN: &str = "[0-9]+";
pub const INT_PATTERN: &str = "[-+]?[0-9]+";
pub const FLOAT_PATTERN: &str = r"[-+]?[0-9]*\.?[0-9]+";
pub const STR_PATTERN: &str = r#"(?:"(?:[^"]*)")+"#;
pub const NAME_PATTERN: &str = "[A-Za-z][A-Za-z0-9_]*";

/// ASCII whitespace only; the lexer in [`crate::rql::lexing`] skips the same set
pub const WHITESPACE_PATTERN: &str = r"[ \t\n\x0B\x0C\r]*";

/// Comparison operators, as declared; the engine tries them longest first
pub const COMPARE_OPERATORS: &str = "== != <= >= !~ < > ~";

static RQL: Lazy<RqlGrammar> =
    Lazy::new(|| RqlGrammar::build().expect("the rql grammar definition is valid"));

/// The compiled RQL grammar with handles to its main rules
#[derive(Debug, Clone)]
pub struct RqlGrammar {
    grammar: Grammar,
    selector: Elem,
    prop_spec: Elem,
    filter: Elem,
    expr: Elem,
}

impl RqlGrammar {
    /// The process wide grammar
    pub fn get() -> &'static RqlGrammar {
        &RQL
    }

    pub fn build() -> Result<Self, GrammarError> {
        let r_uint = named(rules::R_UINT, regex_guarded(UINT_PATTERN, NUMBER_GUARD)?);
        let r_int = named(rules::R_INT, regex_guarded(INT_PATTERN, NUMBER_GUARD)?);
        let r_float = named(rules::R_FLOAT, regex_guarded(FLOAT_PATTERN, NUMBER_GUARD)?);
        let r_str = named(rules::R_STR, regex(STR_PATTERN)?);
        let r_name = named(rules::R_NAME, regex(NAME_PATTERN)?);

        let elem_id = named(rules::ELEM_ID, repeat(r_uint.clone(), 1, Some(1)));
        let kind = named(rules::KIND, repeat(r_name.clone(), 1, Some(1)));
        let prop = named(rules::PROP, repeat(r_name.clone(), 1, Some(1)));
        let mark = named(rules::MARK, repeat(r_name, 1, Some(1)));
        let compare_opr = named(rules::COMPARE_OPR, tokens(COMPARE_OPERATORS));

        let t_and = named(rules::T_AND, token("&&"));
        let t_or = named(rules::T_OR, token("||"));

        let comparison = named(
            rules::COMPARISON,
            sequence(vec![
                prop.clone(),
                compare_opr,
                choice(vec![r_uint, r_int, r_float, r_str]),
            ]),
        );
        let group = named(
            rules::GROUP,
            sequence(vec![token("("), this(), token(")")]),
        );
        let conjunction = named(rules::CONJUNCTION, sequence(vec![this(), t_and, this()]));
        let disjunction = named(rules::DISJUNCTION, sequence(vec![this(), t_or, this()]));
        let expr = named(
            rules::EXPR,
            prio(vec![comparison, group, conjunction, disjunction]),
        );

        let filter = named(
            rules::FILTER,
            sequence(vec![token("{"), optional(expr.clone()), token("}")]),
        );

        let index = named(rules::INDEX, sequence(vec![token("#"), mark.clone()]));
        let rename = named(rules::RENAME, sequence(vec![token("."), mark]));
        let prop_spec = named(
            rules::PROP_SPEC,
            sequence(vec![
                prop,
                optional(choice(vec![index, rename])),
                optional(filter.clone()),
            ]),
        );

        let projection = named(
            rules::PROJECTION,
            optional(choice(vec![
                token("*"),
                sequence(vec![
                    token("("),
                    list(prop_spec.clone(), token(","), 1, None, false),
                    token(")"),
                ]),
            ])),
        );
        let selector = named(
            rules::SELECTOR,
            sequence(vec![
                named(rules::NEGATION, optional(token("!"))),
                choice(vec![elem_id, kind]),
                projection,
            ]),
        );

        let start = named(
            rules::START,
            list(selector.clone(), token(","), 1, None, false),
        );

        Ok(Self {
            grammar: Grammar::new(start)?.with_whitespace(WHITESPACE_PATTERN)?,
            selector,
            prop_spec,
            filter,
            expr,
        })
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    /// A copy of the grammar with a different recursion limit
    pub fn with_max_depth(&self, max_depth: usize) -> Grammar {
        self.grammar.clone().with_max_depth(max_depth)
    }

    pub fn start(&self) -> &Elem {
        self.grammar.start()
    }

    pub fn selector(&self) -> &Elem {
        &self.selector
    }

    pub fn prop_spec(&self) -> &Elem {
        &self.prop_spec
    }

    pub fn filter(&self) -> &Elem {
        &self.filter
    }

    pub fn expr(&self) -> &Elem {
        &self.expr
    }

    pub fn parse<'s>(&self, source: &'s str) -> Result<ParseTree<'s>, ParseError> {
        self.grammar.parse(source)
    }
}
