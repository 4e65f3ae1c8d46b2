//! Grammar elements
//!
//! A grammar is a tree of reference-counted [`Element`]s. Terminals (`Token`, `Tokens`,
//! `Keyword`, `Regex`) consume input, the rest combine other elements. The only recursion
//! is `This`, which re-enters the innermost enclosing `Prio` at walk time, so the element
//! graph itself stays acyclic and can be shared freely between threads.
//!
//! Elements are built with the free functions in this module and labelled with [`named`]:
//!
//! ```text
//! let comparison = named("comparison", sequence(vec![prop, compare_opr, value]));
//! let expr = prio(vec![comparison, group, conjunction, disjunction]);
//! ```

use super::error::GrammarError;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a grammar element
pub type Elem = Arc<Element>;

/// A single grammar element with an optional rule name
#[derive(Debug)]
pub struct Element {
    name: Option<String>,
    kind: ElementKind,
}

#[derive(Debug, Clone)]
pub enum ElementKind {
    /// Fixed literal, matched verbatim
    Token(String),
    /// Set of literals, tried longest first
    Tokens(Vec<String>),
    /// Literal word; the grammar's keyword regex must match exactly its length
    Keyword(String),
    /// Anchored regular expression
    Regex(Pattern),
    Sequence(Vec<Elem>),
    /// Ordered choice: the first alternative that matches wins
    Choice(Vec<Elem>),
    Optional(Elem),
    Repeat {
        elem: Elem,
        min: usize,
        max: Option<usize>,
    },
    List {
        elem: Elem,
        delimiter: Elem,
        min: usize,
        max: Option<usize>,
        allow_trailing: bool,
    },
    /// Self-referential choice resolved by precedence climbing
    Prio(Vec<Elem>),
    /// Recursion into the innermost enclosing `Prio`
    This,
}

/// A compiled, anchored regular expression with an optional follow guard.
///
/// The guard is a pattern that must not match directly after the regex match. Numeric
/// literals use it so that `3` is not accepted as an integer when the input is `3.5`.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
    guard: Option<Regex>,
}

impl Pattern {
    pub fn new(source: &str, guard: Option<&str>) -> Result<Self, GrammarError> {
        let regex = anchored(source)?;
        let guard = guard.map(anchored).transpose()?;
        Ok(Self {
            source: source.to_string(),
            regex,
            guard,
        })
    }

    /// The pattern as written, without the anchoring added at compile time
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Length of the match at the start of `input`, if any.
    ///
    /// Empty matches never count as a match.
    pub fn match_len(&self, input: &str) -> Option<usize> {
        let found = self.regex.find(input)?;
        let len = found.end();
        if len == 0 {
            return None;
        }
        match &self.guard {
            Some(guard) if guard.is_match(&input[len..]) => None,
            _ => Some(len),
        }
    }
}

/// Compile `pattern` so that it only matches at the start of the haystack
pub(crate) fn anchored(pattern: &str) -> Result<Regex, GrammarError> {
    Regex::new(&format!("^(?:{})", pattern)).map_err(|source| GrammarError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

impl Element {
    fn new(kind: ElementKind) -> Elem {
        Arc::new(Self { name: None, kind })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Token(_)
                | ElementKind::Tokens(_)
                | ElementKind::Keyword(_)
                | ElementKind::Regex(_)
        )
    }

    /// Human readable label: the rule name, or the literal text for unnamed terminals
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match &self.kind {
            ElementKind::Token(text) | ElementKind::Keyword(text) => text.clone(),
            ElementKind::Tokens(tokens) => tokens.join(" "),
            ElementKind::Regex(pattern) => pattern.source().to_string(),
            ElementKind::Sequence(_) => "sequence".to_string(),
            ElementKind::Choice(_) => "choice".to_string(),
            ElementKind::Optional(_) => "optional".to_string(),
            ElementKind::Repeat { .. } => "repeat".to_string(),
            ElementKind::List { .. } => "list".to_string(),
            ElementKind::Prio(_) => "prio".to_string(),
            ElementKind::This => "this".to_string(),
        }
    }

    /// Label used in error messages: literals show their text even when named
    pub fn expected_label(&self) -> String {
        match &self.kind {
            ElementKind::Token(text) | ElementKind::Keyword(text) => text.clone(),
            _ => self.label(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Give `elem` a rule name. The returned element shares the children of `elem`.
pub fn named(name: &str, elem: Elem) -> Elem {
    Arc::new(Element {
        name: Some(name.to_string()),
        kind: elem.kind.clone(),
    })
}

pub fn token(text: &str) -> Elem {
    Element::new(ElementKind::Token(text.to_string()))
}

/// Space separated set of literal tokens, e.g. `tokens("== != <= >= < >")`
pub fn tokens(spec: &str) -> Elem {
    let mut list: Vec<String> = spec.split_whitespace().map(str::to_string).collect();
    // stable sort keeps declaration order among tokens of equal length
    list.sort_by(|a, b| b.len().cmp(&a.len()));
    Element::new(ElementKind::Tokens(list))
}

pub fn keyword(word: &str) -> Elem {
    Element::new(ElementKind::Keyword(word.to_string()))
}

pub fn regex(pattern: &str) -> Result<Elem, GrammarError> {
    Ok(Element::new(ElementKind::Regex(Pattern::new(pattern, None)?)))
}

/// Regex that fails when `guard` matches right after it
pub fn regex_guarded(pattern: &str, guard: &str) -> Result<Elem, GrammarError> {
    Ok(Element::new(ElementKind::Regex(Pattern::new(
        pattern,
        Some(guard),
    )?)))
}

pub fn sequence(elems: Vec<Elem>) -> Elem {
    Element::new(ElementKind::Sequence(elems))
}

pub fn choice(elems: Vec<Elem>) -> Elem {
    Element::new(ElementKind::Choice(elems))
}

pub fn optional(elem: Elem) -> Elem {
    Element::new(ElementKind::Optional(elem))
}

pub fn repeat(elem: Elem, min: usize, max: Option<usize>) -> Elem {
    Element::new(ElementKind::Repeat { elem, min, max })
}

pub fn list(
    elem: Elem,
    delimiter: Elem,
    min: usize,
    max: Option<usize>,
    allow_trailing: bool,
) -> Elem {
    Element::new(ElementKind::List {
        elem,
        delimiter,
        min,
        max,
        allow_trailing,
    })
}

pub fn prio(alternatives: Vec<Elem>) -> Elem {
    Element::new(ElementKind::Prio(alternatives))
}

pub fn this() -> Elem {
    Element::new(ElementKind::This)
}
