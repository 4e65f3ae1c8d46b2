//! Engine errors
//!
//! [`GrammarError`] is raised while building a grammar, [`ParseError`] while parsing with one.
//! A [`SyntaxError`] carries the furthest position the parser reached and what it expected
//! there; its `Display` reads like:
//!
//! ```text
//! error at line 1, position 10, unexpected character `"`, expecting: r_uint, r_int, r_float or r_str
//! ```

use std::fmt;
use thiserror::Error;

/// Words in error messages are cut after this many characters
const MAX_UNEXPECTED_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("invalid regular expression `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("`This` used outside of a `Prio` element")]
    ThisOutsidePrio,
    #[error("prio `{0}` has no alternative that starts without `This`")]
    PrioWithoutAtom(String),
    #[error("alternative {index} of prio `{prio}` must be a sequence of `This`, something and `This`")]
    MalformedInfix { prio: String, index: usize },
    #[error("element `{element}` has inconsistent bounds (min {min}, max {max})")]
    InvalidBounds {
        element: String,
        min: usize,
        max: usize,
    },
    #[error("empty literal in element `{0}`")]
    EmptyLiteral(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0}")]
    Syntax(SyntaxError),
    #[error("maximum recursion depth of {0} exceeded")]
    RecursionLimit(usize),
}

/// What the parser found where it failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unexpected {
    Word(String),
    Character(char),
}

impl Unexpected {
    /// Build from a word match, shortening long words
    pub fn word(text: &str) -> Self {
        if text.chars().count() > MAX_UNEXPECTED_LEN {
            let short: String = text.chars().take(MAX_UNEXPECTED_LEN).collect();
            Unexpected::Word(format!("{}...", short))
        } else {
            Unexpected::Word(text.to_string())
        }
    }
}

impl fmt::Display for Unexpected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unexpected::Word(word) => write!(f, "unexpected `{}`", word),
            Unexpected::Character(c) => write!(f, "unexpected character `{}`", c),
        }
    }
}

/// Failure at the furthest offset the parser reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte offset into the source
    pub offset: usize,
    /// 1-based line number
    pub line: usize,
    /// 0-based character position within the line
    pub column: usize,
    /// `None` at end of input
    pub unexpected: Option<Unexpected>,
    /// Labels of the elements tried at `offset`, in the order they were tried
    pub expected: Vec<String>,
}

impl SyntaxError {
    pub fn expects(&self, label: &str) -> bool {
        self.expected.iter().any(|e| e == label)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at line {}, position {}", self.line, self.column)?;
        if let Some(unexpected) = &self.unexpected {
            write!(f, ", {}", unexpected)?;
        }
        if let Some((last, rest)) = self.expected.split_last() {
            write!(f, ", expecting: ")?;
            if !rest.is_empty() {
                write!(f, "{} or ", rest.join(", "))?;
            }
            write!(f, "{}", last)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(expected: &[&str]) -> SyntaxError {
        SyntaxError {
            offset: 10,
            line: 1,
            column: 10,
            unexpected: Some(Unexpected::Character('"')),
            expected: expected.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_display_many_expected() {
        let err = error(&["r_uint", "r_int", "r_float", "r_str"]);
        assert_eq!(
            err.to_string(),
            "error at line 1, position 10, unexpected character `\"`, expecting: r_uint, r_int, r_float or r_str"
        );
    }

    #[test]
    fn test_display_single_expected() {
        let mut err = error(&["}"]);
        err.unexpected = None;
        assert_eq!(err.to_string(), "error at line 1, position 10, expecting: }");
    }

    #[test]
    fn test_long_word_is_shortened() {
        let word = Unexpected::word("abcdefghijklmnopqrstuvwxyz");
        assert_eq!(word.to_string(), "unexpected `abcdefghijklmnopqrst...`");
    }
}
