//! Literal values
//!
//! Literals keep the text they were written with, so a float written as `1` or a string
//! split into `"a""b"` renders back unchanged. The accessors interpret that text.
//!
//! Syntax:
//! - uint: `42`
//! - int: `-3`, `+7`
//! - float: `3.5`, `.5`, `-0.25`
//! - str: `"open"`, `"a""b"` (adjacent segments are concatenated, there is no escaping)

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    Uint,
    Int,
    Float,
    Str,
}

impl LiteralKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LiteralKind::Uint => "uint",
            LiteralKind::Int => "int",
            LiteralKind::Float => "float",
            LiteralKind::Str => "str",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub raw: String,
}

impl Literal {
    pub fn new(kind: LiteralKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }

    pub fn uint(value: u64) -> Self {
        Self::new(LiteralKind::Uint, value.to_string())
    }

    pub fn int(value: i64) -> Self {
        Self::new(LiteralKind::Int, value.to_string())
    }

    /// Quoted string literal; `None` when `value` contains a double quote
    pub fn string(value: &str) -> Option<Self> {
        if value.contains('"') {
            return None;
        }
        Some(Self::new(LiteralKind::Str, format!("\"{}\"", value)))
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.kind {
            LiteralKind::Uint => self.raw.parse().ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.kind {
            LiteralKind::Uint | LiteralKind::Int => self.raw.parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.kind {
            LiteralKind::Str => None,
            _ => self.raw.parse().ok(),
        }
    }

    /// Contents of all quoted segments, joined
    pub fn as_string(&self) -> Option<String> {
        match self.kind {
            LiteralKind::Str => Some(
                self.raw
                    .split('"')
                    .skip(1)
                    .step_by(2)
                    .collect::<Vec<_>>()
                    .concat(),
            ),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
