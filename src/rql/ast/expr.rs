//! Filter expressions
//!
//! A filter expression combines property comparisons with `&&` and `||`. Parentheses are
//! kept as [`Expr::Group`] so that rendering reproduces the structure that was parsed.
//!
//! Syntax:
//! <prop> <compare_opr> <literal>
//! <expr> "&&" <expr>
//! <expr> "||" <expr>
//! "(" <expr> ")"
//!
//! Examples:
//! - `status=="open"`
//! - `level>2 && (name~"web" || name~"db")`

use super::literal::Literal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CompareOp {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "!~")]
    NotMatch,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "~")]
    Match,
}

impl CompareOp {
    pub const ALL: [CompareOp; 8] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Le,
        CompareOp::Ge,
        CompareOp::NotMatch,
        CompareOp::Lt,
        CompareOp::Gt,
        CompareOp::Match,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::NotMatch => "!~",
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Match => "~",
        }
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompareOp::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| format!("unknown comparison operator `{}`", s))
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Comparison {
    pub prop: String,
    pub op: CompareOp,
    pub value: Literal,
}

impl Comparison {
    pub fn new(prop: impl Into<String>, op: CompareOp, value: Literal) -> Self {
        Self {
            prop: prop.into(),
            op,
            value,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prop, self.op, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Compare(Comparison),
    Group(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn and(lhs: Expr, rhs: Expr) -> Self {
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Expr, rhs: Expr) -> Self {
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn group(inner: Expr) -> Self {
        Expr::Group(Box::new(inner))
    }

    /// All comparisons, left to right
    pub fn comparisons(&self) -> Vec<&Comparison> {
        let mut found = Vec::new();
        self.collect_comparisons(&mut found);
        found
    }

    fn collect_comparisons<'a>(&'a self, found: &mut Vec<&'a Comparison>) {
        match self {
            Expr::Compare(comparison) => found.push(comparison),
            Expr::Group(inner) => inner.collect_comparisons(found),
            Expr::And(lhs, rhs) | Expr::Or(lhs, rhs) => {
                lhs.collect_comparisons(found);
                rhs.collect_comparisons(found);
            }
        }
    }
}

impl From<Comparison> for Expr {
    fn from(comparison: Comparison) -> Self {
        Expr::Compare(comparison)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Compare(comparison) => write!(f, "{}", comparison),
            Expr::Group(inner) => write!(f, "({})", inner),
            Expr::And(lhs, rhs) => write!(f, "{} && {}", lhs, rhs),
            Expr::Or(lhs, rhs) => write!(f, "{} || {}", lhs, rhs),
        }
    }
}
