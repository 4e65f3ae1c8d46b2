//! Token definitions for RQL
//!
//! The tokens mirror the lexical atoms of the RQL grammar. Operators are matched longest
//! first, so `!=` and `!~` are never split into `!` and a second token.
use crate::rql::ast::CompareOp;
use logos::Logos;
use std::fmt;

/// All tokens of the RQL language
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)]
#[logos(skip r"[ \t\n\x0B\x0C\r]+")]
pub enum Token {
    // Punctuation
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("#")]
    Hash,
    #[token("*")]
    Star,
    #[token("!")]
    Bang,

    // Boolean operators
    #[token("&&")]
    And,
    #[token("||")]
    Or,

    // Comparison operators
    #[token("==", |_| CompareOp::Eq)]
    #[token("!=", |_| CompareOp::Ne)]
    #[token("<=", |_| CompareOp::Le)]
    #[token(">=", |_| CompareOp::Ge)]
    #[token("!~", |_| CompareOp::NotMatch)]
    #[token("<", |_| CompareOp::Lt)]
    #[token(">", |_| CompareOp::Gt)]
    #[token("~", |_| CompareOp::Match)]
    Compare(CompareOp),

    // Literals
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Uint(String),
    #[regex(r"[-+][0-9]+", |lex| lex.slice().to_string())]
    Int(String),
    #[regex(r"[-+]?[0-9]*\.[0-9]+", |lex| lex.slice().to_string())]
    Float(String),
    #[regex(r#"("[^"]*")+"#, |lex| lex.slice().to_string())]
    Str(String),
    #[regex(r"[A-Za-z][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Name(String),
}

impl Token {
    /// Check if this token carries a literal value
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Token::Uint(_) | Token::Int(_) | Token::Float(_) | Token::Str(_)
        )
    }

    /// Check if this token is an operator
    pub fn is_operator(&self) -> bool {
        matches!(self, Token::And | Token::Or | Token::Compare(_) | Token::Bang)
    }
}

/// Tokens display as the grammar names them: literals by their rule, punctuation verbatim
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::Comma => ",",
            Token::Dot => ".",
            Token::Hash => "#",
            Token::Star => "*",
            Token::Bang => "!",
            Token::And => "&&",
            Token::Or => "||",
            Token::Compare(_) => "compare_opr",
            Token::Uint(_) => "r_uint",
            Token::Int(_) => "r_int",
            Token::Float(_) => "r_float",
            Token::Str(_) => "r_str",
            Token::Name(_) => "r_name",
        };
        write!(f, "{}", text)
    }
}
