//! Lexing for the reference parser
//!
//! Turns query text into `(Token, byte range)` pairs. Whitespace is skipped; any character
//! that starts no token stops lexing with a [`LexError`].

pub mod tokens;

pub use tokens::Token;

use logos::Logos;
use std::ops::Range;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character at offset {offset}")]
pub struct LexError {
    pub offset: usize,
}

/// Tokenize `source`, keeping the byte range of every token
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(LexError {
                    offset: lexer.span().start,
                })
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_spans() {
        let tokens = tokenize("Foo( bar )").unwrap();
        let spans: Vec<Range<usize>> = tokens.into_iter().map(|(_, span)| span).collect();
        assert_eq!(spans, vec![0..3, 3..4, 5..8, 9..10]);
    }

    #[test]
    fn test_tokenize_error_offset() {
        assert_eq!(tokenize("Foo(a & b)"), Err(LexError { offset: 6 }));
    }
}
