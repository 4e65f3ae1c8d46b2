//! Generic grammar engine
//!
//! Grammars are described as a tree of combinator elements and parsed by recursive descent.
//! A successful parse yields a [`ParseTree`] whose nodes are labelled with the element that
//! produced them. A failed parse reports the furthest offset reached and the elements that
//! were expected there.
//!
//! Element kinds:
//!
//! - terminals: `token`, `tokens`, `keyword`, `regex`
//! - combinators: `sequence`, `choice`, `optional`, `repeat`, `list`
//! - recursion: `prio` with `this`, where `This` re-enters the innermost `Prio`
//!
//! Grammars are immutable after construction and can be shared between threads.

pub mod element;
pub mod error;
pub mod expecting;
pub mod grammar;
pub mod node;
mod walker;

pub use element::{
    choice, keyword, list, named, optional, prio, regex, regex_guarded, repeat, sequence, this,
    token, tokens, Elem, Element, ElementKind, Pattern,
};
pub use error::{GrammarError, ParseError, SyntaxError, Unexpected};
pub use expecting::Expected;
pub use grammar::Grammar;
pub use node::{Node, ParseTree};
