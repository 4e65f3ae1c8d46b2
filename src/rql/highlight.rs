//! Syntax highlighting for query text
//!
//! A single pass, line based tokenizer driven by the ordered rule table in [`rules`]. It
//! never consults the grammar: the output is meant for colouring editors and terminals,
//! not for deciding whether a query is valid. Block comments and strings switch the
//! tokenizer state; a string left open is closed at the end of its line, a block comment
//! carries over to the following lines.

pub mod rules;

pub use rules::{State, Style};

use serde::Serialize;
use std::ops::Range;

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub style: Style,
    pub range: Range<usize>,
}

impl Span {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range.clone()]
    }
}

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    initial: State,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in `state` instead of [`State::Start`]
    pub fn starting_in(state: State) -> Self {
        Self { initial: state }
    }

    /// Highlight `text`; span ranges are byte offsets into `text`, newlines are not covered
    pub fn highlight(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut state = self.initial;
        let mut offset = 0;
        for line in text.split('\n') {
            state = highlight_line(line, offset, state, &mut spans);
            offset += line.len() + 1;
        }
        spans
    }
}

/// Highlight one line (without its newline) starting in `state`, appending spans shifted
/// by `offset`. Returns the state for the next line.
pub fn highlight_line(line: &str, offset: usize, mut state: State, spans: &mut Vec<Span>) -> State {
    let mut pos = 0;
    loop {
        let found = rules::rules_for(state).iter().find_map(|rule| {
            rule.match_at(line, pos)
                // empty matches only count when they switch state
                .filter(|&end| end > pos || rule.next().is_some_and(|next| next != state))
                .map(|end| (rule, end))
        });
        match found {
            Some((rule, end)) => {
                if end > pos {
                    push(spans, rule.style_for(&line[pos..end]), offset + pos..offset + end);
                }
                if let Some(next) = rule.next() {
                    state = next;
                }
                pos = end;
            }
            None => {
                let Some(c) = line[pos..].chars().next() else {
                    break;
                };
                let end = pos + c.len_utf8();
                push(spans, state.default_style(), offset + pos..offset + end);
                pos = end;
            }
        }
    }
    state
}

fn push(spans: &mut Vec<Span>, style: Style, range: Range<usize>) {
    if let Some(last) = spans.last_mut() {
        if last.style == style && last.range.end == range.start {
            last.range.end = range.end;
            return;
        }
    }
    spans.push(Span { style, range });
}
