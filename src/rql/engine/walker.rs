//! Recursive descent over the element graph
//!
//! The walker tries elements at a byte offset and returns the node they produced, or `None`
//! when they did not match. Failed terminals are reported to [`Expecting`]. Whitespace is
//! skipped before every element, so node spans never start with whitespace.
//!
//! `Prio` is resolved with precedence climbing. Alternatives that do not start with `This`
//! are atoms; the longest matching atom is taken, earlier ones winning ties. Alternatives
//! shaped `This, ..., This` are infix operators, where earlier ones bind tighter and equal
//! ones associate left. Only entering a `Prio` counts towards the recursion limit; climbing
//! to the right operand of an operator does not.

use super::element::{Elem, ElementKind};
use super::error::ParseError;
use super::expecting::{Expected, Expecting};
use super::grammar::Grammar;
use super::node::Node;
use tracing::trace;

pub(crate) struct Walker<'g, 's> {
    grammar: &'g Grammar,
    input: &'s str,
    expecting: Expecting,
    prios: Vec<Elem>,
    depth: usize,
}

type Step = Result<Option<Node>, ParseError>;

impl<'g, 's> Walker<'g, 's> {
    pub(crate) fn new(grammar: &'g Grammar, input: &'s str) -> Self {
        Self {
            grammar,
            input,
            expecting: Expecting::new(),
            prios: Vec::new(),
            depth: 0,
        }
    }

    pub(crate) fn expecting_mut(&mut self) -> &mut Expecting {
        &mut self.expecting
    }

    pub(crate) fn into_expecting(self) -> Expecting {
        self.expecting
    }

    pub(crate) fn walk(&mut self, elem: &Elem, pos: usize) -> Step {
        let start = self.grammar.skip_whitespace(self.input, pos);
        match elem.kind() {
            ElementKind::Token(text) => Ok(self.literal(elem, start, text)),
            ElementKind::Tokens(list) => Ok(self.one_of(elem, start, list)),
            ElementKind::Keyword(word) => Ok(self.keyword(elem, start, word)),
            ElementKind::Regex(pattern) => match pattern.match_len(&self.input[start..]) {
                Some(len) => Ok(Some(leaf(elem, start, len))),
                None => Ok(self.fail(elem, start)),
            },
            ElementKind::Sequence(items) => self.sequence(elem, start, items),
            ElementKind::Choice(alternatives) => self.choice(elem, start, alternatives),
            ElementKind::Optional(inner) => {
                let children = self.walk(inner, start)?.into_iter().collect();
                Ok(Some(branch(elem, start, children)))
            }
            ElementKind::Repeat {
                elem: inner,
                min,
                max,
            } => self.repeat(elem, inner, start, *min, *max),
            ElementKind::List {
                elem: inner,
                delimiter,
                min,
                max,
                allow_trailing,
            } => self.list(elem, inner, delimiter, start, *min, *max, *allow_trailing),
            ElementKind::Prio(_) => self.prio(elem, start, 1),
            ElementKind::This => match self.prios.last().cloned() {
                Some(prio) => self.prio(&prio, start, 1),
                None => Ok(None),
            },
        }
    }

    fn one_of(&mut self, elem: &Elem, start: usize, list: &[String]) -> Option<Node> {
        let rest = &self.input[start..];
        match list.iter().find(|t| rest.starts_with(t.as_str())) {
            Some(text) => Some(leaf(elem, start, text.len())),
            None => self.fail(elem, start),
        }
    }

    fn keyword(&mut self, elem: &Elem, start: usize, word: &str) -> Option<Node> {
        let rest = &self.input[start..];
        if rest.starts_with(word) && self.grammar.keyword_len(rest) == word.len() {
            Some(leaf(elem, start, word.len()))
        } else {
            self.fail(elem, start)
        }
    }

    fn sequence(&mut self, elem: &Elem, start: usize, items: &[Elem]) -> Step {
        let mut cur = start;
        let mut children = Vec::with_capacity(items.len());
        for item in items {
            match self.walk(item, cur)? {
                Some(node) => {
                    if !node.is_empty() {
                        cur = node.end();
                    }
                    children.push(node);
                }
                None => return Ok(None),
            }
        }
        Ok(Some(branch(elem, start, children)))
    }

    fn choice(&mut self, elem: &Elem, start: usize, alternatives: &[Elem]) -> Step {
        for alt in alternatives {
            if let Some(node) = self.walk(alt, start)? {
                return Ok(Some(branch(elem, start, vec![node])));
            }
        }
        Ok(None)
    }

    fn repeat(
        &mut self,
        elem: &Elem,
        inner: &Elem,
        start: usize,
        min: usize,
        max: Option<usize>,
    ) -> Step {
        let mut cur = start;
        let mut children = Vec::new();
        while max.map_or(true, |max| children.len() < max) {
            match self.walk(inner, cur)? {
                Some(node) if !node.is_empty() => {
                    cur = node.end();
                    children.push(node);
                }
                _ => break,
            }
        }
        if children.len() < min {
            return Ok(None);
        }
        Ok(Some(branch(elem, start, children)))
    }

    fn literal(&mut self, elem: &Elem, start: usize, text: &str) -> Option<Node> {
        if self.input[start..].starts_with(text) {
            Some(leaf(elem, start, text.len()))
        } else {
            self.fail(elem, start)
        }
    }

    fn fail(&mut self, elem: &Elem, offset: usize) -> Option<Node> {
        self.expecting.update(offset, Expected::Element(elem.clone()));
        None
    }

    #[allow(clippy::too_many_arguments)]
    fn list(
        &mut self,
        elem: &Elem,
        inner: &Elem,
        delimiter: &Elem,
        start: usize,
        min: usize,
        max: Option<usize>,
        allow_trailing: bool,
    ) -> Step {
        let mut cur = start;
        let mut children = Vec::new();
        let mut items = 0;
        let mut delimiters = 0;
        loop {
            match self.walk(inner, cur)? {
                Some(node) => {
                    cur = node.end().max(cur);
                    children.push(node);
                    items += 1;
                }
                None => break,
            }
            if !allow_trailing && max == Some(items) {
                break;
            }
            match self.walk(delimiter, cur)? {
                Some(node) if !node.is_empty() => {
                    cur = node.end();
                    children.push(node);
                    delimiters += 1;
                }
                _ => break,
            }
            if max == Some(delimiters) {
                break;
            }
        }
        if items < min || (!allow_trailing && items > 0 && items == delimiters) {
            return Ok(None);
        }
        Ok(Some(branch(elem, start, children)))
    }

    fn prio(&mut self, prio: &Elem, pos: usize, min_bp: usize) -> Step {
        self.depth += 1;
        if self.depth > self.grammar.max_depth() {
            return Err(ParseError::RecursionLimit(self.grammar.max_depth()));
        }
        self.prios.push(prio.clone());
        let result = self.climb(prio, pos, min_bp);
        self.prios.pop();
        self.depth -= 1;
        result
    }

    fn climb(&mut self, prio: &Elem, pos: usize, min_bp: usize) -> Step {
        let start = self.grammar.skip_whitespace(self.input, pos);
        match self.atom(prio, start)? {
            Some(atom) => self.operators(prio, branch(prio, start, vec![atom]), min_bp),
            None => Ok(None),
        }
    }

    /// The longest matching atom of `prio`, earlier alternatives winning ties
    fn atom(&mut self, prio: &Elem, start: usize) -> Step {
        let ElementKind::Prio(alternatives) = prio.kind() else {
            return Ok(None);
        };
        let mut best: Option<Node> = None;
        for atom in alternatives.iter().filter(|alt| infix_parts(alt).is_none()) {
            if let Some(node) = self.walk(atom, start)? {
                if best.as_ref().map_or(true, |b| node.end() > b.end()) {
                    best = Some(node);
                }
            }
        }
        Ok(best)
    }

    fn operators(&mut self, prio: &Elem, mut lhs: Node, min_bp: usize) -> Step {
        let ElementKind::Prio(alternatives) = prio.kind() else {
            return Ok(Some(lhs));
        };
        let infixes: Vec<(&Elem, &[Elem])> = alternatives
            .iter()
            .filter_map(|alt| infix_parts(alt).map(|middle| (alt, middle)))
            .collect();

        'climb: loop {
            for (rank, &(alt, middle)) in infixes.iter().enumerate() {
                let bp = infixes.len() - rank;
                if bp < min_bp {
                    continue;
                }
                let mut cur = lhs.end();
                let mut mids = Vec::with_capacity(middle.len());
                let mut matched = true;
                for item in middle {
                    match self.walk(item, cur)? {
                        Some(node) => {
                            if !node.is_empty() {
                                cur = node.end();
                            }
                            mids.push(node);
                        }
                        None => {
                            matched = false;
                            break;
                        }
                    }
                }
                if !matched {
                    continue;
                }
                if let Some(rhs) = self.climb(prio, cur, bp + 1)? {
                    trace!(rule = %alt.label(), at = cur, "prio operator");
                    let span = lhs.start()..rhs.end();
                    let mut children = Vec::with_capacity(mids.len() + 2);
                    children.push(lhs);
                    children.extend(mids);
                    children.push(rhs);
                    let node = Node::new(alt.clone(), span.clone(), children);
                    lhs = Node::new(prio.clone(), span, vec![node]);
                    continue 'climb;
                }
            }
            break;
        }
        Ok(Some(lhs))
    }
}

/// The elements between the leading and trailing `This` of an infix alternative
fn infix_parts(alt: &Elem) -> Option<&[Elem]> {
    match alt.kind() {
        ElementKind::Sequence(items) if items.len() >= 3 => {
            let is_this = |e: &Elem| matches!(e.kind(), ElementKind::This);
            if is_this(&items[0]) && is_this(&items[items.len() - 1]) {
                Some(&items[1..items.len() - 1])
            } else {
                None
            }
        }
        _ => None,
    }
}

fn leaf(elem: &Elem, start: usize, len: usize) -> Node {
    Node::new(elem.clone(), start..start + len, Vec::new())
}

/// Node spanning from `start` to the end of its last non-empty child
fn branch(elem: &Elem, start: usize, children: Vec<Node>) -> Node {
    let end = children
        .iter()
        .rev()
        .find(|c| !c.is_empty())
        .map_or(start, Node::end);
    let start = children
        .iter()
        .find(|c| !c.is_empty())
        .map_or(start, Node::start);
    Node::new(elem.clone(), start..end, children)
}
