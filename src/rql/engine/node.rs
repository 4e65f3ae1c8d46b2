//! Parse tree
//!
//! Each [`Node`] records the element that produced it and the byte range it covers. Nodes
//! for combinators are kept even when their element is unnamed, so the tree mirrors the
//! grammar one to one. Consumers usually look only at named nodes, see
//! [`Node::named_descendants`].

use super::element::Elem;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Clone)]
pub struct Node {
    element: Elem,
    span: Range<usize>,
    children: Vec<Node>,
}

impl Node {
    pub fn new(element: Elem, span: Range<usize>, children: Vec<Node>) -> Self {
        Self {
            element,
            span,
            children,
        }
    }

    pub fn element(&self) -> &Elem {
        &self.element
    }

    pub fn name(&self) -> Option<&str> {
        self.element.name()
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }

    /// First node named `name`, depth first, including `self`
    pub fn find_named(&self, name: &str) -> Option<&Node> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_named(name))
    }

    /// Named nodes below `self` that are not nested inside another named node
    pub fn named_descendants(&self) -> Vec<&Node> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect_named(&mut found);
        }
        found
    }

    fn collect_named<'a>(&'a self, found: &mut Vec<&'a Node>) {
        if self.name().is_some() {
            found.push(self);
        } else {
            for child in &self.children {
                child.collect_named(found);
            }
        }
    }
}

/// Result of a successful parse: the root node together with the source it spans
#[derive(Debug, Clone)]
pub struct ParseTree<'s> {
    source: &'s str,
    root: Node,
}

impl<'s> ParseTree<'s> {
    pub fn new(source: &'s str, root: Node) -> Self {
        Self { source, root }
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn text(&self, node: &Node) -> &'s str {
        node.text(self.source)
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
        let children = node.named_descendants();
        let indent = "  ".repeat(depth);
        let label = node.element().label();
        if children.is_empty() {
            writeln!(
                f,
                "{}{} {:?} @{}..{}",
                indent,
                label,
                self.text(node),
                node.start(),
                node.end()
            )?;
        } else {
            writeln!(f, "{}{} @{}..{}", indent, label, node.start(), node.end())?;
        }
        for child in children {
            self.write_outline(f, child, depth + 1)?;
        }
        Ok(())
    }
}

/// Indented outline of the named nodes, one per line
impl fmt::Display for ParseTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, &self.root, 0)
    }
}
