//! Queries and selectors
//!
//! A query is a non-empty list of selectors. Each selector targets an element id or a kind
//! and optionally projects properties:
//!
//! Syntax:
//! <selector> ("," <selector>)*
//! "!"? (<elem_id> | <kind>) ("*" | "(" <prop_spec> ("," <prop_spec>)* ")")?
//! <prop> ("#" <mark> | "." <mark>)? ("{" <expr>? "}")?
//!
//! Examples:
//! - `!123`
//! - `Host(name, alerts#open{status=="open"}),Message*`
//!
//! Negation and marks are carried as written; they have no meaning inside the parser.

use super::expr::Expr;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    pub selectors: Vec<Selector>,
}

impl Query {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, selector) in self.selectors.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", selector)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector {
    pub negated: bool,
    pub target: Target,
    pub projection: Option<Projection>,
}

impl Selector {
    pub fn new(target: Target) -> Self {
        Self {
            negated: false,
            target,
            projection: None,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "!")?;
        }
        write!(f, "{}", self.target)?;
        if let Some(projection) = &self.projection {
            write!(f, "{}", projection)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    ElemId(u64),
    Kind(String),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::ElemId(id) => write!(f, "{}", id),
            Target::Kind(kind) => write!(f, "{}", kind),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// `*`
    All,
    Props(Vec<PropSpec>),
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::All => write!(f, "*"),
            Projection::Props(props) => {
                write!(f, "(")?;
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", prop)?;
                }
                write!(f, ")")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropSpec {
    pub name: String,
    pub mark: Option<Mark>,
    pub filter: Option<Filter>,
}

impl PropSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mark: None,
            filter: None,
        }
    }

    pub fn with_mark(mut self, mark: Mark) -> Self {
        self.mark = Some(mark);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }
}

impl fmt::Display for PropSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(mark) = &self.mark {
            write!(f, "{}", mark)?;
        }
        if let Some(filter) = &self.filter {
            write!(f, "{}", filter)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// `#name`
    Index(String),
    /// `.name`
    Rename(String),
}

impl Mark {
    pub fn name(&self) -> &str {
        match self {
            Mark::Index(name) | Mark::Rename(name) => name,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::Index(name) => write!(f, "#{}", name),
            Mark::Rename(name) => write!(f, ".{}", name),
        }
    }
}

/// `{...}`, possibly empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub expr: Option<Expr>,
}

impl Filter {
    pub fn new(expr: Expr) -> Self {
        Self { expr: Some(expr) }
    }

    pub fn empty() -> Self {
        Self { expr: None }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expr {
            Some(expr) => write!(f, "{{{}}}", expr),
            None => write!(f, "{{}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::expr::{CompareOp, Comparison};
    use super::super::literal::Literal;
    use super::*;

    #[test]
    fn test_render_query() {
        let open = Comparison::new("status", CompareOp::Eq, Literal::string("open").unwrap());
        let query = Query::new(vec![
            Selector::new(Target::ElemId(123)).negated(),
            Selector::new(Target::Kind("Host".into())).with_projection(Projection::Props(vec![
                PropSpec::new("name"),
                PropSpec::new("alerts")
                    .with_mark(Mark::Index("open".into()))
                    .with_filter(Filter::new(open.into())),
                PropSpec::new("names").with_filter(Filter::empty()),
            ])),
            Selector::new(Target::Kind("Message".into())).with_projection(Projection::All),
        ]);
        assert_eq!(
            query.to_string(),
            "!123,Host(name, alerts#open{status==\"open\"}, names{}),Message*"
        );
    }

    #[test]
    fn test_mark_name() {
        assert_eq!(Mark::Rename("alias".into()).name(), "alias");
        assert_eq!(Mark::Rename("alias".into()).to_string(), ".alias");
    }
}
