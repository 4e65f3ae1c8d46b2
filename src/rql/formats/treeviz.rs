//! Treeviz formatter for queries
//!
//! One line per node, nesting drawn with connectors, so a query can be scanned top to
//! bottom:
//!
//! <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example:
//!
//! ```text
//! ⧉ 2 selectors
//! ├─ § !123
//! └─ § Host
//!   └─ • alerts#open
//!     └─ ∧ &&
//!       ├─ ◦ status=="open"
//!       └─ ◦ level>2
//! ```
//!
//! Icons
//!     Query: ⧉
//!     Selector: §
//!     Prop: •
//!     Empty filter: ∅
//!     Group: ◌
//!     Conjunction: ∧
//!     Disjunction: ∨
//!     Comparison: ◦

use super::registry::{FormatError, Formatter};
use crate::rql::ast::{Expr, Projection, PropSpec, Query, Selector};

/// Node shape shared by every level of the tree
struct Snapshot {
    node_type: &'static str,
    label: String,
    children: Vec<Snapshot>,
}

impl Snapshot {
    fn leaf(node_type: &'static str, label: impl Into<String>) -> Self {
        Self {
            node_type,
            label: label.into(),
            children: Vec::new(),
        }
    }

    fn from_query(query: &Query) -> Self {
        let count = query.selectors.len();
        Self {
            node_type: "Query",
            label: format!("{} selector{}", count, if count == 1 { "" } else { "s" }),
            children: query.selectors.iter().map(Self::from_selector).collect(),
        }
    }

    fn from_selector(selector: &Selector) -> Self {
        let mut label = String::new();
        if selector.negated {
            label.push('!');
        }
        label.push_str(&selector.target.to_string());
        let children = match &selector.projection {
            Some(Projection::All) => {
                label.push('*');
                Vec::new()
            }
            Some(Projection::Props(props)) => props.iter().map(Self::from_prop).collect(),
            None => Vec::new(),
        };
        Self {
            node_type: "Selector",
            label,
            children,
        }
    }

    fn from_prop(prop: &PropSpec) -> Self {
        let mut label = prop.name.clone();
        if let Some(mark) = &prop.mark {
            label.push_str(&mark.to_string());
        }
        let children = match &prop.filter {
            Some(filter) => match &filter.expr {
                Some(expr) => vec![Self::from_expr(expr)],
                None => vec![Self::leaf("Empty", "{}")],
            },
            None => Vec::new(),
        };
        Self {
            node_type: "Prop",
            label,
            children,
        }
    }

    fn from_expr(expr: &Expr) -> Self {
        match expr {
            Expr::Compare(comparison) => Self::leaf("Comparison", comparison.to_string()),
            Expr::Group(inner) => Self {
                node_type: "Group",
                label: "( )".into(),
                children: vec![Self::from_expr(inner)],
            },
            Expr::And(lhs, rhs) => Self {
                node_type: "Conjunction",
                label: "&&".into(),
                children: vec![Self::from_expr(lhs), Self::from_expr(rhs)],
            },
            Expr::Or(lhs, rhs) => Self {
                node_type: "Disjunction",
                label: "||".into(),
                children: vec![Self::from_expr(lhs), Self::from_expr(rhs)],
            },
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Get the icon for a node type
fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Query" => "⧉",
        "Selector" => "§",
        "Prop" => "•",
        "Empty" => "∅",
        "Group" => "◌",
        "Conjunction" => "∧",
        "Disjunction" => "∨",
        "Comparison" => "◦",
        _ => "○",
    }
}

fn format_snapshot(
    output: &mut String,
    snapshot: &Snapshot,
    prefix: &str,
    child_index: usize,
    child_count: usize,
) {
    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(snapshot.node_type),
        truncate(&snapshot.label, 30)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(output, child, &child_prefix, i, child_count);
    }
}

/// Render a query as a treeviz outline
pub fn to_treeviz_str(query: &Query) -> String {
    let snapshot = Snapshot::from_query(query);
    let mut output = format!("{} {}\n", get_icon(snapshot.node_type), snapshot.label);
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(&mut output, child, "", i, child_count);
    }
    output
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, query: &Query) -> Result<String, FormatError> {
        Ok(to_treeviz_str(query))
    }

    fn description(&self) -> &str {
        "Visual tree, one line per node"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rql::parsing::parse;

    #[test]
    fn test_single_selector() {
        let query = parse("Foo*").unwrap();
        assert_eq!(to_treeviz_str(&query), "⧉ 1 selector\n└─ § Foo*\n");
    }

    #[test]
    fn test_nested_filter() {
        let query = parse("!1,Foo(a, b.c{x==1 && (y>2 || z<3)}, d{})").unwrap();
        let expected = "\
⧉ 2 selectors
├─ § !1
└─ § Foo
  ├─ • a
  ├─ • b.c
  │ └─ ∧ &&
  │   ├─ ◦ x==1
  │   └─ ◌ ( )
  │     └─ ∨ ||
  │       ├─ ◦ y>2
  │       └─ ◦ z<3
  └─ • d
    └─ ∅ {}
";
        assert_eq!(to_treeviz_str(&query), expected);
    }

    #[test]
    fn test_truncates_long_labels() {
        let query = parse(r#"A(p{name=="a very long string value that goes on"})"#).unwrap();
        let output = to_treeviz_str(&query);
        assert!(output.contains("◦ name==\"a very long string valu..."));
    }
}
