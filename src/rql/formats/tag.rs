//! XML-like tag serialization of queries
//!
//! Node type → tag name, node label → text content, children → nested tags.
//!
//! ```text
//! <query>
//!   <selector>!123</selector>
//!   <selector>Host
//!     <prop>alerts#open
//!       <filter>
//!         <comparison>status==&quot;open&quot;</comparison>
//!       </filter>
//!     </prop>
//!   </selector>
//! </query>
//! ```

use super::registry::{FormatError, Formatter};
use crate::rql::ast::{Expr, Projection, PropSpec, Query, Selector};

struct TagSerializer {
    output: String,
    indent_level: usize,
}

impl TagSerializer {
    fn indent(&self) -> String {
        "  ".repeat(self.indent_level)
    }

    fn push_indent(&mut self, s: &str) {
        self.output.push_str(&self.indent());
        self.output.push_str(s);
    }

    fn tag_with_text(&mut self, tag: &str, text: &str) {
        self.push_indent(&format!("<{tag}>{}</{tag}>\n", escape_xml(text)));
    }

    /// `<tag>text`, children on their own lines, then `</tag>`
    fn element(&mut self, tag: &str, text: &str, children: impl FnOnce(&mut Self) -> bool) {
        self.push_indent(&format!("<{tag}>{}", escape_xml(text)));
        let mark = self.output.len();
        self.output.push('\n');
        self.indent_level += 1;
        let nested = children(self);
        self.indent_level -= 1;
        if nested {
            self.push_indent("");
        } else {
            self.output.truncate(mark);
        }
        self.output.push_str(&format!("</{tag}>\n"));
    }

    fn visit_selector(&mut self, selector: &Selector) {
        let mut label = String::new();
        if selector.negated {
            label.push('!');
        }
        label.push_str(&selector.target.to_string());
        match &selector.projection {
            None => self.tag_with_text("selector", &label),
            Some(Projection::All) => {
                label.push('*');
                self.tag_with_text("selector", &label);
            }
            Some(Projection::Props(props)) => self.element("selector", &label, |s| {
                for prop in props {
                    s.visit_prop(prop);
                }
                !props.is_empty()
            }),
        }
    }

    fn visit_prop(&mut self, prop: &PropSpec) {
        let mut label = prop.name.clone();
        if let Some(mark) = &prop.mark {
            label.push_str(&mark.to_string());
        }
        match &prop.filter {
            None => self.tag_with_text("prop", &label),
            Some(filter) => self.element("prop", &label, |s| {
                s.element("filter", "", |s| match &filter.expr {
                    Some(expr) => {
                        s.visit_expr(expr);
                        true
                    }
                    None => false,
                });
                true
            }),
        }
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Compare(comparison) => {
                self.tag_with_text("comparison", &comparison.to_string())
            }
            Expr::Group(inner) => self.element("group", "", |s| {
                s.visit_expr(inner);
                true
            }),
            Expr::And(lhs, rhs) => self.element("conjunction", "", |s| {
                s.visit_expr(lhs);
                s.visit_expr(rhs);
                true
            }),
            Expr::Or(lhs, rhs) => self.element("disjunction", "", |s| {
                s.visit_expr(lhs);
                s.visit_expr(rhs);
                true
            }),
        }
    }
}

/// Serialize a query to tag format
pub fn serialize_query(query: &Query) -> String {
    let mut serializer = TagSerializer {
        output: String::from("<query>\n"),
        indent_level: 1,
    };
    for selector in &query.selectors {
        serializer.visit_selector(selector);
    }
    serializer.output.push_str("</query>");
    serializer.output
}

/// Escape XML special characters
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

pub struct TagFormatter;

impl Formatter for TagFormatter {
    fn name(&self) -> &str {
        "tag"
    }

    fn serialize(&self, query: &Query) -> Result<String, FormatError> {
        Ok(serialize_query(query))
    }

    fn description(&self) -> &str {
        "XML-like tags mirroring the AST"
    }
}
