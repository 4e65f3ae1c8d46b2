//! JSON serialization of the query AST

use super::registry::{FormatError, Formatter};
use crate::rql::ast::Query;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, query: &Query) -> Result<String, FormatError> {
        serde_json::to_string_pretty(query)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Query AST as pretty-printed JSON"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rql::parsing::parse;
    use serde_json::{json, Value};

    #[test]
    fn test_structure() {
        let query = parse("!1,Foo(a#i{x==\"v\"})").unwrap();
        let text = JsonFormatter.serialize(&query).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "selectors": [
                    {"negated": true, "target": {"elem_id": 1}, "projection": null},
                    {
                        "negated": false,
                        "target": {"kind": "Foo"},
                        "projection": {"props": [{
                            "name": "a",
                            "mark": {"index": "i"},
                            "filter": {"expr": {"compare": {
                                "prop": "x",
                                "op": "==",
                                "value": {"kind": "str", "raw": "\"v\""}
                            }}}
                        }]}
                    }
                ]
            })
        );
    }

    #[test]
    fn test_nested_expressions() {
        let query = parse("A(p.q{(x==1) && y<2}, r{})").unwrap();
        let text = JsonFormatter.serialize(&query).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        let props = &value["selectors"][0]["projection"]["props"];
        assert_eq!(props[0]["mark"], json!({"rename": "q"}));
        assert_eq!(
            props[0]["filter"]["expr"],
            json!({"and": [
                {"group": {"compare": {
                    "prop": "x",
                    "op": "==",
                    "value": {"kind": "uint", "raw": "1"}
                }}},
                {"compare": {
                    "prop": "y",
                    "op": "<",
                    "value": {"kind": "uint", "raw": "2"}
                }}
            ]})
        );
        assert_eq!(props[1]["filter"], json!({"expr": null}));
    }
}
