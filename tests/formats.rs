//! Rendered output of the registered formats

use rql::rql::formats::FormatRegistry;
use rql::rql::parsing::parse;

const QUERY: &str = r#"!12,Host(name, alerts#open{status=="open" && (level>=2 || tag~"db")}, up{}),Message*"#;

fn render(format: &str) -> String {
    let query = parse(QUERY).unwrap();
    FormatRegistry::with_defaults()
        .serialize(&query, format)
        .unwrap()
        .trim_end()
        .to_string()
}

#[test]
fn test_query_format() {
    insta::assert_snapshot!(render("query"), @r###"!12,Host(name, alerts#open{status=="open" && (level>=2 || tag~"db")}, up{}),Message*"###);
}

#[test]
fn test_treeviz_format() {
    insta::assert_snapshot!(render("treeviz"), @r###"
    ⧉ 3 selectors
    ├─ § !12
    ├─ § Host
    │ ├─ • name
    │ ├─ • alerts#open
    │ │ └─ ∧ &&
    │ │   ├─ ◦ status=="open"
    │ │   └─ ◌ ( )
    │ │     └─ ∨ ||
    │ │       ├─ ◦ level>=2
    │ │       └─ ◦ tag~"db"
    │ └─ • up
    │   └─ ∅ {}
    └─ § Message*
    "###);
}

#[test]
fn test_tag_format() {
    insta::assert_snapshot!(render("tag"), @r###"
    <query>
      <selector>!12</selector>
      <selector>Host
        <prop>name</prop>
        <prop>alerts#open
          <filter>
            <conjunction>
              <comparison>status==&quot;open&quot;</comparison>
              <group>
                <disjunction>
                  <comparison>level&gt;=2</comparison>
                  <comparison>tag~&quot;db&quot;</comparison>
                </disjunction>
              </group>
            </conjunction>
          </filter>
        </prop>
        <prop>up
          <filter></filter>
        </prop>
      </selector>
      <selector>Message*</selector>
    </query>
    "###);
}

#[test]
fn test_json_format() {
    let query = parse("!1,Foo*").unwrap();
    let output = FormatRegistry::with_defaults()
        .serialize(&query, "json")
        .unwrap();
    insta::assert_snapshot!(output, @r###"
    {
      "selectors": [
        {
          "negated": true,
          "target": {
            "elem_id": 1
          },
          "projection": null
        },
        {
          "negated": false,
          "target": {
            "kind": "Foo"
          },
          "projection": "all"
        }
      ]
    }
    "###);
}

#[test]
fn test_every_format_renders() {
    let registry = FormatRegistry::with_defaults();
    let query = parse(QUERY).unwrap();
    for name in registry.list_formats() {
        let output = registry.serialize(&query, &name).unwrap();
        assert!(!output.trim().is_empty(), "{} rendered nothing", name);
    }
}

#[test]
fn test_query_format_reparses() {
    let query = parse(QUERY).unwrap();
    assert_eq!(parse(&render("query")).unwrap(), query);
}
