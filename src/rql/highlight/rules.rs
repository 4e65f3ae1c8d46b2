//! Highlighting rule table
//!
//! Rules are grouped per tokenizer state and tried in declaration order; the first rule that
//! matches at the current position wins. A rule may require (or forbid) a pattern directly
//! after its match, and may switch the tokenizer to another state.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Tokenizer state, carried from one line to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    #[default]
    Start,
    Comment,
    StringDouble,
    StringSingle,
}

impl State {
    /// Style for characters no rule matches
    pub fn default_style(&self) -> Style {
        match self {
            State::Start => Style::Text,
            State::Comment => Style::Comment,
            State::StringDouble => Style::StringDouble,
            State::StringSingle => Style::StringSingle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Style {
    #[serde(rename = "comment")]
    Comment,
    #[serde(rename = "string.double.start")]
    StringDoubleStart,
    #[serde(rename = "string.double")]
    StringDouble,
    #[serde(rename = "string.double.end")]
    StringDoubleEnd,
    #[serde(rename = "string.single.start")]
    StringSingleStart,
    #[serde(rename = "string.single")]
    StringSingle,
    #[serde(rename = "string.single.end")]
    StringSingleEnd,
    #[serde(rename = "constant.numeric")]
    Numeric,
    #[serde(rename = "keyword")]
    Keyword,
    #[serde(rename = "keyword.control")]
    KeywordControl,
    #[serde(rename = "keyword.operator")]
    KeywordOperator,
    #[serde(rename = "storage.type")]
    StorageType,
    #[serde(rename = "storage.modifier")]
    StorageModifier,
    #[serde(rename = "constant.language")]
    ConstantLanguage,
    #[serde(rename = "variable.language")]
    VariableLanguage,
    #[serde(rename = "support.function.root")]
    RootFunction,
    #[serde(rename = "support.function.dot")]
    DotFunction,
    #[serde(rename = "identifier")]
    Identifier,
    #[serde(rename = "punctuation.operator")]
    Punctuation,
    #[serde(rename = "paren.lparen")]
    LParen,
    #[serde(rename = "paren.rparen")]
    RParen,
    #[serde(rename = "text")]
    Text,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Comment => "comment",
            Style::StringDoubleStart => "string.double.start",
            Style::StringDouble => "string.double",
            Style::StringDoubleEnd => "string.double.end",
            Style::StringSingleStart => "string.single.start",
            Style::StringSingle => "string.single",
            Style::StringSingleEnd => "string.single.end",
            Style::Numeric => "constant.numeric",
            Style::Keyword => "keyword",
            Style::KeywordControl => "keyword.control",
            Style::KeywordOperator => "keyword.operator",
            Style::StorageType => "storage.type",
            Style::StorageModifier => "storage.modifier",
            Style::ConstantLanguage => "constant.language",
            Style::VariableLanguage => "variable.language",
            Style::RootFunction => "support.function.root",
            Style::DotFunction => "support.function.dot",
            Style::Identifier => "identifier",
            Style::Punctuation => "punctuation.operator",
            Style::LParen => "paren.lparen",
            Style::RParen => "paren.rparen",
            Style::Text => "text",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const KEYWORD_CONTROLS: &[&str] = &[
    "break", "case", "continue", "default", "do", "else", "for", "goto", "if", "_Pragma",
    "return", "switch", "while", "catch", "operator", "try", "throw", "using",
];

const STORAGE_TYPES: &[&str] = &[
    "asm", "__asm__", "auto", "bool", "_Bool", "char", "_Complex", "double", "enum", "float",
    "_Imaginary", "int", "long", "short", "signed", "struct", "typedef", "union", "unsigned",
    "void", "class", "wchar_t", "template", "char16_t", "char32_t",
];

const STORAGE_MODIFIERS: &[&str] = &[
    "const", "extern", "register", "restrict", "static", "volatile", "inline", "private",
    "protected", "public", "friend", "explicit", "virtual", "export", "mutable", "typename",
    "constexpr", "new", "delete", "alignas", "alignof", "decltype", "noexcept", "thread_local",
];

const KEYWORD_OPERATORS: &[&str] = &[
    "and", "and_eq", "bitand", "bitor", "compl", "not", "not_eq", "or", "or_eq", "typeid", "xor",
    "xor_eq", "const_cast", "dynamic_cast", "reinterpret_cast", "static_cast", "sizeof",
    "namespace",
];

const CONSTANTS: &[&str] = &["true", "false", "nil"];

/// Style of an identifier
pub fn keyword_style(word: &str) -> Style {
    let tables: [(&[&str], Style); 5] = [
        (KEYWORD_CONTROLS, Style::KeywordControl),
        (STORAGE_TYPES, Style::StorageType),
        (STORAGE_MODIFIERS, Style::StorageModifier),
        (KEYWORD_OPERATORS, Style::KeywordOperator),
        (CONSTANTS, Style::ConstantLanguage),
    ];
    tables
        .iter()
        .find(|(words, _)| words.contains(&word))
        .map_or(Style::Identifier, |(_, style)| *style)
}

/// How a rule styles its match
#[derive(Debug, Clone, Copy)]
pub enum RuleStyle {
    Fixed(Style),
    /// Look the matched word up in the keyword tables
    Keywords,
}

/// Declarative form of a rule, compiled on first use
struct RuleDef {
    pattern: &'static str,
    style: RuleStyle,
    followed_by: Option<&'static str>,
    not_followed_by: Option<&'static str>,
    next: Option<State>,
}

const fn rule(pattern: &'static str, style: Style) -> RuleDef {
    RuleDef {
        pattern,
        style: RuleStyle::Fixed(style),
        followed_by: None,
        not_followed_by: None,
        next: None,
    }
}

const fn goto(pattern: &'static str, style: Style, next: State) -> RuleDef {
    RuleDef {
        pattern,
        style: RuleStyle::Fixed(style),
        followed_by: None,
        not_followed_by: None,
        next: Some(next),
    }
}

const START_RULES: &[RuleDef] = &[
    rule(r"//.*$", Style::Comment),
    goto(r"/\*", Style::Comment, State::Comment),
    goto("\"", Style::StringDoubleStart, State::StringDouble),
    goto("'", Style::StringSingleStart, State::StringSingle),
    rule(
        r"0[xX][0-9a-fA-F]+(?:L|l|UL|ul|u|U|F|f|ll|LL|ull|ULL)?\b",
        Style::Numeric,
    ),
    rule(
        r"[+-]?\d+(?:(?:\.\d*)?(?:[eE][+-]?\d+)?)?(?:L|l|UL|ul|u|U|F|f|ll|LL|ull|ULL)?\b",
        Style::Numeric,
    ),
    rule(r"#\s*(?:scope|use|endif|if|ifdef|else|elif|ifndef)\b", Style::Keyword),
    RuleDef {
        pattern: r"(?:name|age|time)",
        style: RuleStyle::Fixed(Style::VariableLanguage),
        followed_by: Some(r"\s*:"),
        not_followed_by: None,
        next: None,
    },
    RuleDef {
        pattern: r"\b(?:new_user|new_procedure|new_node|counters|refs|now)",
        style: RuleStyle::Fixed(Style::RootFunction),
        followed_by: Some(r"\s*\("),
        not_followed_by: None,
        next: None,
    },
    RuleDef {
        pattern: r"\.\s*(?:map|filter|id|len)",
        style: RuleStyle::Fixed(Style::DotFunction),
        followed_by: Some(r"\s*\("),
        not_followed_by: None,
        next: None,
    },
    RuleDef {
        pattern: r"\.\s*[A-Za-z_][A-Za-z_0-9]*\b",
        style: RuleStyle::Fixed(Style::VariableLanguage),
        followed_by: None,
        not_followed_by: Some(r"\s*\("),
        next: None,
    },
    RuleDef {
        pattern: r"[a-zA-Z_$][a-zA-Z0-9_$]*",
        style: RuleStyle::Keywords,
        followed_by: None,
        not_followed_by: None,
        next: None,
    },
    rule(r"&&|\|\||\?:|[*%/+\-&\^|~!<>=]=?", Style::KeywordOperator),
    rule(r"\?|:|,|;|\.", Style::Punctuation),
    rule(r"[\[({]", Style::LParen),
    rule(r"[\])}]", Style::RParen),
    rule(r"\s+", Style::Text),
];

const COMMENT_RULES: &[RuleDef] = &[goto(r"\*/", Style::Comment, State::Start)];

const STRING_DOUBLE_RULES: &[RuleDef] = &[goto("\"|$", Style::StringDoubleEnd, State::Start)];

const STRING_SINGLE_RULES: &[RuleDef] = &[goto("'|$", Style::StringSingleEnd, State::Start)];

/// A compiled rule
#[derive(Debug)]
pub struct Rule {
    pattern: Regex,
    style: RuleStyle,
    followed_by: Option<Regex>,
    not_followed_by: Option<Regex>,
    next: Option<State>,
}

impl Rule {
    fn compile(def: &RuleDef) -> Self {
        let anchored = |p: &str| {
            Regex::new(&format!("^(?:{})", p)).expect("highlight rule patterns are valid")
        };
        Self {
            pattern: Regex::new(def.pattern).expect("highlight rule patterns are valid"),
            style: def.style,
            followed_by: def.followed_by.map(anchored),
            not_followed_by: def.not_followed_by.map(anchored),
            next: def.next,
        }
    }

    /// End of the match starting exactly at `pos`, if any
    pub fn match_at(&self, line: &str, pos: usize) -> Option<usize> {
        let found = self.pattern.find_at(line, pos)?;
        if found.start() != pos {
            return None;
        }
        let rest = &line[found.end()..];
        if let Some(follow) = &self.followed_by {
            if !follow.is_match(rest) {
                return None;
            }
        }
        if let Some(follow) = &self.not_followed_by {
            if follow.is_match(rest) {
                return None;
            }
        }
        Some(found.end())
    }

    pub fn style_for(&self, text: &str) -> Style {
        match self.style {
            RuleStyle::Fixed(style) => style,
            RuleStyle::Keywords => keyword_style(text),
        }
    }

    pub fn next(&self) -> Option<State> {
        self.next
    }
}

struct RuleTable {
    start: Vec<Rule>,
    comment: Vec<Rule>,
    string_double: Vec<Rule>,
    string_single: Vec<Rule>,
}

static RULES: Lazy<RuleTable> = Lazy::new(|| RuleTable {
    start: START_RULES.iter().map(Rule::compile).collect(),
    comment: COMMENT_RULES.iter().map(Rule::compile).collect(),
    string_double: STRING_DOUBLE_RULES.iter().map(Rule::compile).collect(),
    string_single: STRING_SINGLE_RULES.iter().map(Rule::compile).collect(),
});

/// Rules of `state`, in the order they are tried
pub fn rules_for(state: State) -> &'static [Rule] {
    match state {
        State::Start => &RULES.start,
        State::Comment => &RULES.comment,
        State::StringDouble => &RULES.string_double,
        State::StringSingle => &RULES.string_single,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_styles() {
        assert_eq!(keyword_style("true"), Style::ConstantLanguage);
        assert_eq!(keyword_style("while"), Style::KeywordControl);
        assert_eq!(keyword_style("Host"), Style::Identifier);
    }

    #[test]
    fn test_all_rules_compile() {
        for state in [
            State::Start,
            State::Comment,
            State::StringDouble,
            State::StringSingle,
        ] {
            assert!(!rules_for(state).is_empty());
        }
    }

    #[test]
    fn test_match_only_at_position() {
        let rule = &rules_for(State::Start)[5];
        assert_eq!(rule.match_at("x==42", 3), Some(5));
        assert_eq!(rule.match_at("x==42", 0), None);
    }

    #[test]
    fn test_follow_conditions() {
        let dot_function = &rules_for(State::Start)[9];
        assert_eq!(dot_function.match_at("a.map(x)", 1), Some(5));
        assert_eq!(dot_function.match_at("a.map", 1), None);
        let dot_variable = &rules_for(State::Start)[10];
        assert_eq!(dot_variable.match_at("a.alias", 1), Some(7));
        assert_eq!(dot_variable.match_at("a.alias (", 1), None);
    }
}
