//! YAML output for redacted documents.
//!
//! Generated lookup expressions are full of `{`, `'` and `:` characters, so
//! every string is written quoted rather than trusting plain-scalar rules:
//! single-quoted with `''` escapes by default, double-quoted when the value
//! contains line breaks or control characters that single quotes cannot
//! carry. Nested mappings become indented block mappings. Values the walker
//! does not handle are written back in flow style so they survive the
//! rewrite unchanged.

use serde_yaml::Value;

use super::node::{Mapping, Node};

const INDENT: usize = 2;

/// Keys that must be quoted to stay strings when parsed back.
const RESERVED_WORDS: &[&str] = &[
    "null", "true", "false", "yes", "no", "on", "off", "y", "n", "nan", "inf", "infinity",
];

/// Serialize a document tree to YAML text.
pub fn to_yaml(root: &Mapping) -> String {
    let mut out = String::new();
    write_mapping(&mut out, root, 0);
    out
}

fn write_mapping(out: &mut String, mapping: &Mapping, indent: usize) {
    for (key, node) in mapping {
        out.push_str(&" ".repeat(indent));
        out.push_str(&format_key(key));
        out.push(':');
        match node {
            Node::Scalar(value) => {
                out.push(' ');
                out.push_str(&quote_scalar(value));
                out.push('\n');
            }
            Node::Mapping(children) if children.is_empty() => out.push_str(" {}\n"),
            Node::Mapping(children) => {
                out.push('\n');
                write_mapping(out, children, indent + INDENT);
            }
            Node::Unsupported(value) => {
                out.push(' ');
                write_flow(out, value);
                out.push('\n');
            }
        }
    }
}

/// Key as written: plain when it is unambiguously a string, quoted otherwise.
pub fn format_key(key: &str) -> String {
    if is_plain_key(key) {
        key.to_string()
    } else {
        quote_scalar(key)
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        && !RESERVED_WORDS.iter().any(|w| w.eq_ignore_ascii_case(key))
}

/// Quote a string value so it parses back to exactly the same string.
pub fn quote_scalar(value: &str) -> String {
    if value.chars().any(needs_double_quotes) {
        double_quote(value)
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

fn needs_double_quotes(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}')
}

fn double_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if needs_double_quotes(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn write_flow(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => out.push_str(&quote_scalar(s)),
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_flow(out, item);
            }
            out.push(']');
        }
        Value::Mapping(entries) => {
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                match key {
                    Value::String(s) => out.push_str(&format_key(s)),
                    other => write_flow(out, other),
                }
                out.push_str(": ");
                write_flow(out, item);
            }
            out.push('}');
        }
        Value::Tagged(tagged) => {
            out.push_str(&tagged.tag.to_string());
            out.push(' ');
            write_flow(out, &tagged.value);
        }
    }
}
