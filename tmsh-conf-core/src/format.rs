//! Renderers for parsed configuration trees.

use serde_json::{Map, Value};

use crate::tree::{ConfValue, ConfigNode, ParsedConfig};

/// Render top-level objects and their nested blocks down to `max_depth`.
pub fn render_tree(nodes: &[ConfigNode], max_depth: usize) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&node.key());
        out.push('\n');
        if max_depth == 0 {
            continue;
        }
        match &node.body {
            ConfValue::Raw(script) => {
                out.push_str(&format!("  <script: {} lines>\n", script.lines().count()));
            }
            ConfValue::Map(map) => {
                for (key, value) in map {
                    render_value(key, value, 1, max_depth, &mut out);
                }
            }
            other => render_value("", other, 1, max_depth, &mut out),
        }
    }
    out
}

fn render_value(key: &str, value: &ConfValue, depth: usize, max_depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    match value {
        ConfValue::Str(text) if text.is_empty() => out.push_str(&format!("{indent}{key}\n")),
        ConfValue::Str(text) => out.push_str(&format!("{indent}{key} = {text}\n")),
        ConfValue::Raw(text) => {
            out.push_str(&format!("{indent}{key} <script: {} lines>\n", text.lines().count()))
        }
        ConfValue::List(items) => {
            out.push_str(&format!("{indent}{key} [{}]\n", items.len()));
            if depth < max_depth {
                for item in items {
                    render_value("-", item, depth + 1, max_depth, out);
                }
            }
        }
        ConfValue::Map(map) => {
            out.push_str(&format!("{indent}{key}\n"));
            if depth < max_depth {
                for (child_key, child) in map {
                    render_value(child_key, child, depth + 1, max_depth, out);
                }
            }
        }
    }
}

/// Render the parsed tree as a JSON object keyed by `keyword path`.
pub fn to_json(parsed: &ParsedConfig) -> Value {
    let mut root = Map::new();
    for node in &parsed.nodes {
        root.insert(node.key(), value_to_json(&node.body));
    }
    Value::Object(root)
}

fn value_to_json(value: &ConfValue) -> Value {
    match value {
        ConfValue::Str(text) | ConfValue::Raw(text) => Value::String(text.clone()),
        ConfValue::List(items) => Value::Array(items.iter().map(value_to_json).collect()),
        ConfValue::Map(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), value_to_json(value)))
                .collect(),
        ),
    }
}
