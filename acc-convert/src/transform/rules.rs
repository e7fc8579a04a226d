//! Table-driven copying of source properties into declaration properties.

use serde_json::{json, Map, Value};
use tmsh_conf_core::{unquote, ConfMap, ConfValue};

use crate::property_map::{Extend, MappingRule, PropertyMapTable, Transform};
use crate::refs::handle_object_ref;
use crate::transform::values::{
    dedupe, enabled_to_enable, hyphens_to_camel, integer, name_value, netmask_to_cidr,
    none_as_empty, parse_flag, protected_value,
};

/// Convert `props` with the rules registered for `keyword`.
///
/// Properties without a rule are ignored. A rule whose property is absent
/// contributes its `default`, if any.
pub fn apply_rules(table: &PropertyMapTable, keyword: &str, props: &ConfMap) -> Map<String, Value> {
    let mut out = Map::new();
    let Some(rules) = table.get(keyword) else {
        return out;
    };

    for rule in rules {
        let value = match props.get(&rule.id) {
            Some(source) => convert_property(table, keyword, rule, source),
            None => rule.default.clone(),
        };
        match (rule.extend, value) {
            (_, None) => {}
            (Some(Extend::Merge), Some(Value::Object(merged))) => out.extend(merged),
            (_, Some(value)) => {
                out.insert(rule.target_id(), value);
            }
        }
    }
    out
}

/// Keyword under which the rules for a nested block of `rule` live.
pub fn nested_keyword(keyword: &str, rule: &MappingRule) -> String {
    format!("{keyword} {}", rule.id)
}

fn convert_property(
    table: &PropertyMapTable,
    keyword: &str,
    rule: &MappingRule,
    source: &ConfValue,
) -> Option<Value> {
    match rule.extend {
        Some(Extend::Array) => {
            let items = source
                .items()
                .into_iter()
                .filter_map(|item| convert_scalar(rule, item))
                .collect();
            Some(finish_array(rule, items))
        }
        Some(Extend::Merge) => {
            let block = source.as_map()?;
            Some(Value::Object(convert_block(
                table,
                &nested_keyword(keyword, rule),
                block,
            )))
        }
        Some(Extend::ObjArray) => {
            let block = source.as_map()?;
            let nested = nested_keyword(keyword, rule);
            let items = block
                .iter()
                .map(|(name, entry)| {
                    let mut object = Map::new();
                    object.insert("name".into(), json!(unquote(name)));
                    if let Some(entry) = entry.as_map() {
                        object.extend(convert_block(table, &nested, entry));
                    }
                    Value::Object(object)
                })
                .collect();
            Some(Value::Array(items))
        }
        None => match source {
            ConfValue::Str(text) | ConfValue::Raw(text) => convert_scalar(rule, text),
            ConfValue::List(items) => {
                let items = items
                    .iter()
                    .filter_map(ConfValue::as_str)
                    .filter_map(|item| convert_scalar(rule, item))
                    .collect();
                Some(finish_array(rule, items))
            }
            ConfValue::Map(block) => Some(Value::Object(convert_block(
                table,
                &nested_keyword(keyword, rule),
                block,
            ))),
        },
    }
}

fn finish_array(rule: &MappingRule, items: Vec<Value>) -> Value {
    match rule.transform {
        Some(Transform::Dedupe) => Value::Array(dedupe(items)),
        _ => Value::Array(items),
    }
}

/// Nested blocks use their own rules when the table has them; otherwise keys
/// are camel-cased and values copied as plain text.
fn convert_block(table: &PropertyMapTable, keyword: &str, block: &ConfMap) -> Map<String, Value> {
    if table.contains_key(keyword) {
        return apply_rules(table, keyword, block);
    }
    block
        .iter()
        .map(|(key, value)| (hyphens_to_camel(unquote(key)), plain_value(value)))
        .collect()
}

/// Untyped conversion of a value with no rule attached.
pub fn plain_value(value: &ConfValue) -> Value {
    match value {
        ConfValue::Str(text) => json!(unquote(text)),
        ConfValue::Raw(text) => json!(text),
        ConfValue::List(items) => Value::Array(items.iter().map(plain_value).collect()),
        ConfValue::Map(block) => Value::Object(
            block
                .iter()
                .map(|(key, value)| (hyphens_to_camel(unquote(key)), plain_value(value)))
                .collect(),
        ),
    }
}

/// Convert one scalar. `None` means the property is dropped.
fn convert_scalar(rule: &MappingRule, text: &str) -> Option<Value> {
    let text = if rule.strips_quotes() {
        unquote(text)
    } else {
        text
    };
    let value = match rule.transform {
        None | Some(Transform::Dedupe) => json!(text),
        Some(Transform::CamelCase) => json!(hyphens_to_camel(text)),
        Some(Transform::EnableState) => json!(enabled_to_enable(text)),
        Some(Transform::Cidr) => netmask_to_cidr(text, false),
        Some(Transform::CidrNumber) => netmask_to_cidr(text, true),
        Some(Transform::NameValue) => name_value(text),
        Some(Transform::Protected) => protected_value(text),
        Some(Transform::NoneAsEmpty) => none_as_empty(json!(text)),
        Some(Transform::Reference) => match unquote(text) {
            "" | "none" => return None,
            path => handle_object_ref(path),
        },
        Some(Transform::Integer) => integer(text),
        // A bare flag line (`ip-forward`) has an empty value and means on.
        Some(Transform::Boolean) if text.is_empty() => json!(true),
        Some(Transform::Boolean) => parse_flag(text).map_or_else(|| json!(text), Value::Bool),
    };
    Some(value)
}
