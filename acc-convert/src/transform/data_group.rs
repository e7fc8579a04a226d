use serde_json::{json, Map, Value};
use tmsh_conf_core::{unquote, ConfValue, ConfigNode};

use super::{with_class, Context, Converted};
use crate::location::resolve_path;

/// `ltm data-group internal` -> `Data_Group` with inline records.
pub fn convert(
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Option<Converted> {
    let key_type = match node.get_str("type") {
        Some("string") | None => "string",
        Some("ip") => "ip",
        Some("integer") => "integer",
        Some(other) => {
            ctx.warn(node, format!("data group type {other} is not supported"));
            return None;
        }
    };

    let records: Vec<Value> = match node.get("records") {
        Some(ConfValue::Map(records)) => records
            .iter()
            .map(|(key, record)| {
                let value = record
                    .get("data")
                    .and_then(ConfValue::as_str)
                    .map(unquote)
                    .unwrap_or_default();
                json!({ "key": unquote(key), "value": value })
            })
            .collect(),
        Some(other) => other
            .items()
            .into_iter()
            .map(|key| json!({ "key": unquote(key), "value": "" }))
            .collect(),
        None => Vec::new(),
    };

    let mut group = with_class("Data_Group", properties);
    group.insert("storageType".into(), json!("internal"));
    group.insert("keyDataType".into(), json!(key_type));
    group.insert("records".into(), Value::Array(records));
    Some(Converted::single(resolve_path(&node.path).profile, group))
}
