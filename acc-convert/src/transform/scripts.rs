use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Map, Value};
use tmsh_conf_core::ConfigNode;

use super::{with_class, Context, Converted};
use crate::location::resolve_path;

/// `ltm rule` / `gtm rule` -> `iRule` / `GSLB_iRule` with the script body
/// carried base64-encoded.
pub fn convert(
    class: &str,
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Option<Converted> {
    let script = match node.script() {
        Some(script) => script.to_string(),
        None if node.properties().is_some_and(|p| p.is_empty()) => String::new(),
        None => {
            ctx.warn(node, "script body was not captured verbatim");
            return None;
        }
    };

    let mut rule = with_class(class, properties);
    rule.insert("iRule".into(), json!({ "base64": STANDARD.encode(script) }));
    Some(Converted::single(resolve_path(&node.path).profile, rule))
}
