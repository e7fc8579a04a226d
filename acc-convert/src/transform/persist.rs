use serde_json::{json, Map, Value};
use tmsh_conf_core::ConfigNode;

use super::{with_class, Context, Converted};
use crate::location::resolve_path;

/// Persistence keyword suffix to declaration `persistenceMethod`.
const METHODS: &[(&str, &str)] = &[
    ("cookie", "cookie"),
    ("dest-addr", "destination-address"),
    ("source-addr", "source-address"),
    ("hash", "hash"),
    ("msrdp", "msrdp"),
    ("sip", "sip-info"),
    ("ssl", "tls-session-id"),
    ("universal", "universal"),
];

/// `ltm persistence <type>` -> `Persist`.
pub fn convert(
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Option<Converted> {
    let suffix = node.kind_suffix();
    let Some((_, method)) = METHODS.iter().find(|(kind, _)| *kind == suffix) else {
        ctx.warn(node, format!("persistence type {suffix} is not supported"));
        return None;
    };

    let mut persist = with_class("Persist", Map::new());
    persist.insert("persistenceMethod".into(), json!(method));
    persist.extend(properties);

    if *method == "cookie" {
        persist.entry("cookieMethod").or_insert_with(|| json!("insert"));
    } else {
        // Encryption settings only apply to cookie persistence.
        persist.remove("encrypt");
        persist.remove("passphrase");
    }

    Some(Converted::single(resolve_path(&node.path).profile, persist))
}
