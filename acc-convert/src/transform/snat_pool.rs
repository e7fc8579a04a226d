use serde_json::{json, Map, Value};
use tmsh_conf_core::{unquote, ConfigNode};

use super::{with_class, Context, Converted};
use crate::location::resolve_path;

/// `ltm snatpool` -> `SNAT_Pool`.
///
/// Members name either a bare address or an `ltm snat-translation` object
/// whose `address` is used instead.
pub fn convert(
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Option<Converted> {
    let members: Vec<String> = node
        .get("members")
        .map(|members| members.items())
        .unwrap_or_default()
        .into_iter()
        .map(|member| {
            let member = unquote(member);
            ctx.find("ltm snat-translation", member)
                .and_then(|translation| translation.get_str("address"))
                .unwrap_or_else(|| member.rsplit('/').next().unwrap_or(member))
                .to_string()
        })
        .collect();

    if members.is_empty() {
        ctx.warn(node, "SNAT pool has no members");
        return None;
    }

    let mut pool = with_class("SNAT_Pool", properties);
    pool.insert("snatAddresses".into(), json!(members));
    Some(Converted::single(resolve_path(&node.path).profile, pool))
}
