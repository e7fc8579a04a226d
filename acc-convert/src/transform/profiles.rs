use serde_json::{Map, Value};
use tmsh_conf_core::{ConfValue, ConfigNode};

use super::{with_class, Context, Converted};
use crate::kind::ObjectKind;
use crate::location::resolve_path;
use crate::refs::handle_object_ref;

/// Protocol profiles whose properties are described by the rule table.
pub fn convert(
    kind: ObjectKind,
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Option<Converted> {
    let Some(class) = kind.class() else {
        ctx.warn(node, "profile kind has no declaration class");
        return None;
    };
    let mut profile = with_class(class, properties);

    if kind == ObjectKind::HttpProfile && node.get_str("proxy-type") == Some("explicit") {
        let resolver = node
            .get_nested(&["explicit-proxy", "dns-resolver"])
            .and_then(ConfValue::as_str)
            .filter(|path| *path != "none");
        match resolver {
            Some(path) => {
                profile.insert("resolver".into(), handle_object_ref(path));
            }
            None => ctx.warn(node, "explicit proxy without a DNS resolver"),
        }
    }

    Some(Converted::single(resolve_path(&node.path).profile, profile))
}
