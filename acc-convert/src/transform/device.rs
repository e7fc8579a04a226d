//! Device-level networking and system objects.

use serde_json::{json, Map, Value};
use tmsh_conf_core::{unquote, ConfValue, ConfigNode};

use super::{with_class, Context, Converted};
use crate::kind::ObjectKind;
use crate::location::resolve_path;

/// Device singletons are stored under fixed names.
const DNS_NAME: &str = "dns";
const NTP_NAME: &str = "ntp";

pub fn convert(
    kind: ObjectKind,
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Option<Converted> {
    match kind {
        ObjectKind::GlobalSettings => {
            let Some(hostname) = node.get_str("hostname") else {
                ctx.warn(node, "global settings carry no hostname");
                return None;
            };
            let mut settings = Map::new();
            settings.insert("hostname".into(), json!(unquote(hostname)));
            Some(Converted::TenantSettings(settings))
        }
        ObjectKind::Dns => Some(Converted::single(DNS_NAME, with_class("DNS", properties))),
        ObjectKind::Ntp => Some(Converted::single(NTP_NAME, with_class("NTP", properties))),
        ObjectKind::Vlan => Some(vlan(node, properties)),
        ObjectKind::SelfIp => Some(self_ip(node, properties)),
        ObjectKind::Route => {
            let route = with_class("Route", properties);
            Some(Converted::single(resolve_path(&node.path).profile, route))
        }
        _ => {
            ctx.warn(node, "not a device object");
            None
        }
    }
}

fn vlan(node: &ConfigNode, properties: Map<String, Value>) -> Converted {
    let mut vlan = with_class("VLAN", properties);

    let interfaces: Vec<Value> = match node.get("interfaces") {
        Some(ConfValue::Map(interfaces)) => interfaces
            .iter()
            .map(|(name, settings)| {
                let tagged = settings.get("tagged").is_some();
                json!({ "name": unquote(name), "tagged": tagged })
            })
            .collect(),
        Some(other) => other
            .items()
            .into_iter()
            .map(|name| json!({ "name": unquote(name), "tagged": false }))
            .collect(),
        None => Vec::new(),
    };
    vlan.insert("interfaces".into(), Value::Array(interfaces));

    Converted::single(resolve_path(&node.path).profile, vlan)
}

fn self_ip(node: &ConfigNode, properties: Map<String, Value>) -> Converted {
    let mut self_ip = with_class("SelfIp", properties);

    if let Some(vlan) = node.get_str("vlan") {
        self_ip.insert("vlan".into(), json!(last_segment(vlan)));
    }
    if let Some(group) = node.get_str("traffic-group") {
        self_ip.insert("trafficGroup".into(), json!(last_segment(group)));
    }
    let allow = match node.get("allow-service") {
        Some(ConfValue::Str(mode)) if !mode.is_empty() => json!(unquote(mode)),
        Some(list) if !list.items().is_empty() => json!(list.items()),
        _ => json!("none"),
    };
    self_ip.insert("allowService".into(), allow);

    Converted::single(resolve_path(&node.path).profile, self_ip)
}

fn last_segment(path: &str) -> &str {
    let path = unquote(path);
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{json, Map, Value};
    use tmsh_conf_core::parse;

    use super::convert;
    use crate::kind::ObjectKind;
    use crate::property_map::PropertyMapTable;
    use crate::transform::{Context, Converted};

    fn first_object(text: &str) -> (String, Value) {
        let parsed = parse(text).expect("parse");
        let table = PropertyMapTable::new();
        let mut ctx = Context::new(&parsed, &table);
        let node = &parsed.nodes[0];
        match convert(ObjectKind::from_keyword(&node.keyword), node, Map::new(), &mut ctx) {
            Some(Converted::Objects(mut objects)) => {
                let first = objects.remove(0);
                (first.name, Value::Object(first.object))
            }
            other => panic!("unexpected conversion {other:?}"),
        }
    }

    #[test]
    fn vlan_interfaces() {
        let (name, vlan) = first_object(
            "net vlan /Common/external {\n    interfaces {\n        1.1 { }\n        1.2 {\n            tagged\n        }\n    }\n    tag 4094\n}\n",
        );
        assert_eq!(name, "external");
        assert_eq!(
            vlan["interfaces"],
            json!([{"name": "1.1", "tagged": false}, {"name": "1.2", "tagged": true}])
        );
    }

    #[test]
    fn self_ip_references() {
        let (name, self_ip) = first_object(
            "net self /Common/external-self {\n    address 10.1.10.5/24\n    allow-service {\n        default\n    }\n    traffic-group /Common/traffic-group-local-only\n    vlan /Common/external\n}\n",
        );
        assert_eq!(name, "external-self");
        assert_eq!(self_ip["vlan"], json!("external"));
        assert_eq!(self_ip["trafficGroup"], json!("traffic-group-local-only"));
        assert_eq!(self_ip["allowService"], json!(["default"]));
    }

    #[test]
    fn hostname_goes_to_tenant() {
        let parsed = parse("sys global-settings {\n    hostname bigip1.example.com\n}\n")
            .expect("parse");
        let table = PropertyMapTable::new();
        let mut ctx = Context::new(&parsed, &table);
        let converted = convert(
            ObjectKind::GlobalSettings,
            &parsed.nodes[0],
            Map::new(),
            &mut ctx,
        );
        let Some(Converted::TenantSettings(settings)) = converted else {
            panic!("expected tenant settings");
        };
        assert_eq!(settings["hostname"], json!("bigip1.example.com"));
    }
}
