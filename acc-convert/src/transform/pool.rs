use serde_json::{json, Map, Value};
use tmsh_conf_core::{unquote, ConfMap, ConfValue, ConfigNode};

use super::address::{is_ip, port_number, split_member_key};
use super::rules::apply_rules;
use super::values::dedupe;
use super::{with_class, Context, Converted};
use crate::location::resolve_path;
use crate::refs::handle_object_ref;

const MEMBER_RULES: &str = "ltm pool members";

/// `ltm pool` -> `Pool`.
pub fn convert(node: &ConfigNode, properties: Map<String, Value>, ctx: &mut Context) -> Converted {
    let mut pool = with_class("Pool", properties);

    if let Some(members) = node.get("members") {
        let members = convert_members(members, ctx);
        if !members.is_empty() {
            pool.insert("members".into(), Value::Array(members));
        }
    }

    if let Some(monitor) = node.get_str("monitor") {
        let (monitors, minimum) = parse_monitor_rule(monitor);
        if !monitors.is_empty() {
            pool.insert("monitors".into(), Value::Array(monitors));
        }
        if let Some(minimum) = minimum {
            pool.insert("minimumMonitors".into(), minimum);
        }
    }

    Converted::single(resolve_path(&node.path).profile, pool)
}

fn convert_members(members: &ConfValue, ctx: &Context) -> Vec<Value> {
    let empty = ConfMap::new();
    let entries: Vec<(&str, &ConfMap)> = match members {
        ConfValue::Map(map) => map
            .iter()
            .map(|(key, block)| (key.as_str(), block.as_map().unwrap_or(&empty)))
            .collect(),
        other => other.items().into_iter().map(|key| (key, &empty)).collect(),
    };

    entries
        .into_iter()
        .map(|(key, block)| Value::Object(convert_member(unquote(key), block, ctx)))
        .collect()
}

fn convert_member(key: &str, block: &ConfMap, ctx: &Context) -> Map<String, Value> {
    let (folder, name, port) = split_member_key(key);
    let node_path = match folder {
        Some(folder) => format!("{folder}/{name}"),
        None => name.to_string(),
    };
    let node = ctx.find("ltm node", &node_path);

    let mut member = Map::new();
    if let Some(port) = port {
        member.insert("servicePort".into(), port_number(port));
    }

    let fqdn = block
        .get("fqdn")
        .or_else(|| node.and_then(|n| n.get("fqdn")))
        .filter(|fqdn| fqdn.get("name").is_some());
    if let Some(fqdn) = fqdn {
        member.insert("addressDiscovery".into(), json!("fqdn"));
        if let Some(hostname) = fqdn.get("name").and_then(ConfValue::as_str) {
            member.insert("hostname".into(), json!(unquote(hostname)));
        }
        let autopopulate = fqdn.get("autopopulate").and_then(ConfValue::as_str);
        member.insert("autoPopulate".into(), json!(autopopulate == Some("enabled")));
    } else {
        let address = block
            .get("address")
            .and_then(ConfValue::as_str)
            .or_else(|| node.and_then(|n| n.get_str("address")))
            .or_else(|| is_ip(name).then_some(name));
        match address {
            Some(address) if address != name => {
                member.insert(
                    "servers".into(),
                    json!([{ "name": name, "address": address }]),
                );
            }
            Some(address) => {
                member.insert("serverAddresses".into(), json!([address]));
            }
            None => {}
        }
    }

    if folder == Some("/Common") {
        member.insert("shareNodes".into(), json!(true));
    }

    member.extend(apply_rules(ctx.table, MEMBER_RULES, block));

    let session = block.get("session").and_then(ConfValue::as_str);
    let state = block.get("state").and_then(ConfValue::as_str);
    if state == Some("user-down") {
        member.insert("adminState".into(), json!("offline"));
    } else if session == Some("user-disabled") {
        member.insert("adminState".into(), json!("disable"));
    }
    member
}

/// Parse a pool monitor rule: `/Common/http`, `/a and /b`, or
/// `min 1 of { /a /b }`.
///
/// Returns the monitor references and the minimum that must pass.
pub fn parse_monitor_rule(rule: &str) -> (Vec<Value>, Option<Value>) {
    let tokens: Vec<&str> = rule.split_whitespace().collect();
    let (paths, minimum) = match tokens.as_slice() {
        ["min", count, "of", rest @ ..] => {
            let paths: Vec<&str> = rest
                .iter()
                .copied()
                .filter(|token| !matches!(*token, "{" | "}"))
                .collect();
            (paths, count.parse::<u32>().ok().map(|n| json!(n)))
        }
        _ => {
            let paths: Vec<&str> = tokens.iter().copied().filter(|t| *t != "and").collect();
            let minimum = (paths.len() > 1).then(|| json!("all"));
            (paths, minimum)
        }
    };

    let refs: Vec<Value> = paths
        .into_iter()
        .filter(|path| *path != "none" && *path != "/Common/none")
        .map(handle_object_ref)
        .collect();
    if refs.is_empty() {
        return (refs, None);
    }
    (dedupe(refs), minimum)
}
