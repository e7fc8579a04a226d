use serde_json::{json, Map, Value};
use tmsh_conf_core::{unquote, ConfValue, ConfigNode};
use tracing::debug;

use super::address::{literal_address, port_number, split_member_key};
use super::values::{dedupe, netmask_bits};
use super::{with_class, Context, Converted};
use crate::location::resolve_path;
use crate::refs::{handle_object_ref, is_builtin, object_type};

/// Built-in persistence profiles and the method names the declaration uses
/// for them.
const PERSISTENCE_METHODS: &[(&str, &str)] = &[
    ("/Common/cookie", "cookie"),
    ("/Common/dest_addr", "destination-address"),
    ("/Common/source_addr", "source-address"),
    ("/Common/ssl", "tls-session-id"),
    ("/Common/msrdp", "msrdp"),
    ("/Common/sip_info", "sip-info"),
    ("/Common/universal", "universal"),
    ("/Common/hash", "hash"),
];

/// Profiles attached to a virtual server, grouped by role.
#[derive(Debug, Default)]
struct AttachedProfiles {
    http: Option<Value>,
    tcp_client: Option<Value>,
    tcp_server: Option<Value>,
    udp: Option<Value>,
    l4: Option<Value>,
    multiplex: Option<Value>,
    compression: Option<Value>,
    server_tls: Vec<Value>,
    client_tls: Vec<Value>,
}

/// `ltm virtual` -> one of the `Service_*` classes.
pub fn convert(node: &ConfigNode, properties: Map<String, Value>, ctx: &mut Context) -> Converted {
    let profiles = attached_profiles(node, ctx);
    let class = service_class(node, &profiles);
    let mut service = with_class(class, properties);

    if let Some(destination) = node.get_str("destination") {
        let (address, port) = resolve_destination(destination, node.get_str("mask"), ctx);
        let source = node
            .get_str("source")
            .filter(|source| !matches!(*source, "0.0.0.0/0" | "::/0"));
        let addresses = match source {
            Some(source) => json!([[address, source]]),
            None => json!([address]),
        };
        service.insert("virtualAddresses".into(), addresses);
        if let Some(port) = port {
            service.insert("virtualPort".into(), port);
        }
    } else {
        ctx.warn(node, "virtual server has no destination");
    }

    match class {
        "Service_Forwarding" => {
            let forwarding = if node.get("l2-forward").is_some() {
                "L2"
            } else {
                "ip"
            };
            service.insert("forwardingType".into(), json!(forwarding));
        }
        "Service_HTTP" | "Service_HTTPS" | "Service_TCP" | "Service_UDP" => {
            service.remove("layer4");
        }
        _ => {}
    }
    if class == "Service_HTTPS" {
        service.insert("redirect80".into(), json!(false));
    }

    if let Some(pool) = node.get_str("pool").filter(|pool| *pool != "none") {
        service.insert("pool".into(), handle_object_ref(pool));
    }
    insert_profiles(&mut service, class, profiles);

    let methods = persistence_methods(node);
    if class != "Service_Forwarding" || !methods.is_empty() {
        service.insert("persistenceMethods".into(), Value::Array(methods));
    }
    if let Some(fallback) = node
        .get_str("fallback-persistence")
        .filter(|path| *path != "none")
    {
        service.insert("fallbackPersistenceMethod".into(), persistence_method(fallback));
    }

    if let Some(rules) = node.get("rules") {
        let rules: Vec<Value> = rules.items().into_iter().map(handle_object_ref).collect();
        service.insert("iRules".into(), Value::Array(dedupe(rules)));
    }

    service.insert("snat".into(), snat(node));

    if let Some(vlans) = node.get("vlans") {
        let vlans: Vec<Value> = vlans
            .items()
            .into_iter()
            .map(|vlan| json!({ "bigip": unquote(vlan) }))
            .collect();
        let key = if node.get("vlans-disabled").is_some() {
            "rejectVlans"
        } else {
            "allowVlans"
        };
        if !vlans.is_empty() {
            service.insert(key.into(), Value::Array(vlans));
        }
    }

    if node.get("disabled").is_some() {
        service.insert("enable".into(), json!(false));
    }

    Converted::single(resolve_path(&node.path).profile, service)
}

fn attached_profiles(node: &ConfigNode, ctx: &mut Context) -> AttachedProfiles {
    let mut attached = AttachedProfiles::default();
    let Some(profiles) = node.get("profiles") else {
        return attached;
    };

    let entries: Vec<(&str, Option<&str>)> = match profiles {
        ConfValue::Map(map) => map
            .iter()
            .map(|(path, block)| {
                let context = block.get("context").and_then(ConfValue::as_str);
                (path.as_str(), context)
            })
            .collect(),
        other => other.items().into_iter().map(|path| (path, None)).collect(),
    };

    for (path, context) in entries {
        let path = unquote(path);
        let reference = handle_object_ref(path);
        match object_type(path, ctx.parsed) {
            Some("http") => attached.http = Some(reference),
            Some("tcp") => match context {
                Some("clientside") => attached.tcp_client = Some(reference),
                Some("serverside") => attached.tcp_server = Some(reference),
                _ => {
                    attached.tcp_client = Some(reference.clone());
                    attached.tcp_server = Some(reference);
                }
            },
            Some("udp") => attached.udp = Some(reference),
            Some("fastl4") => attached.l4 = Some(reference),
            Some("one-connect") => attached.multiplex = Some(reference),
            Some("http-compression") => attached.compression = Some(reference),
            Some("client-ssl") => attached.server_tls.push(tls_pointer(path, reference)),
            Some("server-ssl") => attached.client_tls.push(tls_pointer(path, reference)),
            other => {
                debug!(profile = path, kind = ?other, "profile kind not converted");
                ctx.warn(node, format!("profile {path} is not converted"));
            }
        }
    }
    attached
}

/// TLS profiles are referenced by converted path unless built in.
fn tls_pointer(path: &str, reference: Value) -> Value {
    if is_builtin(path) {
        reference
    } else {
        reference.get("use").cloned().unwrap_or(reference)
    }
}

fn service_class(node: &ConfigNode, profiles: &AttachedProfiles) -> &'static str {
    if node.get("ip-forward").is_some() || node.get("l2-forward").is_some() {
        return "Service_Forwarding";
    }
    if profiles.http.is_some() {
        return if profiles.server_tls.is_empty() {
            "Service_HTTP"
        } else {
            "Service_HTTPS"
        };
    }
    if profiles.l4.is_some() {
        return "Service_L4";
    }
    match node.get_str("ip-protocol") {
        Some("udp") => "Service_UDP",
        Some("tcp") => "Service_TCP",
        None if profiles.tcp_client.is_some() => "Service_TCP",
        _ => "Service_Generic",
    }
}

fn insert_profiles(service: &mut Map<String, Value>, class: &str, profiles: AttachedProfiles) {
    if let Some(http) = profiles.http {
        service.insert("profileHTTP".into(), http);
    }
    match (profiles.tcp_client, profiles.tcp_server) {
        (Some(client), Some(server)) if client == server => {
            service.insert("profileTCP".into(), client);
        }
        (Some(client), Some(server)) => {
            service.insert("profileTCP".into(), json!({ "ingress": client, "egress": server }));
        }
        (Some(single), None) | (None, Some(single)) => {
            service.insert("profileTCP".into(), single);
        }
        (None, None) => {}
    }
    if let Some(udp) = profiles.udp {
        service.insert("profileUDP".into(), udp);
    }
    if let Some(l4) = profiles.l4 {
        service.insert("profileL4".into(), l4);
    }
    if let Some(multiplex) = profiles.multiplex {
        service.insert("profileMultiplex".into(), multiplex);
    }
    if let Some(compression) = profiles.compression {
        service.insert("profileHTTPCompression".into(), compression);
    }
    if class == "Service_HTTPS" || !profiles.server_tls.is_empty() {
        service.insert("serverTLS".into(), single_or_array(profiles.server_tls));
    }
    if !profiles.client_tls.is_empty() {
        service.insert("clientTLS".into(), single_or_array(profiles.client_tls));
    }
}

fn single_or_array(mut items: Vec<Value>) -> Value {
    if items.len() == 1 {
        items.remove(0)
    } else {
        Value::Array(items)
    }
}

/// Resolve `/<folder>/<address>:<port>` to a declaration address and port.
///
/// The address part may name an `ltm virtual-address` object; a mask
/// narrower than a host mask is appended in CIDR form.
fn resolve_destination(
    destination: &str,
    mask: Option<&str>,
    ctx: &Context,
) -> (String, Option<Value>) {
    let (folder, name, port) = split_member_key(unquote(destination));
    let va_path = match folder {
        Some(folder) => format!("{folder}/{name}"),
        None => name.to_string(),
    };
    let address = ctx
        .find("ltm virtual-address", &va_path)
        .and_then(|va| va.get_str("address"))
        .unwrap_or(name);
    let address = literal_address(address).to_string();

    let prefix = match mask {
        Some("any" | "any6") => Some(0),
        Some(mask) if mask.contains(':') => None,
        Some(mask) => netmask_bits(mask).filter(|bits| *bits < 32),
        None => None,
    };
    let address = match prefix {
        Some(bits) => format!("{address}/{bits}"),
        None => address,
    };
    (address, port.map(port_number))
}

fn persistence_methods(node: &ConfigNode) -> Vec<Value> {
    let Some(persist) = node.get("persist") else {
        return Vec::new();
    };
    let methods = persist
        .items()
        .into_iter()
        .map(|path| persistence_method(unquote(path)))
        .collect();
    dedupe(methods)
}

fn persistence_method(path: &str) -> Value {
    PERSISTENCE_METHODS
        .iter()
        .find(|(builtin, _)| *builtin == path)
        .map_or_else(|| handle_object_ref(path), |(_, method)| json!(method))
}

fn snat(node: &ConfigNode) -> Value {
    let Some(translation) = node.get("source-address-translation") else {
        return json!("none");
    };
    let kind = translation.get("type").and_then(ConfValue::as_str);
    match kind {
        Some("automap") => json!("auto"),
        Some("snat") => translation
            .get("pool")
            .and_then(ConfValue::as_str)
            .map_or_else(|| json!("none"), handle_object_ref),
        _ => json!("none"),
    }
}
