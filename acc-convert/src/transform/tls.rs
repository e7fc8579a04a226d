use serde_json::{json, Map, Value};
use tmsh_conf_core::{unquote, ConfValue, ConfigNode};

use super::values::protected_value;
use super::{with_class, Context, Converted, NamedObject};
use crate::location::resolve_path;
use crate::refs::handle_object_ref;

/// Protocol versions switched off through the `options` list.
const DISABLED_PROTOCOLS: &[(&str, &str)] = &[
    ("no-tlsv1", "tls1_0Enabled"),
    ("no-tlsv1.1", "tls1_1Enabled"),
    ("no-tlsv1.2", "tls1_2Enabled"),
    ("no-tlsv1.3", "tls1_3Enabled"),
    ("no-sslv3", "ssl3Enabled"),
    ("no-dtls", "dtlsEnabled"),
];

/// `ltm profile client-ssl` -> `TLS_Server` plus one `Certificate` per
/// certificate/key chain entry.
pub fn convert_client_ssl(
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Converted {
    let name = resolve_path(&node.path).profile;
    let mut server = with_class("TLS_Server", properties);
    apply_options(node, &mut server);

    let mut certificates = Vec::new();
    let mut extra = Vec::new();
    let chains = node.get("cert-key-chain").and_then(ConfValue::as_map);
    for (entry, chain) in chains.into_iter().flatten() {
        let Some(chain) = chain.as_map() else {
            continue;
        };
        let cert_name = format!("{name}_{}", unquote(entry).replace(['/', ' '], "_"));
        let mut certificate = with_class("Certificate", Map::new());
        for (source, target) in [
            ("cert", "certificate"),
            ("key", "privateKey"),
            ("chain", "chainCA"),
        ] {
            if let Some(path) = chain
                .get(source)
                .and_then(ConfValue::as_str)
                .filter(|p| *p != "none")
            {
                certificate.insert(target.into(), json!({ "bigip": unquote(path) }));
            }
        }
        if let Some(passphrase) = chain.get("passphrase").and_then(ConfValue::as_str) {
            certificate.insert("passphrase".into(), protected_value(passphrase));
        }
        if !certificate.contains_key("certificate") {
            ctx.warn(node, format!("chain {entry} has no certificate"));
            continue;
        }

        let mut reference = Map::new();
        reference.insert("certificate".into(), json!(cert_name));
        if let Some(server_name) = node.get_str("server-name").filter(|s| *s != "none") {
            reference.insert("matchToSNI".into(), json!(unquote(server_name)));
        }
        certificates.push(Value::Object(reference));
        extra.push(NamedObject {
            name: cert_name,
            object: certificate,
        });
    }
    if !certificates.is_empty() {
        server.insert("certificates".into(), Value::Array(certificates));
    }

    let mut objects = vec![NamedObject {
        name,
        object: server,
    }];
    objects.extend(extra);
    Converted::Objects(objects)
}

/// `ltm profile server-ssl` -> `TLS_Client`.
pub fn convert_server_ssl(node: &ConfigNode, properties: Map<String, Value>) -> Converted {
    let mut client = with_class("TLS_Client", properties);
    apply_options(node, &mut client);

    if node.get_str("peer-cert-mode") == Some("require") {
        client.insert("validateCertificate".into(), json!(true));
    }
    if let Some(ca) = node.get_str("ca-file").filter(|p| *p != "none") {
        client.insert("trustCA".into(), handle_object_ref(ca));
    }
    Converted::single(resolve_path(&node.path).profile, client)
}

fn apply_options(node: &ConfigNode, object: &mut Map<String, Value>) {
    let Some(options) = node.get("options") else {
        return;
    };
    let options = options.items();
    for (option, property) in DISABLED_PROTOCOLS {
        if options.contains(option) {
            object.insert((*property).into(), json!(false));
        }
    }
    if options.contains(&"single-dh-use") {
        object.insert("singleUseDhEnabled".into(), json!(true));
    }
}
