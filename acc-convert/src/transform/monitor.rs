use serde_json::{json, Map, Value};
use tmsh_conf_core::{unquote, ConfigNode};

use super::address::port_number;
use super::{with_class, Context, Converted};
use crate::location::resolve_path;
use crate::refs::handle_object_ref;

/// Monitor types the declaration accepts, keyed by keyword suffix.
const MONITOR_TYPES: &[(&str, &str)] = &[
    ("dns", "dns"),
    ("external", "external"),
    ("ftp", "ftp"),
    ("gateway-icmp", "gateway-icmp"),
    ("http", "http"),
    ("http2", "http2"),
    ("https", "https"),
    ("icmp", "icmp"),
    ("inband", "inband"),
    ("ldap", "ldap"),
    ("mssql", "mssql"),
    ("mysql", "mysql"),
    ("oracle", "oracle"),
    ("postgresql", "postgresql"),
    ("radius", "radius"),
    ("sip", "sip"),
    ("smtp", "smtp"),
    ("tcp", "tcp"),
    ("tcp-half-open", "tcp-half-open"),
    ("udp", "udp"),
];

/// `ltm monitor <type>` -> `Monitor`. Unknown monitor types are skipped.
pub fn convert(
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Option<Converted> {
    let suffix = node.kind_suffix();
    let Some((_, monitor_type)) = MONITOR_TYPES.iter().find(|(kind, _)| *kind == suffix) else {
        ctx.warn(node, format!("monitor type {suffix} is not supported"));
        return None;
    };

    let mut monitor = with_class("Monitor", Map::new());
    monitor.insert("monitorType".into(), json!(monitor_type));
    monitor.extend(properties);

    if let Some(destination) = node.get_str("destination") {
        let (address, port) = split_destination(unquote(destination));
        if let Some(address) = address {
            monitor.insert("targetAddress".into(), json!(address));
        }
        if let Some(port) = port {
            monitor.insert("targetPort".into(), port);
        }
    }

    if *monitor_type == "https" {
        if let Some(profile) = node.get_str("ssl-profile").filter(|p| *p != "none") {
            monitor.insert("clientTLS".into(), handle_object_ref(profile));
        }
    }

    Some(Converted::single(resolve_path(&node.path).profile, monitor))
}

/// `10.0.0.1:80`, `*:80` or `*:*`; wildcards give no value.
fn split_destination(destination: &str) -> (Option<&str>, Option<Value>) {
    let split = if destination.matches(':').count() > 1 {
        destination.rsplit_once('.')
    } else {
        destination.rsplit_once(':')
    };
    let (address, port) = split.unwrap_or((destination, "*"));
    let address = Some(address).filter(|a| *a != "*");
    let port = Some(port)
        .filter(|p| *p != "*" && *p != "0")
        .map(port_number);
    (address, port)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::split_destination;

    #[test]
    fn destinations() {
        assert_eq!(split_destination("*:*"), (None, None));
        assert_eq!(split_destination("*:8080"), (None, Some(json!(8080))));
        assert_eq!(
            split_destination("10.0.0.5:https"),
            (Some("10.0.0.5"), Some(json!(443)))
        );
        assert_eq!(
            split_destination("2001:db8::5.80"),
            (Some("2001:db8::5"), Some(json!(80)))
        );
    }
}
