//! Classification of object references.

use serde_json::{json, Value};
use tmsh_conf_core::ParsedConfig;

use crate::location::{resolve_path, SHARED_APPLICATION, SHARED_TENANT};

/// Objects shipped with the device, with the profile or monitor kind they
/// stand for. References to these stay pointers into the device namespace.
const BUILTIN_OBJECTS: &[(&str, &str)] = &[
    ("/Common/http", "http"),
    ("/Common/http-explicit", "http"),
    ("/Common/http-transparent", "http"),
    ("/Common/http2", "http2"),
    ("/Common/https", "https"),
    ("/Common/https_443", "https"),
    ("/Common/http_head_f5", "http"),
    ("/Common/https_head_f5", "https"),
    ("/Common/tcp", "tcp"),
    ("/Common/tcp_half_open", "tcp-half-open"),
    ("/Common/f5-tcp-lan", "tcp"),
    ("/Common/f5-tcp-mobile", "tcp"),
    ("/Common/f5-tcp-progressive", "tcp"),
    ("/Common/f5-tcp-wan", "tcp"),
    ("/Common/tcp-lan-optimized", "tcp"),
    ("/Common/tcp-mobile-optimized", "tcp"),
    ("/Common/tcp-wan-optimized", "tcp"),
    ("/Common/udp", "udp"),
    ("/Common/udp_gtm_dns", "udp"),
    ("/Common/fastL4", "fastl4"),
    ("/Common/apm-forwarding-fastL4", "fastl4"),
    ("/Common/full_acceleration", "fastl4"),
    ("/Common/clientssl", "client-ssl"),
    ("/Common/clientssl-insecure-compatible", "client-ssl"),
    ("/Common/clientssl-secure", "client-ssl"),
    ("/Common/serverssl", "server-ssl"),
    ("/Common/serverssl-insecure-compatible", "server-ssl"),
    ("/Common/oneconnect", "one-connect"),
    ("/Common/httpcompression", "http-compression"),
    ("/Common/wan-optimized-compression", "http-compression"),
    ("/Common/cookie", "cookie"),
    ("/Common/dest_addr", "dest-addr"),
    ("/Common/source_addr", "source-addr"),
    ("/Common/hash", "hash"),
    ("/Common/ssl", "ssl"),
    ("/Common/universal", "universal"),
    ("/Common/msrdp", "msrdp"),
    ("/Common/sip_info", "sip"),
    ("/Common/gateway_icmp", "gateway-icmp"),
    ("/Common/icmp", "icmp"),
    ("/Common/inband", "inband"),
    ("/Common/none", "none"),
    ("/Common/default.crt", "certificate"),
    ("/Common/default.key", "key"),
    ("/Common/ca-bundle.crt", "certificate"),
    ("/Common/_sys_https_redirect", "rule"),
    ("/Common/_sys_APM_activesync", "rule"),
    ("/Common/_sys_auth_ldap", "rule"),
    ("/Common/_sys_auth_radius", "rule"),
    ("/Common/stream", "stream"),
    ("/Common/websecurity", "web-security"),
];

/// Whether `path` names an object shipped with the device.
pub fn is_builtin(path: &str) -> bool {
    builtin_kind(path).is_some()
}

/// Kind of a built-in object, e.g. `tcp` for `/Common/f5-tcp-progressive`.
pub fn builtin_kind(path: &str) -> Option<&'static str> {
    BUILTIN_OBJECTS
        .iter()
        .find(|(builtin, _)| *builtin == path)
        .map(|(_, kind)| *kind)
}

/// Path of the converted object a reference points to.
///
/// Two-segment paths move into the shared container; deeper paths keep
/// their tenant and application.
pub fn declaration_target(path: &str) -> String {
    let segments = path.split('/').filter(|s| !s.is_empty()).count();
    if segments <= 2 {
        let location = resolve_path(path);
        return format!(
            "/{SHARED_TENANT}/{SHARED_APPLICATION}/{}",
            location.profile
        );
    }
    resolve_path(path).declaration_path()
}

/// Turn an object path into a reference object.
///
/// Built-in objects become `{bigip: path}`, everything else a `use`
/// pointer at its converted location.
pub fn handle_object_ref(path: &str) -> Value {
    let path = tmsh_conf_core::unquote(path);
    if is_builtin(path) {
        json!({ "bigip": path })
    } else {
        json!({ "use": declaration_target(path) })
    }
}

/// Kind of the `ltm` object at `path`, e.g. `http` for an HTTP profile.
///
/// Falls back to the built-in table for device-shipped objects.
pub fn object_type<'a>(path: &str, parsed: &'a ParsedConfig) -> Option<&'a str> {
    let found = parsed
        .with_keyword_prefix("ltm ")
        .find(|node| node.path == path);
    match found {
        Some(node) => Some(node.kind_suffix()),
        None => builtin_kind(path),
    }
}
