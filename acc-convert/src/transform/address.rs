//! Address, port and service-name handling for member and destination keys.

use serde_json::{json, Value};

/// Well-known service names the device prints instead of port numbers.
const SERVICE_PORTS: &[(&str, u16)] = &[
    ("any", 0),
    ("ftp", 21),
    ("ssh", 22),
    ("telnet", 23),
    ("smtp", 25),
    ("domain", 53),
    ("http", 80),
    ("pop3", 110),
    ("ntp", 123),
    ("imap", 143),
    ("snmp", 161),
    ("ldap", 389),
    ("https", 443),
    ("smtps", 465),
    ("ldaps", 636),
    ("imaps", 993),
    ("pop3s", 995),
    ("mysql", 3306),
    ("ms-wbt-server", 3389),
    ("http-alt", 8080),
];

/// Whether text is an IPv4 address, optionally with route domain and port.
pub fn is_ipv4(text: &str) -> bool {
    let host = text.split(':').next().unwrap_or(text);
    let host = host.split('%').next().unwrap_or(host);
    host.parse::<std::net::Ipv4Addr>().is_ok()
}

/// Whether text is an IPv6 address, optionally with route domain and `.port`.
pub fn is_ipv6(text: &str) -> bool {
    if text.matches(':').count() < 2 {
        return false;
    }
    let host = text.split('%').next().unwrap_or(text);
    if host.parse::<std::net::Ipv6Addr>().is_ok() {
        return true;
    }
    host.rsplit_once('.')
        .is_some_and(|(addr, _)| addr.parse::<std::net::Ipv6Addr>().is_ok())
}

pub fn is_ip(text: &str) -> bool {
    is_ipv4(text) || is_ipv6(text)
}

/// Split `/<folder>/<name>:<port>` (or `<v6-name>.<port>`) into folder,
/// name and port.
pub fn split_member_key(key: &str) -> (Option<&str>, &str, Option<&str>) {
    let (folder, last) = match key.rsplit_once('/') {
        Some((folder, last)) => (Some(folder).filter(|f| !f.is_empty()), last),
        None => (None, key),
    };
    let split = if last.matches(':').count() > 1 {
        last.rsplit_once('.')
    } else {
        last.rsplit_once(':')
    };
    match split {
        Some((name, port)) => (folder, name, Some(port)),
        None => (folder, last, None),
    }
}

/// Port number for a numeric port or a known service name.
pub fn port_number(port: &str) -> Value {
    if let Ok(number) = port.parse::<u16>() {
        return json!(number);
    }
    SERVICE_PORTS
        .iter()
        .find(|(name, _)| *name == port)
        .map_or_else(|| json!(port), |(_, number)| json!(number))
}

/// Wildcard address spellings mapped to their literal form.
pub fn literal_address(address: &str) -> &str {
    match address {
        "any" => "0.0.0.0",
        "any6" => "::",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{is_ipv4, is_ipv6, port_number, split_member_key};

    #[test]
    fn ipv4_with_port() {
        assert!(is_ipv4("10.0.0.1"));
        assert!(is_ipv4("10.0.0.1:80"));
        assert!(is_ipv4("10.0.0.1%2:80"));
        assert!(!is_ipv4("web01"));
    }

    #[test]
    fn ipv6_with_port() {
        assert!(is_ipv6("2001:db8::1"));
        assert!(is_ipv6("2001:db8::1.443"));
        assert!(!is_ipv6("10.0.0.1:80"));
    }

    #[test]
    fn splits_member_keys() {
        assert_eq!(
            split_member_key("/T/10.0.1.10:80"),
            (Some("/T"), "10.0.1.10", Some("80"))
        );
        assert_eq!(
            split_member_key("/Common/2001:db8::1.443"),
            (Some("/Common"), "2001:db8::1", Some("443"))
        );
        assert_eq!(split_member_key("web01:http"), (None, "web01", Some("http")));
    }

    #[test]
    fn port_names_resolve() {
        assert_eq!(port_number("8443"), json!(8443));
        assert_eq!(port_number("https"), json!(443));
        assert_eq!(port_number("any"), json!(0));
        assert_eq!(port_number("custom-svc"), json!("custom-svc"));
    }
}
