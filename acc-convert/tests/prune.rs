use std::fs;
use std::path::PathBuf;

use acc_convert::prune::{prune, SchemaResolver};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(path)
}

fn schema() -> Value {
    let raw = fs::read_to_string(fixture("schema/adc-schema-subset.json")).expect("read schema");
    serde_json::from_str(&raw).expect("schema json")
}

fn wrap(name: &str, object: Value) -> Value {
    json!({
        "class": "ADC",
        "schemaVersion": "3.36.0",
        "id": "urn:uuid:a35f7126-83ca-4100-9772-a7bc4c532da0",
        "label": "Converted Declaration",
        "remark": "Generated by Automation Config Converter",
        "AS3_Tenant": {
            "class": "Tenant",
            "AS3_Application": {
                "class": "Application",
                "template": "generic",
                name: object
            }
        }
    })
}

#[test]
fn http_profile_with_only_defaults_keeps_class() {
    let declaration = wrap(
        "httpProf",
        json!({
            "trustXFF": false,
            "knownMethods": [
                "CONNECT", "DELETE", "GET", "HEAD", "LOCK", "OPTIONS",
                "POST", "PROPFIND", "PUT", "TRACE", "UNLOCK"
            ],
            "maxRequests": 0,
            "pipelineAction": "allow",
            "unknownMethodAction": "allow",
            "hstsIncludeSubdomains": true,
            "hstsPeriod": 7862400,
            "hstsInsert": false,
            "hstsPreload": false,
            "xForwardedFor": true,
            "multiplexTransformations": true,
            "proxyType": "reverse",
            "rewriteRedirects": "none",
            "serverHeaderValue": "BigIP",
            "viaRequest": "remove",
            "viaResponse": "remove",
            "class": "HTTP_Profile"
        }),
    );

    assert_eq!(
        prune(&declaration, &schema()),
        wrap("httpProf", json!({"class": "HTTP_Profile"}))
    );
}

#[test]
fn non_default_values_survive() {
    let declaration = wrap(
        "httpProf",
        json!({"class": "HTTP_Profile", "xForwardedFor": false, "hstsPeriod": 100}),
    );
    assert_eq!(prune(&declaration, &schema()), declaration);
}

#[test]
fn forwarding_service_uses_else_branch() {
    let service = json!({
        "translateServerAddress": false,
        "translateServerPort": false,
        "class": "Service_Forwarding",
        "profileL4": {"bigip": "/Common/apm-forwarding-fastL4"},
        "forwardingType": "ip",
        "virtualAddresses": [["0.0.0.0/0", "10.10.192.0/24"]],
        "virtualPort": 0,
        "persistenceMethods": [],
        "layer4": "any",
        "snat": "none"
    });
    let mut expected = service.clone();
    expected
        .as_object_mut()
        .expect("object")
        .remove("layer4");

    assert_eq!(
        prune(&wrap("vs1", service), &schema()),
        wrap("vs1", expected)
    );
}

#[test]
fn l2_forwarding_takes_then_branch() {
    let resolver_schema = schema();
    let resolver = SchemaResolver::new(&resolver_schema);
    let mut node = Map::new();
    node.insert("forwardingType".into(), json!("L2"));

    let defaults = resolver.defaults_for("Service_Forwarding", &node);
    assert_eq!(defaults.get("layer4"), Some(&json!("tcp")));
    assert_eq!(defaults.get("snat"), Some(&json!("auto")));
}

#[test]
fn unknown_class_is_left_alone() {
    let declaration = wrap(
        "edge_case",
        json!({
            "certificates": [{"certificate": "/Common/Shared/default_certificate"}],
            "class": "UNCERTAIN_CERT",
            "tls1_0Enabled": false,
            "tls1_1Enabled": false,
            "tls1_2Enabled": true,
            "tls1_3Enabled": true,
            "singleUseDhEnabled": false,
            "insertEmptyFragmentsEnabled": false
        }),
    );
    assert_eq!(prune(&declaration, &schema()), declaration);
}

#[test]
fn containers_keep_their_template() {
    let declaration = wrap("p", json!({"class": "Pool"}));
    let pruned = prune(&declaration, &schema());
    assert_eq!(
        pruned["AS3_Tenant"]["AS3_Application"]["template"],
        json!("generic")
    );
    assert_eq!(pruned["class"], json!("ADC"));
}

#[test]
fn pruning_is_idempotent() {
    let declaration = wrap(
        "web_pool",
        json!({
            "class": "Pool",
            "loadBalancingMode": "round-robin",
            "minimumMembersActive": 0,
            "slowRampTime": 10,
            "members": [{"servicePort": 80, "ratio": 1}]
        }),
    );
    let once = prune(&declaration, &schema());
    assert_eq!(
        once["AS3_Tenant"]["AS3_Application"]["web_pool"],
        json!({
            "class": "Pool",
            "minimumMembersActive": 0,
            "members": [{"servicePort": 80, "ratio": 1}]
        })
    );
    assert_eq!(prune(&once, &schema()), once);
}

fn prune_twice(declaration: &Value, schema: &Value) -> Value {
    let once = prune(declaration, schema);
    assert_eq!(prune(&once, schema), once, "second pass must change nothing");
    once
}

#[test]
fn condition_on_a_defaulted_property_is_stable() {
    let schema = json!({
        "definitions": {
            "Listener": {
                "properties": {
                    "mode": { "type": "string", "default": "b" }
                },
                "if": { "properties": { "mode": { "const": "a" } } },
                "then": { "properties": { "layer4": { "default": "tcp" } } },
                "else": { "properties": { "layer4": { "default": "any" } } }
            }
        }
    });
    let declaration = json!({"o": {"class": "Listener", "mode": "b", "layer4": "tcp"}});

    let pruned = prune_twice(&declaration, &schema);
    assert_eq!(pruned, json!({"o": {"class": "Listener", "layer4": "tcp"}}));

    let matching_default = json!({"o": {"class": "Listener", "mode": "b", "layer4": "any"}});
    assert_eq!(
        prune_twice(&matching_default, &schema),
        json!({"o": {"class": "Listener"}})
    );
}

#[test]
fn forwarding_services_prune_to_a_fixed_point() {
    let l2 = wrap(
        "vs_l2",
        json!({
            "class": "Service_Forwarding",
            "forwardingType": "L2",
            "layer4": "tcp",
            "snat": "auto",
            "translateServerAddress": false,
            "enable": true
        }),
    );
    assert_eq!(
        prune_twice(&l2, &schema())["AS3_Tenant"]["AS3_Application"]["vs_l2"],
        json!({
            "class": "Service_Forwarding",
            "forwardingType": "L2",
            "translateServerAddress": false
        })
    );

    let ip = wrap(
        "vs_ip",
        json!({
            "class": "Service_Forwarding",
            "forwardingType": "ip",
            "layer4": "tcp",
            "snat": "none",
            "translateServerPort": true
        }),
    );
    assert_eq!(
        prune_twice(&ip, &schema())["AS3_Tenant"]["AS3_Application"]["vs_ip"],
        json!({
            "class": "Service_Forwarding",
            "forwardingType": "ip",
            "layer4": "tcp",
            "snat": "none"
        })
    );
}

#[test]
fn nested_objects_without_class_are_untouched() {
    let members = json!([
        {"servicePort": 80, "ratio": 1, "connectionLimit": 0},
        {"servicePort": 443, "serverAddresses": ["10.0.1.11"], "adminState": "disable"}
    ]);
    let declaration = wrap(
        "web_pool",
        json!({"class": "Pool", "slowRampTime": 10, "members": members.clone()}),
    );

    let pruned = prune_twice(&declaration, &schema());
    assert_eq!(
        pruned["AS3_Tenant"]["AS3_Application"]["web_pool"],
        json!({"class": "Pool", "members": members})
    );
}
