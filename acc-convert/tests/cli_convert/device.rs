use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn convert_device_declaration() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("device.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(fixture("convert/device.conf"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .arg("--declaration")
        .arg("device")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "convert_summary tenants=1 applications=0 objects=4 unsupported=1 warnings=0",
        ));

    let declaration = read_json(&output_path);
    assert_eq!(declaration["class"], json!("Device"));
    assert_eq!(declaration["schemaVersion"], json!("1.27.0"));
    assert_eq!(declaration["async"], json!(true));

    let common = &declaration["Common"];
    assert_eq!(common["class"], json!("Tenant"));
    assert_eq!(common["hostname"], json!("bigip1.example.com"));
    assert_eq!(
        common["dns"],
        json!({
            "class": "DNS",
            "nameServers": ["10.0.0.53", "10.0.0.54"],
            "search": ["example.com"]
        })
    );
    assert_eq!(
        common["ntp"],
        json!({
            "class": "NTP",
            "servers": ["0.pool.ntp.org"],
            "timezone": "America/Los_Angeles"
        })
    );
    assert_eq!(
        common["external"],
        json!({
            "class": "VLAN",
            "tag": 4094,
            "interfaces": [{"name": "1.1", "tagged": false}]
        })
    );
    assert_eq!(
        common["external-self"],
        json!({
            "class": "SelfIp",
            "address": "10.1.10.5/24",
            "vlan": "external",
            "trafficGroup": "traffic-group-local-only",
            "allowService": "none"
        })
    );
    assert!(declaration.get("Tenant1").is_none());
}

#[test]
fn device_controls_carry_user_agent() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("device.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(fixture("convert/device.conf"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .arg("--declaration")
        .arg("device")
        .arg("--controls")
        .assert()
        .success();

    let declaration = read_json(&output_path);
    let controls = &declaration["controls"];
    assert_eq!(controls["class"], json!("Controls"));
    assert_eq!(controls["dryRun"], json!(false));
    assert!(controls["userAgent"]
        .as_str()
        .is_some_and(|agent| agent.starts_with("AUTOMATION-CONFIG-CONVERTER/")));
}
