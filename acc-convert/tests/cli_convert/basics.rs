use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn convert_writes_adc_declaration_and_summary() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("declaration.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(fixture("convert/application.conf"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "convert_summary tenants=2 applications=2 objects=6 unsupported=1 warnings=0",
        ))
        .stderr(predicate::str::contains("analytics global-settings"));

    let declaration = read_json(&output_path);
    assert_eq!(declaration["class"], json!("ADC"));
    assert_eq!(declaration["schemaVersion"], json!("3.36.0"));
    assert_eq!(declaration["label"], json!("Converted Declaration"));
    assert!(declaration["id"]
        .as_str()
        .is_some_and(|id| id.starts_with("urn:uuid:")));
    assert!(declaration.get("controls").is_none());

    let app = &declaration["Tenant1"]["App1"];
    assert_eq!(app["class"], json!("Application"));
    assert_eq!(app["template"], json!("generic"));

    assert_eq!(
        app["web_pool"],
        json!({
            "class": "Pool",
            "remark": "Web tier",
            "loadBalancingMode": "least-connections-member",
            "members": [
                {
                    "servicePort": 80,
                    "servers": [{"name": "web1", "address": "10.0.1.10"}],
                    "ratio": 2
                },
                {
                    "servicePort": 80,
                    "serverAddresses": ["10.0.1.11"],
                    "adminState": "disable"
                }
            ],
            "monitors": [{"use": "/Tenant1/App1/web_mon"}, {"bigip": "/Common/tcp"}],
            "minimumMonitors": "all"
        })
    );

    let service = &app["web_vs"];
    assert_eq!(service["class"], json!("Service_HTTP"));
    assert_eq!(service["remark"], json!("Public site"));
    assert_eq!(service["virtualAddresses"], json!(["10.0.2.1"]));
    assert_eq!(service["virtualPort"], json!(80));
    assert_eq!(service["pool"], json!({"use": "/Tenant1/App1/web_pool"}));
    assert_eq!(service["profileHTTP"], json!({"use": "/Tenant1/App1/web_http"}));
    assert_eq!(service["profileTCP"], json!({"bigip": "/Common/tcp"}));
    assert_eq!(service["iRules"], json!([{"use": "/Tenant1/App1/redirect_rule"}]));
    assert_eq!(service["snat"], json!("auto"));
    assert!(service.get("layer4").is_none());

    assert_eq!(
        app["web_http"],
        json!({
            "class": "HTTP_Profile",
            "xForwardedFor": true,
            "hstsInsert": true,
            "hstsPeriod": 16070400
        })
    );

    let monitor = &app["web_mon"];
    assert_eq!(monitor["monitorType"], json!("http"));
    assert_eq!(monitor["interval"], json!(10));
    assert_eq!(monitor["timeout"], json!(31));
    assert_eq!(monitor["receive"], json!("200 OK"));
    assert_eq!(monitor["adaptive"], json!(false));
    assert!(monitor.get("targetAddress").is_none());

    let script = app["redirect_rule"]["iRule"]["base64"]
        .as_str()
        .expect("base64 body");
    let script = String::from_utf8(STANDARD.decode(script).expect("base64")).expect("utf-8");
    assert!(script.starts_with("when HTTP_REQUEST {"));
    assert!(script.contains("HTTP::redirect"));

    let shared = &declaration["Common"]["Shared"];
    assert_eq!(shared["template"], json!("shared"));
    assert_eq!(
        shared["shared_pool"]["members"],
        json!([{"servicePort": 443, "serverAddresses": ["10.0.9.1"], "shareNodes": true}])
    );
}

#[test]
fn convert_adds_controls_when_requested() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("declaration.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(fixture("convert/application.conf"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .arg("--controls")
        .assert()
        .success();

    let declaration = read_json(&output_path);
    assert_eq!(
        declaration["controls"],
        json!({"class": "Controls", "trace": true, "logLevel": "debug"})
    );
}

#[test]
fn convert_prunes_defaults_with_schema() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("pool.conf");
    let output_path = dir.path().join("declaration.json");
    fs::write(
        &input,
        "ltm pool /T/A/p {\n    load-balancing-mode round-robin\n    slow-ramp-time 10\n    service-down-action reset\n}\n",
    )
    .expect("input write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .arg("--schema")
        .arg(fixture("schema/adc-schema-subset.json"))
        .assert()
        .success();

    let declaration = read_json(&output_path);
    assert_eq!(
        declaration["T"]["A"]["p"],
        json!({"class": "Pool", "serviceDownAction": "reset"})
    );
}

#[test]
fn convert_writes_report() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("declaration.json");
    let report_path = dir.path().join("report.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(fixture("convert/application.conf"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .arg("--report")
        .arg(path_as_str(&report_path))
        .assert()
        .success();

    let report = read_json(&report_path);
    assert_eq!(report["unsupported"], json!(["analytics global-settings"]));
    assert_eq!(report["converted"].as_array().map(Vec::len), Some(6));
    assert_eq!(report["warnings"], json!([]));
}

#[test]
fn convert_refuses_to_overwrite_input() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("bigip.conf");
    fs::write(&input, "ltm pool /T/A/p { }\n").expect("input write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&input))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source file"));

    let unchanged = fs::read_to_string(&input).expect("input still readable");
    assert_eq!(unchanged, "ltm pool /T/A/p { }\n");
}

#[test]
fn convert_fails_on_misindented_brace() {
    let dir = tempdir().expect("tempdir");
    let output_path = dir.path().join("declaration.json");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(fixture("parser/misindented_brace.conf"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Missing or mis-indented '}' for line: '    devices {'",
        ));

    assert!(!output_path.exists());
}

#[test]
fn convert_concatenates_inputs_in_order() {
    let dir = tempdir().expect("tempdir");
    let first = dir.path().join("first.conf");
    let second = dir.path().join("second.conf");
    let output_path = dir.path().join("declaration.json");
    fs::write(&first, "ltm pool /T/A/one {\n    slow-ramp-time 5\n}").expect("first write");
    fs::write(&second, "ltm pool /T/A/two {\n    slow-ramp-time 6\n}\n").expect("second write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(path_as_str(&first))
        .arg(path_as_str(&second))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .assert()
        .success();

    let declaration = read_json(&output_path);
    let app = declaration["T"]["A"].as_object().expect("application");
    let names: Vec<&str> = app.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["class", "template", "one", "two"]);
    assert_eq!(app["two"]["slowRampTime"], json!(6));
}
