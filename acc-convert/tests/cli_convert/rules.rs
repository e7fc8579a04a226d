use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

#[test]
fn custom_properties_override_and_extend_rules() {
    let dir = tempdir().expect("tempdir");
    let input = dir.path().join("pool.conf");
    let output_path = dir.path().join("declaration.json");
    fs::write(
        &input,
        "ltm pool /T/A/p {\n    allow-nat no\n    description \"edge pool\"\n    slow-ramp-time 30\n}\n",
    )
    .expect("input write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(path_as_str(&input))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .arg("--custom-properties")
        .arg(fixture("convert/custom-properties.toml"))
        .assert()
        .success();

    let declaration = read_json(&output_path);
    assert_eq!(
        declaration["T"]["A"]["p"],
        json!({
            "class": "Pool",
            "label": "edge pool",
            "slowRampTime": 30,
            "allowNat": false
        })
    );
}

#[test]
fn broken_custom_properties_are_reported() {
    let dir = tempdir().expect("tempdir");
    let rules = dir.path().join("rules.toml");
    let output_path = dir.path().join("declaration.json");
    fs::write(&rules, "[[rules.\"ltm pool\"]]\nid = \"x\"\ntransform = \"rot13\"\n")
        .expect("rules write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("acc-convert"));
    cmd.arg("convert")
        .arg(fixture("convert/application.conf"))
        .arg("--output")
        .arg(path_as_str(&output_path))
        .arg("--custom-properties")
        .arg(path_as_str(&rules))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load conversion rules"));
}
