use std::path::PathBuf;
use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(path)
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be valid utf-8")
}

fn read_json(path: &Path) -> Value {
    let raw = fs::read_to_string(path).expect("output file");
    serde_json::from_str(&raw).expect("output should be JSON")
}

mod basics;
mod device;
mod rules;
