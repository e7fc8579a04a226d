use std::path::PathBuf;

use pretty_assertions::assert_eq;
use tmsh_conf_core::{parse, parse_files, ConfigNode};

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("fixtures")
        .join(path)
}

fn shape(nodes: &[ConfigNode]) -> Vec<(String, String, tmsh_conf_core::ConfValue)> {
    nodes
        .iter()
        .map(|n| (n.keyword.clone(), n.path.clone(), n.body.clone()))
        .collect()
}

#[test]
fn rendered_config_text_parses_back_to_the_same_tree() {
    let first = parse_files(&[fixture("parser/mixed.conf"), fixture("parser/irules.conf")])
        .expect("initial parse should succeed");

    let rendered = first
        .nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n");
    let second = parse(&rendered).expect("re-parse should succeed");

    assert!(second.warnings.is_empty());
    assert_eq!(shape(&first.nodes), shape(&second.nodes));
}
