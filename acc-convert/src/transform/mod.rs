//! Per-kind conversion of source objects into declaration objects.
//!
//! Every handler receives the node, the properties already copied by the
//! rule table, and a [`Context`] for cross-object lookups. Handlers fill in
//! what the table cannot express: the class, discriminated sub-types,
//! references between objects, and values assembled from several
//! properties.

use serde_json::{json, Map, Value};
use tmsh_conf_core::{ConfigNode, ParsedConfig};
use tracing::warn;

use crate::property_map::PropertyMapTable;

pub mod address;
pub mod data_group;
pub mod device;
pub mod monitor;
pub mod persist;
pub mod pool;
pub mod profiles;
pub mod rules;
pub mod scripts;
pub mod service;
pub mod snat_pool;
pub mod tls;
pub mod values;

/// Read-only inputs shared by all handlers plus the warnings they raise.
pub struct Context<'a> {
    pub parsed: &'a ParsedConfig,
    pub table: &'a PropertyMapTable,
    pub warnings: Vec<String>,
}

impl<'a> Context<'a> {
    pub fn new(parsed: &'a ParsedConfig, table: &'a PropertyMapTable) -> Self {
        Self {
            parsed,
            table,
            warnings: Vec::new(),
        }
    }

    /// Record a non-fatal problem with a source object.
    pub fn warn(&mut self, node: &ConfigNode, message: impl AsRef<str>) {
        let text = format!("{}: {}", node.key(), message.as_ref());
        warn!("{text}");
        self.warnings.push(text);
    }

    pub fn find(&self, keyword: &str, path: &str) -> Option<&'a ConfigNode> {
        self.parsed.find(keyword, path)
    }
}

/// A declaration object and the name it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedObject {
    pub name: String,
    pub object: Map<String, Value>,
}

/// What a handler produced for one source object.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    /// Objects stored next to each other; the first one is the source object.
    Objects(Vec<NamedObject>),
    /// Properties set directly on the device tenant.
    TenantSettings(Map<String, Value>),
}

impl Converted {
    pub fn single(name: impl Into<String>, object: Map<String, Value>) -> Self {
        Self::Objects(vec![NamedObject {
            name: name.into(),
            object,
        }])
    }
}

/// Put `class` first, followed by the converted properties.
pub fn with_class(class: &str, properties: Map<String, Value>) -> Map<String, Value> {
    let mut object = Map::new();
    object.insert("class".into(), json!(class));
    for (key, value) in properties {
        if key != "class" {
            object.insert(key, value);
        }
    }
    object
}
