use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::declaration::DeclarationKind;
use crate::transform::values::hyphens_to_camel;

/// How one source property id converts into one (or zero) target properties.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MappingRule {
    /// Source property id, e.g. `load-balancing-mode`.
    pub id: String,
    /// Target id; defaults to the camel-cased source id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_id: Option<String>,
    /// Strip surrounding quotes from scalar values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_string: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extend: Option<Extend>,
    /// Value emitted when the source object omits the property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
}

/// Container shape of the converted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Extend {
    /// List items (or block keys) become a JSON array.
    Array,
    /// A nested block is merged into the parent object.
    Merge,
    /// A block of named blocks becomes an array of objects keyed by `name`.
    ObjArray,
}

/// Value conversion applied while copying a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    CamelCase,
    EnableState,
    Cidr,
    CidrNumber,
    NameValue,
    Dedupe,
    Protected,
    NoneAsEmpty,
    Reference,
    Integer,
    Boolean,
}

impl MappingRule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Property name written to the declaration.
    pub fn target_id(&self) -> String {
        self.alt_id
            .clone()
            .unwrap_or_else(|| hyphens_to_camel(&self.id))
    }

    pub fn strips_quotes(&self) -> bool {
        self.quoted_string.unwrap_or(false)
    }

    /// Overwrite only the fields `custom` sets explicitly.
    fn overlay(&mut self, custom: &MappingRule) {
        if custom.alt_id.is_some() {
            self.alt_id = custom.alt_id.clone();
        }
        if custom.quoted_string.is_some() {
            self.quoted_string = custom.quoted_string;
        }
        if custom.extend.is_some() {
            self.extend = custom.extend;
        }
        if custom.default.is_some() {
            self.default = custom.default.clone();
        }
        if custom.transform.is_some() {
            self.transform = custom.transform;
        }
    }
}

/// Object-type keyword to its ordered conversion rules.
///
/// Nested blocks converted with `extend = "merge"` or `"obj_array"` look up
/// their own rules under `"<keyword> <property id>"`.
pub type PropertyMapTable = IndexMap<String, Vec<MappingRule>>;

#[derive(Debug, Deserialize)]
struct PropertyMapFile {
    #[serde(default)]
    rules: PropertyMapTable,
}

/// Errors returned when loading rule tables.
#[derive(Debug, Error)]
pub enum PropertyMapError {
    #[error("failed to read property map {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse property map {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Load a rule table from a TOML file.
pub fn load_property_map(path: &Path) -> Result<PropertyMapTable, PropertyMapError> {
    let raw = fs::read_to_string(path).map_err(|source| PropertyMapError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_property_map(&raw, path.display().to_string())
}

/// Built-in rule table for the declaration kind.
pub fn builtin_property_map(kind: DeclarationKind) -> Result<PropertyMapTable, PropertyMapError> {
    let (raw, name) = match kind {
        DeclarationKind::Adc => (
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/properties/as3.toml")),
            "embedded as3 properties",
        ),
        DeclarationKind::Device => (
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/properties/do.toml")),
            "embedded do properties",
        ),
    };
    parse_property_map(raw, name.to_string())
}

/// Built-in table merged with an optional customization file.
pub fn load_registry(
    kind: DeclarationKind,
    custom: Option<&Path>,
) -> Result<PropertyMapTable, PropertyMapError> {
    let builtin = builtin_property_map(kind)?;
    let custom = custom.map(load_property_map).transpose()?;
    Ok(build(&builtin, custom.as_ref()))
}

pub fn parse_property_map(raw: &str, path: String) -> Result<PropertyMapTable, PropertyMapError> {
    let parsed: PropertyMapFile =
        toml::from_str(raw).map_err(|source| PropertyMapError::Parse { path, source })?;
    Ok(parsed.rules)
}

/// Merge a customization table into the built-in one.
///
/// Rules match by id. A matching custom rule overwrites only the fields it
/// sets; unmatched custom rules are appended after the built-in rules in
/// their own order; keywords only the custom table knows are added whole.
pub fn build(builtin: &PropertyMapTable, custom: Option<&PropertyMapTable>) -> PropertyMapTable {
    let mut merged = builtin.clone();
    let Some(custom) = custom else {
        return merged;
    };

    for (keyword, custom_rules) in custom {
        let Some(rules) = merged.get_mut(keyword) else {
            merged.insert(keyword.clone(), custom_rules.clone());
            continue;
        };
        for custom_rule in custom_rules {
            match rules.iter_mut().find(|rule| rule.id == custom_rule.id) {
                Some(rule) => rule.overlay(custom_rule),
                None => rules.push(custom_rule.clone()),
            }
        }
    }
    merged
}
