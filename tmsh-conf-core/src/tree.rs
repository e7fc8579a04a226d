use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered property mapping of a configuration block.
pub type ConfMap = IndexMap<String, ConfValue>;

/// A value attached to a property id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfValue {
    /// Scalar text. Quotes from the source are retained.
    Str(String),
    /// Inline list (`key { a b }`) or a run of unnamed `{ ... }` entries.
    List(Vec<ConfValue>),
    /// Nested named block.
    Map(ConfMap),
    /// Script body captured verbatim.
    Raw(String),
}

impl ConfValue {
    /// Scalar text for `Str` and `Raw` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfValue::Str(value) | ConfValue::Raw(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfMap> {
        match self {
            ConfValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfValue]> {
        match self {
            ConfValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Member names of a list-like value.
    ///
    /// The grammar spells the same list three ways: `key { a b }`, a block
    /// with one bare name per line (parsed as a map with empty values), or a
    /// single scalar. All three collapse to the ordered names here.
    pub fn items(&self) -> Vec<&str> {
        match self {
            ConfValue::Str(value) if value.is_empty() => Vec::new(),
            ConfValue::Str(value) => vec![value.as_str()],
            ConfValue::List(items) => items.iter().filter_map(ConfValue::as_str).collect(),
            ConfValue::Map(map) => map.keys().map(String::as_str).collect(),
            ConfValue::Raw(_) => Vec::new(),
        }
    }

    /// Look up a key when this value is a map.
    pub fn get(&self, key: &str) -> Option<&ConfValue> {
        self.as_map()?.get(key)
    }
}

/// A top-level object from the configuration text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigNode {
    /// Object type keyword, for example `ltm profile http`.
    pub keyword: String,
    /// Object path, empty for singleton objects such as `sys dns`.
    pub path: String,
    /// Opening line as it appeared in the source.
    pub header: String,
    /// 1-based source line of the header.
    pub line: usize,
    /// `Map` for structured objects, `Raw` for script objects.
    pub body: ConfValue,
}

impl ConfigNode {
    /// Create an empty structured node.
    pub fn new(keyword: impl Into<String>, path: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let path = path.into();
        let header = format!("{} {{", join_key(&keyword, &path));
        Self {
            keyword,
            path,
            header,
            line: 0,
            body: ConfValue::Map(ConfMap::new()),
        }
    }

    /// `keyword path`, the key the object is known by in its source file.
    pub fn key(&self) -> String {
        join_key(&self.keyword, &self.path)
    }

    pub fn properties(&self) -> Option<&ConfMap> {
        self.body.as_map()
    }

    pub fn script(&self) -> Option<&str> {
        match &self.body {
            ConfValue::Raw(script) => Some(script),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfValue> {
        self.properties()?.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Walk nested blocks and return the value at the end of `path`.
    pub fn get_nested(&self, path: &[&str]) -> Option<&ConfValue> {
        let (first, rest) = path.split_first()?;
        let mut current = self.get(first)?;
        for segment in rest {
            current = current.get(segment)?;
        }
        Some(current)
    }

    /// Keyword after the module prefix, e.g. `http` for `ltm profile http`.
    pub fn kind_suffix(&self) -> &str {
        self.keyword
            .rsplit_once(' ')
            .map(|(_, last)| last)
            .unwrap_or(&self.keyword)
    }
}

/// Parse output: top-level objects in source order plus non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedConfig {
    pub nodes: Vec<ConfigNode>,
    pub warnings: Vec<String>,
}

impl ParsedConfig {
    /// Return the object with the provided keyword and path.
    pub fn find(&self, keyword: &str, path: &str) -> Option<&ConfigNode> {
        self.nodes
            .iter()
            .find(|node| node.keyword == keyword && node.path == path)
    }

    /// Return all objects whose keyword starts with `prefix`.
    pub fn with_keyword_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a ConfigNode> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.keyword.starts_with(prefix))
    }
}

fn join_key(keyword: &str, path: &str) -> String {
    if path.is_empty() {
        keyword.to_string()
    } else {
        format!("{keyword} {path}")
    }
}

impl Display for ConfigNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.body {
            ConfValue::Raw(script) => {
                writeln!(f, "{} {{", self.key())?;
                writeln!(f, "{script}")?;
                write!(f, "}}")
            }
            ConfValue::Map(map) if map.is_empty() => write!(f, "{} {{ }}", self.key()),
            ConfValue::Map(map) => {
                writeln!(f, "{} {{", self.key())?;
                write_map(f, map, 1)?;
                write!(f, "}}")
            }
            other => {
                writeln!(f, "{} {{", self.key())?;
                write_value(f, "", other, 1)?;
                write!(f, "}}")
            }
        }
    }
}

fn write_map(f: &mut Formatter<'_>, map: &ConfMap, depth: usize) -> fmt::Result {
    for (key, value) in map {
        write_value(f, key, value, depth)?;
    }
    Ok(())
}

fn write_value(f: &mut Formatter<'_>, key: &str, value: &ConfValue, depth: usize) -> fmt::Result {
    let indent = "    ".repeat(depth);
    let lead = if key.is_empty() {
        indent.clone()
    } else {
        format!("{indent}{key} ")
    };
    match value {
        ConfValue::Str(text) if text.is_empty() => writeln!(f, "{}", lead.trim_end()),
        ConfValue::Str(text) => writeln!(f, "{lead}{text}"),
        ConfValue::Raw(text) => {
            writeln!(f, "{lead}{{")?;
            writeln!(f, "{text}")?;
            writeln!(f, "{indent}}}")
        }
        ConfValue::Map(map) if map.is_empty() => writeln!(f, "{lead}{{ }}"),
        ConfValue::Map(map) => {
            writeln!(f, "{lead}{{")?;
            write_map(f, map, depth + 1)?;
            writeln!(f, "{indent}}}")
        }
        ConfValue::List(items) if items.iter().all(|item| item.as_str().is_some()) => {
            let joined = items
                .iter()
                .filter_map(ConfValue::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{lead}{{ {joined} }}")
        }
        ConfValue::List(items) => {
            writeln!(f, "{lead}{{")?;
            for item in items {
                write_value(f, "", item, depth + 1)?;
            }
            writeln!(f, "{indent}}}")
        }
    }
}
