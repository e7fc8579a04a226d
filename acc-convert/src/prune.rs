//! Removal of properties whose value equals the schema default.

use serde_json::{Map, Value};
use tracing::debug;

/// Guard against reference cycles in the schema.
const MAX_DEPTH: usize = 32;

/// Bound on re-evaluating conditions whose inputs are themselves defaulted.
const MAX_PASSES: usize = 4;

/// Looks up per-class property defaults in a JSON schema document.
pub struct SchemaResolver<'a> {
    schema: &'a Value,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(schema: &'a Value) -> Self {
        Self { schema }
    }

    /// Definition for a declaration class under `definitions` or `$defs`.
    pub fn definition(&self, class: &str) -> Option<&'a Value> {
        ["definitions", "$defs"]
            .iter()
            .find_map(|section| self.schema.get(section)?.get(class))
    }

    /// Effective default of every property of `node`'s class.
    ///
    /// Direct `properties` win over conditional branches, which win over
    /// `allOf` members, which win over a `$ref` base. An unknown class
    /// yields no defaults.
    ///
    /// Conditions see absent properties as their default, so a node reads
    /// the same branch before and after its defaulted values are removed.
    pub fn defaults_for(&self, class: &str, node: &Map<String, Value>) -> Map<String, Value> {
        let Some(definition) = self.definition(class) else {
            return Map::new();
        };

        let mut defaults = Map::new();
        for _ in 0..MAX_PASSES {
            let effective = with_defaults(node, &defaults);
            let mut next = Map::new();
            self.collect(definition, &effective, &mut next, 0);
            if next == defaults {
                break;
            }
            defaults = next;
        }
        defaults
    }

    fn collect(
        &self,
        schema: &'a Value,
        node: &Map<String, Value>,
        defaults: &mut Map<String, Value>,
        depth: usize,
    ) {
        if depth > MAX_DEPTH {
            return;
        }
        let Value::Object(schema) = schema else {
            return;
        };

        if let Some(Value::Object(properties)) = schema.get("properties") {
            for (name, property) in properties {
                if defaults.contains_key(name) {
                    continue;
                }
                if let Some(default) = self.property_default(property, depth + 1) {
                    defaults.insert(name.clone(), default.clone());
                }
            }
        }

        if let Some(condition) = schema.get("if") {
            let branch = if self.matches(condition, node, depth + 1) {
                schema.get("then")
            } else {
                schema.get("else")
            };
            if let Some(branch) = branch {
                self.collect(branch, node, defaults, depth + 1);
            }
        }

        if let Some(Value::Array(members)) = schema.get("allOf") {
            for member in members {
                self.collect(member, node, defaults, depth + 1);
            }
        }

        if let Some(target) = schema
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| self.resolve_ref(reference))
        {
            self.collect(target, node, defaults, depth + 1);
        }
    }

    fn property_default(&self, property: &'a Value, depth: usize) -> Option<&'a Value> {
        if depth > MAX_DEPTH {
            return None;
        }
        if let Some(default) = property.get("default") {
            return Some(default);
        }
        if let Some(target) = property
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| self.resolve_ref(reference))
        {
            return self.property_default(target, depth + 1);
        }
        property
            .get("allOf")
            .and_then(Value::as_array)?
            .iter()
            .find_map(|member| self.property_default(member, depth + 1))
    }

    /// Local JSON pointer references only (`#/definitions/X`).
    fn resolve_ref(&self, reference: &str) -> Option<&'a Value> {
        let (_, pointer) = reference.split_once('#')?;
        if pointer.is_empty() {
            return Some(self.schema);
        }
        self.schema.pointer(pointer)
    }

    /// Minimal `if` evaluation: `properties.<p>.const|enum`, `required`,
    /// `not`, `allOf` and `$ref`. Keywords it does not know match.
    fn matches(&self, condition: &Value, node: &Map<String, Value>, depth: usize) -> bool {
        if depth > MAX_DEPTH {
            return false;
        }
        let Value::Object(condition) = condition else {
            return condition.as_bool().unwrap_or(true);
        };

        if let Some(Value::Array(required)) = condition.get("required") {
            let all_present = required
                .iter()
                .filter_map(Value::as_str)
                .all(|name| node.contains_key(name));
            if !all_present {
                return false;
            }
        }

        if let Some(Value::Object(properties)) = condition.get("properties") {
            for (name, rule) in properties {
                let Some(value) = node.get(name) else {
                    continue;
                };
                if let Some(expected) = rule.get("const") {
                    if value != expected {
                        return false;
                    }
                }
                if let Some(Value::Array(allowed)) = rule.get("enum") {
                    if !allowed.contains(value) {
                        return false;
                    }
                }
            }
        }

        if let Some(negated) = condition.get("not") {
            if self.matches(negated, node, depth + 1) {
                return false;
            }
        }

        if let Some(Value::Array(members)) = condition.get("allOf") {
            if !members.iter().all(|m| self.matches(m, node, depth + 1)) {
                return false;
            }
        }

        if let Some(target) = condition
            .get("$ref")
            .and_then(Value::as_str)
            .and_then(|reference| self.resolve_ref(reference))
        {
            return self.matches(target, node, depth + 1);
        }
        true
    }
}

fn with_defaults(node: &Map<String, Value>, defaults: &Map<String, Value>) -> Map<String, Value> {
    let mut effective = node.clone();
    for (name, default) in defaults {
        if !effective.contains_key(name) {
            effective.insert(name.clone(), default.clone());
        }
    }
    effective
}

/// Return a copy of `declaration` without values equal to their defaults.
pub fn prune(declaration: &Value, schema: &Value) -> Value {
    let mut pruned = declaration.clone();
    prune_in_place(&mut pruned, &SchemaResolver::new(schema));
    pruned
}

/// Prune in place. `class` is never removed.
pub fn prune_in_place(value: &mut Value, resolver: &SchemaResolver) {
    match value {
        Value::Object(node) => {
            if let Some(class) = node.get("class").and_then(Value::as_str).map(str::to_owned) {
                let defaults = resolver.defaults_for(&class, node);
                node.retain(|key, value| {
                    let keep = key == "class" || defaults.get(key) != Some(value);
                    if !keep {
                        debug!(class = %class, property = %key, "removing default value");
                    }
                    keep
                });
            }
            for child in node.values_mut() {
                prune_in_place(child, resolver);
            }
        }
        Value::Array(items) => {
            for item in items {
                prune_in_place(item, resolver);
            }
        }
        _ => {}
    }
}
