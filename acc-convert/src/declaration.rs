//! Declaration skeleton and tenant/application placement.

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::location::SHARED_APPLICATION;

pub const ADC_SCHEMA_VERSION: &str = "3.36.0";
pub const DEVICE_SCHEMA_VERSION: &str = "1.27.0";
pub const LABEL: &str = "Converted Declaration";
pub const REMARK: &str = "Generated by Automation Config Converter";
pub const USER_AGENT: &str = concat!("AUTOMATION-CONFIG-CONVERTER/", env!("CARGO_PKG_VERSION"));

/// Tenant every device-level object belongs to.
pub const DEVICE_TENANT: &str = "Common";

/// Top-level fields that are part of the skeleton rather than tenants.
const SKELETON_KEYS: &[&str] = &[
    "class",
    "schemaVersion",
    "id",
    "label",
    "remark",
    "controls",
    "async",
];

/// Which declaration schema the output targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarationKind {
    /// Application services declaration (`class: ADC`).
    #[default]
    Adc,
    /// Device onboarding declaration (`class: Device`).
    Device,
}

/// Fixed top-level fields every declaration starts with.
pub fn declaration_base(kind: DeclarationKind, controls: bool) -> Map<String, Value> {
    let mut base = Map::new();
    match kind {
        DeclarationKind::Adc => {
            base.insert("class".into(), json!("ADC"));
            base.insert("schemaVersion".into(), json!(ADC_SCHEMA_VERSION));
        }
        DeclarationKind::Device => {
            base.insert("class".into(), json!("Device"));
            base.insert("schemaVersion".into(), json!(DEVICE_SCHEMA_VERSION));
            base.insert("async".into(), json!(true));
        }
    }
    base.insert("id".into(), json!(format!("urn:uuid:{}", Uuid::new_v4())));
    base.insert("label".into(), json!(LABEL));
    base.insert("remark".into(), json!(REMARK));

    if controls {
        let controls = match kind {
            DeclarationKind::Adc => json!({
                "class": "Controls",
                "trace": true,
                "logLevel": "debug"
            }),
            DeclarationKind::Device => json!({
                "class": "Controls",
                "userAgent": USER_AGENT,
                "trace": true,
                "traceResponse": true,
                "dryRun": false
            }),
        };
        base.insert("controls".into(), controls);
    }
    base
}

/// Names of the tenants present in a declaration.
pub fn tenant_names(declaration: &Map<String, Value>) -> Vec<&str> {
    declaration
        .iter()
        .filter(|(key, value)| !SKELETON_KEYS.contains(&key.as_str()) && value.is_object())
        .map(|(key, _)| key.as_str())
        .collect()
}

/// Get or create a `Tenant` container.
pub fn tenant_mut<'a>(
    declaration: &'a mut Map<String, Value>,
    tenant: &str,
) -> &'a mut Map<String, Value> {
    container_mut(declaration, tenant, || json!({ "class": "Tenant" }))
}

/// Get or create an `Application` container inside a tenant.
pub fn application_mut<'a>(
    declaration: &'a mut Map<String, Value>,
    tenant: &str,
    application: &str,
) -> &'a mut Map<String, Value> {
    let template = if application == SHARED_APPLICATION {
        "shared"
    } else {
        "generic"
    };
    let tenant = tenant_mut(declaration, tenant);
    container_mut(tenant, application, || {
        json!({ "class": "Application", "template": template })
    })
}

fn container_mut<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
    create: impl Fn() -> Value,
) -> &'a mut Map<String, Value> {
    let slot = parent.entry(key.to_string()).or_insert_with(&create);
    if !slot.is_object() {
        *slot = create();
    }
    match slot {
        Value::Object(map) => map,
        _ => unreachable!("container slot was just replaced by an object"),
    }
}
