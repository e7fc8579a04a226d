//! Conversion of a parsed configuration into a declaration.

use serde::Serialize;
use serde_json::{Map, Value};
use tmsh_conf_core::{ConfMap, ConfigNode, ParsedConfig};
use tracing::debug;

use crate::declaration::{
    application_mut, declaration_base, tenant_mut, DeclarationKind, DEVICE_TENANT,
};
use crate::kind::ObjectKind;
use crate::location::resolve_path;
use crate::property_map::PropertyMapTable;
use crate::transform::rules::apply_rules;
use crate::transform::{
    data_group, device, monitor, persist, pool, profiles, scripts, service, snat_pool, tls,
    Context, Converted, NamedObject,
};

/// Knobs for one conversion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub declaration: DeclarationKind,
    /// Add a `controls` block to the skeleton.
    pub controls: bool,
}

/// Declaration plus a record of what was and was not converted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub declaration: Value,
    /// `keyword path` of every source object that produced output.
    pub converted: Vec<String>,
    /// `keyword path` of every source object that was skipped.
    pub unsupported: Vec<String>,
    pub warnings: Vec<String>,
}

/// Convert every object of `parsed` using the rules in `table`.
///
/// Objects whose keyword has no rules, or whose kind is not modelled, are
/// skipped and listed in [`Conversion::unsupported`]. Output follows source
/// order.
pub fn convert(
    parsed: &ParsedConfig,
    table: &PropertyMapTable,
    options: ConvertOptions,
) -> Conversion {
    let mut declaration = declaration_base(options.declaration, options.controls);
    let mut ctx = Context::new(parsed, table);
    let mut converted = Vec::new();
    let mut unsupported = Vec::new();
    let empty = ConfMap::new();

    for node in &parsed.nodes {
        let kind = ObjectKind::from_keyword(&node.keyword);
        if kind.is_lookup_only() {
            continue;
        }
        if kind == ObjectKind::Unmodeled || !table.contains_key(&node.keyword) {
            debug!(object = %node.key(), line = node.line, "skipping unsupported object");
            unsupported.push(node.key());
            continue;
        }

        let properties = apply_rules(table, &node.keyword, node.properties().unwrap_or(&empty));
        let Some(output) = dispatch(kind, node, properties, &mut ctx) else {
            unsupported.push(node.key());
            continue;
        };

        if place(&mut declaration, options.declaration, kind, node, output, &mut ctx) {
            converted.push(node.key());
        }
    }

    Conversion {
        declaration: Value::Object(declaration),
        converted,
        unsupported,
        warnings: ctx.warnings,
    }
}

fn dispatch(
    kind: ObjectKind,
    node: &ConfigNode,
    properties: Map<String, Value>,
    ctx: &mut Context,
) -> Option<Converted> {
    match kind {
        ObjectKind::Pool => Some(pool::convert(node, properties, ctx)),
        ObjectKind::VirtualServer => Some(service::convert(node, properties, ctx)),
        ObjectKind::Monitor => monitor::convert(node, properties, ctx),
        ObjectKind::HttpProfile
        | ObjectKind::TcpProfile
        | ObjectKind::UdpProfile
        | ObjectKind::FastL4Profile
        | ObjectKind::OneConnectProfile
        | ObjectKind::HttpCompressionProfile => profiles::convert(kind, node, properties, ctx),
        ObjectKind::ClientSslProfile => Some(tls::convert_client_ssl(node, properties, ctx)),
        ObjectKind::ServerSslProfile => Some(tls::convert_server_ssl(node, properties)),
        ObjectKind::Persistence => persist::convert(node, properties, ctx),
        ObjectKind::Rule => scripts::convert("iRule", node, properties, ctx),
        ObjectKind::GslbRule => scripts::convert("GSLB_iRule", node, properties, ctx),
        ObjectKind::SnatPool => snat_pool::convert(node, properties, ctx),
        ObjectKind::DataGroup => data_group::convert(node, properties, ctx),
        ObjectKind::GlobalSettings
        | ObjectKind::Dns
        | ObjectKind::Ntp
        | ObjectKind::Vlan
        | ObjectKind::SelfIp
        | ObjectKind::Route => device::convert(kind, node, properties, ctx),
        ObjectKind::Node | ObjectKind::VirtualAddress | ObjectKind::Unmodeled => {
            debug!(object = %node.key(), "no handler for object kind");
            None
        }
    }
}

/// Store converted output in the declaration. Returns whether anything was
/// stored.
fn place(
    declaration: &mut Map<String, Value>,
    declaration_kind: DeclarationKind,
    kind: ObjectKind,
    node: &ConfigNode,
    output: Converted,
    ctx: &mut Context,
) -> bool {
    let device_level = declaration_kind == DeclarationKind::Device && kind.is_device_level();
    match output {
        Converted::TenantSettings(settings) => {
            tenant_mut(declaration, DEVICE_TENANT).extend(settings);
            true
        }
        Converted::Objects(objects) => {
            let location = resolve_path(&node.path);
            let container = if device_level {
                tenant_mut(declaration, DEVICE_TENANT)
            } else {
                application_mut(
                    declaration,
                    &location.tenant,
                    location.application_or_shared(),
                )
            };

            let mut stored = false;
            for NamedObject { name, object } in objects {
                if name.is_empty() {
                    ctx.warn(node, "object has no name");
                    continue;
                }
                if container.contains_key(&name) {
                    ctx.warn(node, format!("{name} already exists; keeping the first one"));
                    continue;
                }
                container.insert(name, Value::Object(object));
                stored = true;
            }
            stored
        }
    }
}
