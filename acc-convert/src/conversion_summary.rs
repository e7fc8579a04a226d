use serde::Serialize;
use serde_json::Value;

use crate::engine::Conversion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionSummary {
    pub tenants: usize,
    pub applications: usize,
    pub objects: usize,
    pub unsupported: usize,
    pub warnings: usize,
}

pub fn summarize(conversion: &Conversion) -> ConversionSummary {
    let tenants: Vec<&Value> = containers(&conversion.declaration, "Tenant").collect();
    let applications: Vec<&Value> = tenants
        .iter()
        .flat_map(|tenant| containers(*tenant, "Application"))
        .collect();

    ConversionSummary {
        tenants: tenants.len(),
        applications: applications.len(),
        objects: tenants
            .iter()
            .chain(applications.iter())
            .map(|container| count_objects(container))
            .sum(),
        unsupported: conversion.unsupported.len(),
        warnings: conversion.warnings.len(),
    }
}

pub fn render(summary: ConversionSummary) -> String {
    format!(
        "convert_summary tenants={} applications={} objects={} unsupported={} warnings={}",
        summary.tenants,
        summary.applications,
        summary.objects,
        summary.unsupported,
        summary.warnings
    )
}

fn containers<'a>(parent: &'a Value, class: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
    parent
        .as_object()
        .into_iter()
        .flat_map(|map| map.values())
        .filter(move |child| child.get("class").and_then(Value::as_str) == Some(class))
}

/// Classed children that are not themselves containers.
fn count_objects(container: &Value) -> usize {
    container
        .as_object()
        .map(|map| {
            map.values()
                .filter_map(|child| child.get("class").and_then(Value::as_str))
                .filter(|class| *class != "Application" && *class != "Tenant")
                .count()
        })
        .unwrap_or(0)
}
