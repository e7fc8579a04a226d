//! The `convert` subcommand.
//!
//! ## Pipeline
//!
//! 1. **Guard**: output paths must not name an input or each other
//! 2. **Parse**: concatenate and parse the source files
//! 3. **Rules**: built-in table for the declaration kind, plus custom rules
//! 4. **Convert**: build the declaration from the parsed tree
//! 5. **Prune**: drop schema defaults when `--schema` is given
//! 6. **Write**: pretty JSON declaration, optional report, summary line

use std::fs;
use std::path::Path;

use acc_convert::conversion_summary::{
    render as render_conversion_summary, summarize as summarize_conversion,
};
use acc_convert::engine::{convert, ConvertOptions};
use acc_convert::property_map::load_registry;
use acc_convert::prune::{prune_in_place, SchemaResolver};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use tmsh_conf_core::parse_files;
use tracing::info;

use crate::cli::ConvertArgs;
use crate::path_guard::ensure_outputs_distinct;

#[derive(Debug, Serialize)]
struct ConversionReport<'a> {
    converted: &'a [String],
    unsupported: &'a [String],
    parse_warnings: &'a [String],
    warnings: &'a [String],
}

/// Execute the conversion workflow for the given arguments.
///
/// # Errors
///
/// Returns error if:
/// - An output path matches an input path or another output
/// - A source file cannot be read or has mismatched braces
/// - The custom rule table or the schema cannot be loaded
/// - The declaration or report cannot be written
pub fn run_convert(args: ConvertArgs) -> Result<()> {
    let outputs: Vec<&Path> = std::iter::once(args.output.as_path())
        .chain(args.report.as_deref())
        .collect();
    ensure_outputs_distinct(&outputs, &args.files)?;

    let parsed = parse_files(&args.files).with_context(|| {
        format!(
            "failed to parse {}",
            args.files
                .iter()
                .map(|path| path.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;
    info!(objects = parsed.nodes.len(), "parsed source configuration");

    let kind = args.declaration.into();
    let table = load_registry(kind, args.custom_properties.as_deref())
        .context("failed to load conversion rules")?;

    let options = ConvertOptions {
        declaration: kind,
        controls: args.controls,
    };
    let mut conversion = convert(&parsed, &table, options);

    if let Some(schema_path) = &args.schema {
        let schema = load_schema(schema_path)?;
        prune_in_place(&mut conversion.declaration, &SchemaResolver::new(&schema));
    }

    let json = serde_json::to_string_pretty(&conversion.declaration)?;
    fs::write(&args.output, format!("{json}\n"))
        .with_context(|| format!("failed to write declaration {}", args.output.display()))?;

    if let Some(report_path) = &args.report {
        let report = ConversionReport {
            converted: &conversion.converted,
            unsupported: &conversion.unsupported,
            parse_warnings: &parsed.warnings,
            warnings: &conversion.warnings,
        };
        fs::write(report_path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("failed to write report {}", report_path.display()))?;
    }

    for warning in parsed.warnings.iter().chain(conversion.warnings.iter()) {
        eprintln!("{} {warning}", "warning:".yellow());
    }
    for skipped in &conversion.unsupported {
        eprintln!("{} {skipped}", "unsupported:".dimmed());
    }

    println!(
        "{}",
        render_conversion_summary(summarize_conversion(&conversion))
    );
    Ok(())
}

fn load_schema(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse schema {}", path.display()))
}
