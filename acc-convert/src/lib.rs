//! Conversion of appliance configuration text into declarative JSON.
//!
//! The parser lives in `tmsh-conf-core`; this crate owns everything that
//! knows about the target declaration: rule tables, path and reference
//! resolution, per-kind transforms, declaration assembly and pruning.
//!
//! # Architecture
//!
//! ## Rules
//!
//! - [`property_map`]: Built-in TOML rule tables and the custom-table merge
//! - [`kind`]: Object kinds derived from source keywords
//!
//! ## Conversion
//!
//! - [`engine`]: Walks the parsed tree, dispatches per kind, places output
//! - [`transform`]: Per-kind handlers and value transforms
//! - [`location`]: Tenant / application / name derivation from paths
//! - [`refs`]: Pointers to built-in and converted objects
//! - [`declaration`]: Declaration skeleton and container helpers
//!
//! ## Post-processing
//!
//! - [`prune`]: Removes values equal to their schema default
//! - [`conversion_summary`]: One-line statistics for the CLI
//!
//! # Workflow
//!
//! 1. **Read** one or more source files and concatenate them
//! 2. **Parse** the text into a [`tmsh_conf_core::ParsedConfig`]
//! 3. **Load** the rule table for the declaration kind, merging custom rules
//! 4. **Convert** every supported object into the declaration
//! 5. **Prune** defaults when a schema document is available
//!
//! # Examples
//!
//! ```ignore
//! use acc_convert::engine::{convert, ConvertOptions};
//! use acc_convert::property_map::load_registry;
//! use acc_convert::declaration::DeclarationKind;
//! use tmsh_conf_core::parse_files;
//!
//! let parsed = parse_files(&["bigip.conf"])?;
//! let table = load_registry(DeclarationKind::Adc, None)?;
//! let conversion = convert(&parsed, &table, ConvertOptions::default());
//! println!("{}", serde_json::to_string_pretty(&conversion.declaration)?);
//! ```

pub mod conversion_summary;
pub mod declaration;
pub mod engine;
pub mod kind;
pub mod location;
pub mod property_map;
pub mod prune;
pub mod refs;
pub mod transform;
