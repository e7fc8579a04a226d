//! Parsing primitives for indentation-delimited appliance configuration text.
//!
//! The grammar is line oriented: object headers open blocks, property lines
//! carry `key value` pairs, and closing braces must line up with their
//! header. Script objects switch the parser into raw brace counting so their
//! bodies are kept verbatim.

pub mod format;
pub mod lexer;
pub mod parser;
pub mod tree;

pub use format::{render_tree, to_json};
pub use lexer::{tokenize, unquote};
pub use parser::{parse, parse_files, read_files, ParseError};
pub use tree::{ConfMap, ConfValue, ConfigNode, ParsedConfig};
