use std::fs;
use std::mem;
use std::path::Path;

use thiserror::Error;
use tracing::warn;

use crate::lexer::{
    find_unescaped, is_quote_closed, opening_quote, resolve_escapes, tokenize, unquote, Token,
};
use crate::tree::{ConfMap, ConfValue, ConfigNode, ParsedConfig};

/// Object keywords whose body is a script captured verbatim.
pub const SCRIPT_KEYWORDS: [&str; 4] = ["ltm rule", "gtm rule", "pem irule", "sys icall script"];

/// Header prefixes whose whole block is discarded.
pub const SKIPPED_SECTIONS: [&str; 2] = ["cli script", "sys crypto cert-order-manager"];

/// Errors that can occur while reading or parsing configuration text.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A block was closed at the wrong indentation or never closed.
    #[error("Missing or mis-indented '}}' for line: '{line}'")]
    MisindentedBrace { line: String },
    /// Failed to read an input file.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Parse configuration text into a [`ParsedConfig`].
///
/// Only brace/indentation mismatches are fatal. Lines that fit no grammar
/// rule are reported once each through `tracing` and in
/// [`ParsedConfig::warnings`], then skipped.
pub fn parse(text: &str) -> Result<ParsedConfig, ParseError> {
    let normalized = text.replace("\r\n", "\n");
    let mut parser = Parser::default();
    for (idx, line) in normalized.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        parser.feed(idx + 1, line)?;
    }
    parser.finish()
}

/// Read files in order and concatenate their contents.
pub fn read_files<P: AsRef<Path>>(paths: &[P]) -> Result<String, ParseError> {
    let mut out = String::new();
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&text);
    }
    Ok(out)
}

/// Read and parse one or more configuration files as a single document.
pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<ParsedConfig, ParseError> {
    parse(&read_files(paths)?)
}

#[derive(Default)]
enum Mode {
    /// Structure follows indentation and line grammar.
    #[default]
    Indentation,
    /// Inside a quoted value spanning several lines.
    Quoted(QuotedValue),
    /// Counting braces through a script body that is kept.
    Script(RawBlock),
    /// Counting braces through a section that is dropped.
    Skipped(RawBlock),
}

struct QuotedValue {
    key: String,
    quote: char,
    text: String,
}

struct RawBlock {
    opening: String,
    keyword: String,
    path: String,
    line: usize,
    depth: usize,
    body: Vec<String>,
}

impl RawBlock {
    fn into_node(self) -> ConfigNode {
        ConfigNode {
            keyword: self.keyword,
            path: self.path,
            header: self.opening,
            line: self.line,
            body: ConfValue::Raw(self.body.join("\n")),
        }
    }
}

enum Owner {
    Object {
        keyword: String,
        path: String,
        line: usize,
    },
    Named(String),
    Unnamed,
}

struct Frame {
    opening: String,
    indent: usize,
    owner: Owner,
    map: ConfMap,
    entries: Vec<(String, ConfValue)>,
}

impl Frame {
    fn new(opening: &str, indent: usize, owner: Owner) -> Self {
        Self {
            opening: opening.to_string(),
            indent,
            owner,
            map: ConfMap::new(),
            entries: Vec::new(),
        }
    }
}

#[derive(Default)]
struct Parser {
    mode: Mode,
    stack: Vec<Frame>,
    nodes: Vec<ConfigNode>,
    warnings: Vec<String>,
}

impl Parser {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        match mem::take(&mut self.mode) {
            Mode::Indentation => self.indentation_line(line_no, line)?,
            Mode::Quoted(value) => self.quoted_line(value, line),
            Mode::Script(block) => self.raw_line(block, line, true),
            Mode::Skipped(block) => self.raw_line(block, line, false),
        }
        Ok(())
    }

    fn finish(self) -> Result<ParsedConfig, ParseError> {
        if let Mode::Script(block) | Mode::Skipped(block) = self.mode {
            return Err(ParseError::MisindentedBrace {
                line: block.opening,
            });
        }
        if let Some(frame) = self.stack.last() {
            return Err(ParseError::MisindentedBrace {
                line: frame.opening.clone(),
            });
        }
        Ok(ParsedConfig {
            nodes: self.nodes,
            warnings: self.warnings,
        })
    }

    fn indentation_line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(());
        }
        let indent = line.len() - line.trim_start().len();

        let Some(frame) = self.stack.last() else {
            return self.top_level_line(line_no, line, trimmed, indent);
        };

        if trimmed == "}" {
            if indent == frame.indent {
                self.close_frame();
                return Ok(());
            }
            return Err(ParseError::MisindentedBrace {
                line: frame.opening.clone(),
            });
        }

        if indent <= frame.indent {
            self.unrecognized(trimmed);
            return Ok(());
        }

        self.body_line(line, trimmed, indent);
        Ok(())
    }

    fn top_level_line(
        &mut self,
        line_no: usize,
        line: &str,
        trimmed: &str,
        indent: usize,
    ) -> Result<(), ParseError> {
        if trimmed == "}" {
            return Err(ParseError::MisindentedBrace {
                line: line.to_string(),
            });
        }
        if indent > 0 {
            self.unrecognized(trimmed);
            return Ok(());
        }

        let tokens = tokenize(trimmed);
        let n = tokens.len();
        if n >= 2 && tokens[n - 1].is("{") {
            let (keyword, path) = split_header(&tokens[..n - 1]);
            self.open_object(line_no, line, keyword, path);
        } else if n >= 3 && tokens[n - 2].is("{") && tokens[n - 1].is("}") {
            let (keyword, path) = split_header(&tokens[..n - 2]);
            if SKIPPED_SECTIONS.iter().any(|p| keyword.starts_with(p)) {
                return Ok(());
            }
            let body = if SCRIPT_KEYWORDS.contains(&keyword.as_str()) {
                ConfValue::Raw(String::new())
            } else {
                ConfValue::Map(ConfMap::new())
            };
            self.nodes.push(ConfigNode {
                keyword,
                path,
                header: line.to_string(),
                line: line_no,
                body,
            });
        } else {
            self.unrecognized(trimmed);
        }
        Ok(())
    }

    fn open_object(&mut self, line_no: usize, line: &str, keyword: String, path: String) {
        let raw = |keyword: String, path: String| RawBlock {
            opening: line.to_string(),
            keyword,
            path,
            line: line_no,
            depth: 1,
            body: Vec::new(),
        };

        if SKIPPED_SECTIONS.iter().any(|p| keyword.starts_with(p)) {
            self.mode = Mode::Skipped(raw(keyword, path));
        } else if SCRIPT_KEYWORDS.contains(&keyword.as_str()) {
            self.mode = Mode::Script(raw(keyword, path));
        } else {
            self.stack.push(Frame::new(
                line,
                0,
                Owner::Object {
                    keyword,
                    path,
                    line: line_no,
                },
            ));
        }
    }

    fn body_line(&mut self, line: &str, trimmed: &str, indent: usize) {
        let tokens = tokenize(trimmed);
        let n = tokens.len();
        let first = tokens[0];
        let last = tokens[n - 1];

        if first.is("{") {
            match n {
                1 => self.stack.push(Frame::new(line, indent, Owner::Unnamed)),
                2 if last.is("}") => {
                    if let Some(frame) = self.stack.last_mut() {
                        frame
                            .entries
                            .push((trimmed.to_string(), ConfValue::Map(ConfMap::new())));
                    }
                }
                _ => self.unrecognized(trimmed),
            }
            return;
        }

        if last.is("{") {
            let name = unquote(trimmed[..last.start].trim_end()).to_string();
            self.stack
                .push(Frame::new(line, indent, Owner::Named(name)));
            return;
        }

        let key = unquote(first.text).to_string();
        if n >= 3 && tokens[1].is("{") && last.is("}") {
            let value = if n == 3 {
                ConfValue::Map(ConfMap::new())
            } else {
                ConfValue::List(
                    tokens[2..n - 1]
                        .iter()
                        .map(|t| ConfValue::Str(t.text.to_string()))
                        .collect(),
                )
            };
            self.insert_property(key, value);
            return;
        }

        let value = trimmed[first.end()..].trim_start();
        match opening_quote(value) {
            Some(quote) if !is_quote_closed(value) => {
                self.mode = Mode::Quoted(QuotedValue {
                    key,
                    quote,
                    text: value.to_string(),
                });
            }
            Some(_) => self.insert_property(key, ConfValue::Str(resolve_escapes(value))),
            None => self.insert_property(key, ConfValue::Str(value.to_string())),
        }
    }

    fn quoted_line(&mut self, mut value: QuotedValue, line: &str) {
        value.text.push('\n');
        value.text.push_str(line.trim_end());
        if find_unescaped(line, value.quote).is_some() {
            let text = resolve_escapes(&value.text);
            self.insert_property(value.key, ConfValue::Str(text));
        } else {
            self.mode = Mode::Quoted(value);
        }
    }

    fn raw_line(&mut self, mut block: RawBlock, line: &str, keep: bool) {
        match closing_offset(line, &mut block.depth) {
            Some(offset) => {
                let head = line[..offset].trim_end();
                if keep {
                    if !head.trim().is_empty() {
                        block.body.push(head.to_string());
                    }
                    self.nodes.push(block.into_node());
                }
            }
            None => {
                if keep {
                    block.body.push(line.to_string());
                    self.mode = Mode::Script(block);
                } else {
                    self.mode = Mode::Skipped(block);
                }
            }
        }
    }

    fn close_frame(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let Frame {
            opening,
            owner,
            map,
            entries,
            ..
        } = frame;

        let value = if entries.is_empty() {
            ConfValue::Map(map)
        } else if map.is_empty() {
            ConfValue::List(entries.into_iter().map(|(_, value)| value).collect())
        } else {
            // Unnamed entries mixed with named properties have no representation.
            for (entry_opening, _) in &entries {
                self.unrecognized(entry_opening);
            }
            ConfValue::Map(map)
        };

        match owner {
            Owner::Object {
                keyword,
                path,
                line,
            } => self.nodes.push(ConfigNode {
                keyword,
                path,
                header: opening,
                line,
                body: value,
            }),
            Owner::Named(name) => self.insert_property(name, value),
            Owner::Unnamed => {
                if let Some(parent) = self.stack.last_mut() {
                    parent.entries.push((opening, value));
                }
            }
        }
    }

    fn insert_property(&mut self, key: String, value: ConfValue) {
        if let Some(frame) = self.stack.last_mut() {
            frame.map.insert(key, value);
        }
    }

    fn unrecognized(&mut self, text: &str) {
        let message = format!("UNRECOGNIZED LINE: '{}'", text.trim());
        warn!("{message}");
        self.warnings.push(message);
    }
}

/// Split header tokens into keyword and path.
///
/// The path is the last token when it is absolute or quoted; quoted paths
/// have their spaces replaced by underscores.
fn split_header(tokens: &[Token<'_>]) -> (String, String) {
    let join = |tokens: &[Token<'_>]| {
        tokens
            .iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join(" ")
    };

    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() && last.text.starts_with('/') => {
            (join(rest), last.text.to_string())
        }
        Some((last, rest)) if !rest.is_empty() && opening_quote(last.text).is_some() => {
            (join(rest), unquote(last.text).replace(' ', "_"))
        }
        _ => (join(tokens), String::new()),
    }
}

/// Advance brace depth through `line`; return the offset of the brace that
/// brings it back to zero.
fn closing_offset(line: &str, depth: &mut usize) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '{' => *depth += 1,
            '}' => {
                *depth = depth.saturating_sub(1);
                if *depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}
