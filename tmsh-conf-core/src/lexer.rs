/// Characters that open and close a quoted string.
pub const QUOTES: [char; 3] = ['"', '\'', '`'];

/// A whitespace-delimited token and its byte offset in the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl Token<'_> {
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// Whether the token is a single structural brace.
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }
}

/// Split a line on whitespace, keeping quoted runs (and any braces in them)
/// inside one token.
pub fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == open {
                quote = None;
            }
            continue;
        }

        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(Token {
                    text: &line[s..idx],
                    start: s,
                });
            }
            continue;
        }

        if start.is_none() {
            start = Some(idx);
            if QUOTES.contains(&ch) {
                quote = Some(ch);
            }
        }
    }

    if let Some(s) = start {
        tokens.push(Token {
            text: &line[s..],
            start: s,
        });
    }
    tokens
}

/// Return the quote character a value opens with, if any.
pub fn opening_quote(value: &str) -> Option<char> {
    value.chars().next().filter(|ch| QUOTES.contains(ch))
}

/// Byte offset of the first unescaped `quote` in `text`.
pub fn find_unescaped(text: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            return Some(idx);
        }
    }
    None
}

/// Whether a quoted value is closed on the line it starts on.
pub fn is_quote_closed(value: &str) -> bool {
    match opening_quote(value) {
        Some(quote) => find_unescaped(&value[quote.len_utf8()..], quote).is_some(),
        None => true,
    }
}

/// Strip one level of matching quotes.
pub fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && QUOTES.contains(&first) => {
            &text[first.len_utf8()..text.len() - last.len_utf8()]
        }
        _ => text,
    }
}

/// Resolve backslash escapes of quote characters and of the backslash itself.
/// Any other backslash sequence is kept verbatim.
pub fn resolve_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '\\' || QUOTES.contains(&next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{is_quote_closed, resolve_escapes, tokenize, unquote};

    fn texts(line: &str) -> Vec<&str> {
        tokenize(line).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn tokenize_keeps_quoted_braces_together() {
        assert_eq!(
            texts(r#"description "a {b} c" {"#),
            vec!["description", r#""a {b} c""#, "{"]
        );
    }

    #[test]
    fn tokenize_respects_escaped_quotes() {
        assert_eq!(
            texts(r#"key "say \"hi\" now" tail"#),
            vec!["key", r#""say \"hi\" now""#, "tail"]
        );
    }

    #[test]
    fn unquote_handles_all_quote_styles() {
        assert_eq!(unquote("\"Test string\""), "Test string");
        assert_eq!(unquote("'Test string'"), "Test string");
        assert_eq!(unquote("`Test string`"), "Test string");
        assert_eq!(unquote("Test string"), "Test string");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn quote_closure_detection() {
        assert!(is_quote_closed("\"done\""));
        assert!(is_quote_closed("bare"));
        assert!(!is_quote_closed("\"still open"));
        assert!(!is_quote_closed(r#""escaped \" quote"#));
    }

    #[test]
    fn escapes_resolve_only_quotes_and_backslash() {
        assert_eq!(resolve_escapes(r#"a \"b\" \\ \d"#), r#"a "b" \ \d"#);
    }
}
