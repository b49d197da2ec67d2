//! Permissive reader for script-literal dictionary files.
//!
//! Hand-maintained `export default { ... }` / `module.exports = { ... }` files
//! are rarely strict JSON: keys are unquoted, strings use single quotes or
//! backticks, trailing commas and comments are everywhere, and files are
//! sometimes truncated. Nothing here evaluates code; the object literal is
//! tokenized with a small grammar that covers data-only literals.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde_json::{Map, Number, Value};

static EXPORT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:export\s+default|module\.exports\s*=|exports\s*=)\s*").unwrap()
});

static EXPORTED_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_$][\w$]*)").unwrap());

/// Syntax error in an object literal, with the byte offset where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for LiteralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.offset)
    }
}

impl std::error::Error for LiteralError {}

/// Byte offset of the `{` that opens the exported object literal.
///
/// Recognizes `export default {`, `module.exports = {`, `exports = {`,
/// `export default name` (resolved to `const name = {`) and falls back to the
/// first `{` of the file for bare object files.
pub fn locate_object_start(content: &str) -> Option<usize> {
    if let Some(found) = EXPORT_REGEX.find(content) {
        let after = &content[found.end()..];
        if after.starts_with('{') {
            return Some(found.end());
        }
        if let Some(name) = EXPORTED_NAME_REGEX.captures(after).and_then(|c| c.get(1)) {
            let declaration = format!(
                r"\b(?:const|let|var)\s+{}\b[^=]*=\s*\{{",
                regex::escape(name.as_str())
            );
            if let Ok(re) = Regex::new(&declaration)
                && let Some(decl) = re.find(content)
            {
                return Some(decl.end() - 1);
            }
        }
        if let Some(brace) = after.find('{') {
            return Some(found.end() + brace);
        }
    }
    content.find('{')
}

/// The balanced `{ ... }` slice starting at `start`.
///
/// Braces inside strings and comments are ignored. When the file ends before
/// the object closes, returns `Err` with the number of missing closing braces.
pub fn balanced_object(content: &str, start: usize) -> Result<&str, usize> {
    let Some(body) = content.get(start..) else {
        return Err(0);
    };
    let mut depth = 0usize;
    for (offset, c) in CodeChars::new(body) {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Ok(&body[..=offset]);
                }
            }
            _ => {}
        }
    }
    Err(depth)
}

/// Parse a complete object literal (the whole input must be one object).
pub fn parse_object_literal(src: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser::new(src, false);
    parser.skip_trivia()?;
    if parser.peek() != Some('{') {
        return Err(parser.error_here("expected '{'"));
    }
    let value = parser.parse_object()?;
    parser.skip_trivia()?;
    if parser.peek() == Some(';') {
        parser.pos += 1;
        parser.skip_trivia()?;
    }
    if parser.pos < src.len() {
        return Err(parser.error_here("unexpected content after object"));
    }
    Ok(value)
}

/// Parse as much of an object literal as possible.
///
/// Stops at the first syntax error, keeps every member read before it and
/// closes all still-open containers. Returns the partial object together with
/// the error that ended parsing, if any.
pub fn recover_object_literal(src: &str) -> Option<(Value, Option<LiteralError>)> {
    let mut parser = Parser::new(src, true);
    parser.skip_trivia().ok()?;
    if parser.peek() != Some('{') {
        return None;
    }
    let value = parser.parse_object().ok()?;
    Some((value, parser.error.take()))
}

/// Text-level repair of a JS object literal into strict JSON.
///
/// Strips comments, closes an unterminated string and any unbalanced
/// braces/brackets, quotes bare property names, converts single-quoted and
/// backtick strings to double-quoted ones and removes trailing commas.
pub fn repair_to_json(src: &str) -> String {
    let mut stripped = strip_comments(src);

    let mut walker = CodeChars::new(&stripped);
    let mut open: Vec<char> = Vec::new();
    for (_, c) in walker.by_ref() {
        match c {
            '{' | '[' => open.push(c),
            '}' | ']' => {
                open.pop();
            }
            _ => {}
        }
    }
    if let Some(quote) = walker.open_quote() {
        stripped.push(quote);
    }
    while let Some(c) = open.pop() {
        stripped.push(if c == '{' { '}' } else { ']' });
    }

    normalize_to_json(&stripped)
}

// ============================================================
// Code walker
// ============================================================

/// Iterator over the characters of JS source that sit outside string
/// literals and comments, with their byte offsets.
struct CodeChars<'a> {
    src: &'a str,
    pos: usize,
    quote: Option<char>,
}

impl<'a> CodeChars<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            quote: None,
        }
    }

    /// Quote character of a string literal left open at end of input.
    fn open_quote(&self) -> Option<char> {
        self.quote
    }
}

impl Iterator for CodeChars<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rest = self.src.get(self.pos..)?;
            let c = rest.chars().next()?;

            if let Some(quote) = self.quote {
                self.pos += c.len_utf8();
                if c == '\\' {
                    if let Some(escaped) = self.src[self.pos..].chars().next() {
                        self.pos += escaped.len_utf8();
                    }
                } else if c == quote {
                    self.quote = None;
                }
                continue;
            }

            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
                continue;
            }
            if rest.starts_with("/*") {
                self.pos += rest[2..].find("*/").map(|i| i + 4).unwrap_or(rest.len());
                continue;
            }

            let at = self.pos;
            self.pos += c.len_utf8();
            if matches!(c, '\'' | '"' | '`') {
                self.quote = Some(c);
                continue;
            }
            return Some((at, c));
        }
    }
}

/// Remove `//` and `/* */` comments outside string literals.
fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut quote: Option<char> = None;
    let mut chars = src.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some((_, escaped)) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }

        let rest = &src[i..];
        if rest.starts_with("//") {
            // Keep the newline so line structure survives
            while let Some(&(_, next)) = chars.peek() {
                if next == '\n' {
                    break;
                }
                chars.next();
            }
            continue;
        }
        if rest.starts_with("/*") {
            let end = rest[2..].find("*/").map(|e| i + 2 + e + 2).unwrap_or(src.len());
            while let Some(&(j, _)) = chars.peek() {
                if j >= end {
                    break;
                }
                chars.next();
            }
            out.push(' ');
            continue;
        }

        if matches!(c, '\'' | '"' | '`') {
            quote = Some(c);
        }
        out.push(c);
    }
    out
}

/// Quote keys, normalize strings to JSON and drop trailing commas.
fn normalize_to_json(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len() + 16);
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            match c {
                '\\' => {
                    if let Some(&escaped) = chars.get(i + 1) {
                        if escaped == '\'' || escaped == '`' {
                            out.push(escaped);
                        } else {
                            out.push('\\');
                            out.push(escaped);
                        }
                        i += 1;
                    }
                }
                _ if c == q => {
                    out.push('"');
                    quote = None;
                }
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push('"');
                i += 1;
            }
            ',' => {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if !matches!(next, Some('}') | Some(']') | None) {
                    out.push(',');
                }
                i += 1;
            }
            _ if is_ident_start(c) || c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && (is_ident_part(chars[i]) || chars[i] == '.') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let next = chars[i..].iter().find(|c| !c.is_whitespace());
                if next == Some(&':') {
                    out.push('"');
                    out.push_str(&word);
                    out.push('"');
                } else if word == "undefined" {
                    out.push_str("null");
                } else {
                    out.push_str(&word);
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

// ============================================================
// Grammar-aware parser
// ============================================================

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// In recovery mode containers swallow the first error and return what
    /// they have; the error is parked here and stops every enclosing container.
    recover: bool,
    error: Option<LiteralError>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, recover: bool) -> Self {
        Self {
            src,
            pos: 0,
            recover,
            error: None,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error_here(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LiteralError> {
        loop {
            let rest = &self.src[self.pos..];
            if rest.starts_with("//") {
                self.pos += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => return Err(self.error_here("unterminated block comment")),
                }
            } else {
                match self.peek() {
                    Some(c) if c.is_whitespace() => self.pos += c.len_utf8(),
                    _ => return Ok(()),
                }
            }
        }
    }

    /// Record (recovery) or propagate (strict) a container-level error.
    fn fail(&mut self, err: LiteralError, partial: Value) -> Result<Value, LiteralError> {
        if self.recover {
            self.error.get_or_insert(err);
            Ok(partial)
        } else {
            Err(err)
        }
    }

    fn parse_value(&mut self) -> Result<Value, LiteralError> {
        self.skip_trivia()?;
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some(q @ ('\'' | '"' | '`')) => self.parse_string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => {
                self.parse_number()
            }
            Some(c) if is_ident_start(c) => {
                let start = self.pos;
                let ident = self.parse_identifier();
                match ident {
                    "true" => Ok(Value::Bool(true)),
                    "false" => Ok(Value::Bool(false)),
                    "null" | "undefined" => Ok(Value::Null),
                    other => Err(LiteralError {
                        offset: start,
                        message: format!("unsupported expression '{}'", other),
                    }),
                }
            }
            Some(c) => Err(self.error_here(format!("unexpected character '{}'", c))),
            None => Err(self.error_here("unexpected end of input")),
        }
    }

    fn parse_object(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1; // '{'
        let mut map = Map::new();
        loop {
            if let Err(err) = self.skip_trivia() {
                return self.fail(err, Value::Object(map));
            }
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Object(map));
                }
                None => {
                    let err = self.error_here("unterminated object");
                    return self.fail(err, Value::Object(map));
                }
                _ => {}
            }

            match self.parse_member() {
                Ok((key, value)) => {
                    map.insert(key, value);
                }
                Err(err) => return self.fail(err, Value::Object(map)),
            }
            if self.error.is_some() {
                // A nested container was cut short; nothing after it is trustworthy.
                return Ok(Value::Object(map));
            }

            if let Err(err) = self.skip_trivia() {
                return self.fail(err, Value::Object(map));
            }
            match self.peek() {
                Some(',') => self.pos += 1,
                Some('}') => {}
                None => {
                    let err = self.error_here("unterminated object");
                    return self.fail(err, Value::Object(map));
                }
                _ => {
                    let err = self.error_here("expected ',' or '}'");
                    return self.fail(err, Value::Object(map));
                }
            }
        }
    }

    fn parse_member(&mut self) -> Result<(String, Value), LiteralError> {
        let key = match self.peek() {
            Some(q @ ('\'' | '"' | '`')) => self.parse_string(q)?,
            Some(c) if is_ident_start(c) => self.parse_identifier().to_string(),
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '.') {
                    self.pos += 1;
                }
                self.src[start..self.pos].to_string()
            }
            Some('.') => return Err(self.error_here("spread elements are not supported")),
            Some('[') => return Err(self.error_here("computed keys are not supported")),
            Some(c) => return Err(self.error_here(format!("unexpected character '{}'", c))),
            None => return Err(self.error_here("unexpected end of input")),
        };

        self.skip_trivia()?;
        match self.peek() {
            Some(':') => self.pos += 1,
            Some(',') | Some('}') => {
                return Err(self.error_here(format!("shorthand property '{}'", key)));
            }
            _ => return Err(self.error_here("expected ':'")),
        }
        let value = self.parse_value()?;
        Ok((key, value))
    }

    fn parse_array(&mut self) -> Result<Value, LiteralError> {
        self.pos += 1; // '['
        let mut items = Vec::new();
        loop {
            if let Err(err) = self.skip_trivia() {
                return self.fail(err, Value::Array(items));
            }
            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                None => {
                    let err = self.error_here("unterminated array");
                    return self.fail(err, Value::Array(items));
                }
                _ => {}
            }

            match self.parse_value() {
                Ok(value) => items.push(value),
                Err(err) => return self.fail(err, Value::Array(items)),
            }
            if self.error.is_some() {
                return Ok(Value::Array(items));
            }

            if let Err(err) = self.skip_trivia() {
                return self.fail(err, Value::Array(items));
            }
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {}
                None => {
                    let err = self.error_here("unterminated array");
                    return self.fail(err, Value::Array(items));
                }
                _ => {
                    let err = self.error_here("expected ',' or ']'");
                    return self.fail(err, Value::Array(items));
                }
            }
        }
    }

    fn parse_identifier(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !is_ident_part(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &src[start..self.pos]
    }

    fn parse_string(&mut self, quote: char) -> Result<String, LiteralError> {
        let start = self.pos;
        self.pos += 1; // opening quote
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(LiteralError {
                    offset: start,
                    message: "unterminated string".to_string(),
                });
            };
            match c {
                _ if c == quote => return Ok(out),
                '\\' => self.parse_escape(&mut out)?,
                '$' if quote == '`' && self.peek() == Some('{') => {
                    return Err(self.error_here("template interpolation is not a literal"));
                }
                '\n' if quote != '`' => return Err(self.error_here("newline in string")),
                _ => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), LiteralError> {
        let Some(c) = self.bump() else {
            return Err(self.error_here("unterminated escape"));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            // Line continuation
            '\n' => {}
            '\r' => {
                if self.peek() == Some('\n') {
                    self.pos += 1;
                }
            }
            'x' => {
                let code = self.read_hex(2)?;
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            'u' => {
                let code = if self.peek() == Some('{') {
                    self.pos += 1;
                    let end = self.src[self.pos..]
                        .find('}')
                        .ok_or_else(|| self.error_here("unterminated unicode escape"))?;
                    let hex = &self.src[self.pos..self.pos + end];
                    let code = u32::from_str_radix(hex, 16)
                        .map_err(|_| self.error_here("invalid unicode escape"))?;
                    self.pos += end + 1;
                    code
                } else {
                    self.read_hex(4)?
                };

                if (0xD800..0xDC00).contains(&code) && self.src[self.pos..].starts_with("\\u") {
                    // High surrogate: combine with the following low surrogate
                    let saved = self.pos;
                    self.pos += 2;
                    let low = self.read_hex(4)?;
                    if (0xDC00..0xE000).contains(&low) {
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        out.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                        return Ok(());
                    }
                    self.pos = saved;
                }
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            other => out.push(other),
        }
        Ok(())
    }

    fn read_hex(&mut self, digits: usize) -> Result<u32, LiteralError> {
        let hex = self
            .src
            .get(self.pos..self.pos + digits)
            .ok_or_else(|| self.error_here("truncated escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error_here("invalid escape"))?;
        self.pos += digits;
        Ok(code)
    }

    fn parse_number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '_') {
                self.pos += 1;
            } else {
                break;
            }
        }
        let raw: String = self.src[start..self.pos]
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let text = raw.strip_prefix('+').unwrap_or(&raw);

        let invalid = || LiteralError {
            offset: start,
            message: format!("invalid number '{}'", raw),
        };

        if let Some(hex) = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
        {
            return i64::from_str_radix(hex, 16)
                .map(Value::from)
                .map_err(|_| invalid());
        }
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::from(int));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid)
    }
}
