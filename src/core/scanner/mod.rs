//! Candidate scanner: finds translatable literal spans in source text.
//!
//! Each sub-scan works independently over the same buffer and the results are
//! concatenated in a fixed order (object properties, string variables, template
//! literals, interpolations, markup attributes, markup text). Overlaps between
//! sub-scans are not deduplicated.

pub mod filter;

use std::{ops::Range, sync::Arc, sync::LazyLock};

use regex::{Captures, Regex};

pub use filter::{Alphabetic, ScriptRange, TextFilter, is_admissible};

use crate::core::{
    candidate::{Candidate, CandidateContext},
    markup::{self, AttributeValue},
};

/// Attributes that never carry user-facing text.
pub const ATTRIBUTE_DENYLIST: &[&str] = &[
    "style", "class", "id", "href", "src", "type", "name", "value", "disabled",
];

static STRING_VARIABLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::[^=;\n]+)?=\s*(?:'(?P<sq>(?:[^'\\\n]|\\.)*)'|"(?P<dq>(?:[^"\\\n]|\\.)*)")"#,
    )
    .unwrap()
});

static TEMPLATE_LITERAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)`(?P<body>(?:[^`\\]|\\.)*)`").unwrap());

static INTERPOLATION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(?P<expr>.*?)\}\}").unwrap());

static ACCESS_CHAIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][\w$]*(?:\s*\??\.\s*[A-Za-z_$][\w$]*|\[[^\]]*\])*$").unwrap());

/// Scan with the default CJK filter at base offset 0.
pub fn scan(text: &str, property_names: &[String]) -> Vec<Candidate> {
    Scanner::new(property_names, Arc::new(ScriptRange::cjk())).scan(text)
}

#[derive(Clone)]
struct PropertyPattern {
    name: String,
    regex: Regex,
}

/// Configured scanner. Cheap to clone; one clone per buffer is the usual pattern.
#[derive(Clone)]
pub struct Scanner {
    properties: Vec<PropertyPattern>,
    filter: Arc<dyn TextFilter>,
    base: usize,
    source_file: Option<String>,
    markup: bool,
}

impl Scanner {
    pub fn new(property_names: &[String], filter: Arc<dyn TextFilter>) -> Self {
        let properties = property_names
            .iter()
            .filter(|name| !name.is_empty())
            .filter_map(|name| {
                let escaped = regex::escape(name);
                let pattern = format!(
                    r#"(?:'{0}'|"{0}"|{0})\s*:\s*(?:'(?P<sq>(?:[^'\\\n]|\\.)*)'|"(?P<dq>(?:[^"\\\n]|\\.)*)")"#,
                    escaped
                );
                match Regex::new(&pattern) {
                    Ok(regex) => Some(PropertyPattern {
                        name: name.clone(),
                        regex,
                    }),
                    Err(err) => {
                        log::warn!("unusable property name \"{}\": {}", name, err);
                        None
                    }
                }
            })
            .collect();

        Self {
            properties,
            filter,
            base: 0,
            source_file: None,
            markup: true,
        }
    }

    /// Offset added to every reported position.
    pub fn with_base(mut self, base: usize) -> Self {
        self.base = base;
        self
    }

    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    /// Enable or disable the markup sub-scans (interpolation, attributes, text).
    pub fn with_markup(mut self, markup: bool) -> Self {
        self.markup = markup;
        self
    }

    pub fn scan(&self, text: &str) -> Vec<Candidate> {
        let mut found = Vec::new();
        self.scan_object_properties(text, &mut found);
        self.scan_string_variables(text, &mut found);
        self.scan_template_literals(text, &mut found);
        if self.markup {
            self.scan_interpolations(text, &mut found);
            self.scan_markup_attributes(text, &mut found);
            self.scan_markup_text(text, &mut found);
        }

        found
            .into_iter()
            .map(|mut candidate| {
                candidate.start += self.base;
                candidate.end += self.base;
                if let Some(enclosing) = candidate.enclosing.as_mut() {
                    *enclosing = enclosing.start + self.base..enclosing.end + self.base;
                }
                candidate.source_file = self.source_file.clone();
                candidate
            })
            .collect()
    }

    fn admits(&self, text: &str) -> bool {
        is_admissible(text, self.filter.as_ref())
    }

    /// Build a quoted-literal candidate, enforcing the shared invariants.
    fn quoted(
        &self,
        text: &str,
        quote: char,
        content: Range<usize>,
        context: CandidateContext,
    ) -> Option<Candidate> {
        let value = &text[content.clone()];
        if content.is_empty() || value.contains(quote) {
            return None;
        }
        if !self.admits(value) {
            log::trace!("skipped {} \"{}\": not admissible", context, value);
            return None;
        }
        Some(Candidate::new(value, content, context).with_quote(quote))
    }

    fn scan_object_properties(&self, text: &str, found: &mut Vec<Candidate>) {
        for property in &self.properties {
            for caps in property.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                let preceded_by_identifier = text[..whole.start()]
                    .chars()
                    .next_back()
                    .is_some_and(is_identifier_char);
                if preceded_by_identifier {
                    continue;
                }
                let Some((quote, content)) = quoted_group(&caps) else {
                    continue;
                };
                if let Some(candidate) =
                    self.quoted(text, quote, content, CandidateContext::ObjectProperty)
                {
                    found.push(
                        candidate
                            .with_meta(property.name.clone())
                            .with_enclosing(whole.range()),
                    );
                }
            }
        }
    }

    fn scan_string_variables(&self, text: &str, found: &mut Vec<Candidate>) {
        for caps in STRING_VARIABLE_REGEX.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
                continue;
            };
            let Some((quote, content)) = quoted_group(&caps) else {
                continue;
            };
            if let Some(candidate) =
                self.quoted(text, quote, content, CandidateContext::StringVariable)
            {
                found.push(
                    candidate
                        .with_meta(name.as_str())
                        .with_enclosing(whole.range()),
                );
            }
        }
    }

    fn scan_template_literals(&self, text: &str, found: &mut Vec<Candidate>) {
        for caps in TEMPLATE_LITERAL_REGEX.captures_iter(text) {
            let Some(body) = caps.name("body") else { continue };
            if body.as_str().contains("${") {
                log::trace!("skipped template literal at {}: has interpolation", body.start());
                continue;
            }
            if let Some(candidate) =
                self.quoted(text, '`', body.range(), CandidateContext::TemplateLiteral)
            {
                found.push(candidate);
            }
        }
    }

    fn scan_interpolations(&self, text: &str, found: &mut Vec<Candidate>) {
        let region = markup::markup_region(text);
        let excluded = markup::excluded_ranges(text);

        for caps in INTERPOLATION_REGEX.captures_iter(&text[region.clone()]) {
            let (Some(whole), Some(expr)) = (caps.get(0), caps.name("expr")) else {
                continue;
            };
            let expr_start = region.start + expr.start();
            if markup::is_inside(&excluded, region.start + whole.start()) {
                continue;
            }
            match single_string_literal(expr.as_str()) {
                Ok((quote, inner)) => {
                    let content = expr_start + inner.start..expr_start + inner.end;
                    if let Some(candidate) = self.quoted(
                        text,
                        quote,
                        content,
                        CandidateContext::InterpolationExpression,
                    ) {
                        let enclosing =
                            region.start + whole.start()..region.start + whole.end();
                        found.push(candidate.with_enclosing(enclosing));
                    }
                }
                Err(reason) => {
                    log::trace!("skipped interpolation at {}: {}", expr_start, reason);
                }
            }
        }
    }

    fn scan_markup_attributes(&self, text: &str, found: &mut Vec<Candidate>) {
        for tag in markup::tags(text) {
            for attr in markup::attributes(text, &tag) {
                let (bound, base_name) = match attribute_kind(&attr.name) {
                    AttributeKind::Plain(name) => (false, name),
                    AttributeKind::Bound(name) => (true, name),
                    AttributeKind::Event | AttributeKind::Directive => continue,
                };
                if is_denied_attribute(base_name) {
                    continue;
                }

                let literal = match attr.value {
                    AttributeValue::Quoted { quote, content } if !bound => {
                        if text[content.clone()].contains("{{") {
                            continue;
                        }
                        Some((quote, content))
                    }
                    AttributeValue::Quoted { content, .. }
                    | AttributeValue::Expression { content } => {
                        match single_string_literal(&text[content.clone()]) {
                            Ok((quote, inner)) => {
                                Some((quote, content.start + inner.start..content.start + inner.end))
                            }
                            Err(reason) => {
                                log::trace!("skipped bound attribute {}: {}", attr.name, reason);
                                None
                            }
                        }
                    }
                    AttributeValue::Missing => None,
                };

                let Some((quote, content)) = literal else {
                    continue;
                };
                if let Some(candidate) =
                    self.quoted(text, quote, content, CandidateContext::MarkupAttribute)
                {
                    found.push(
                        candidate
                            .with_meta(attr.name.clone())
                            .with_enclosing(attr.range.clone()),
                    );
                }
            }
        }
    }

    fn scan_markup_text(&self, text: &str, found: &mut Vec<Candidate>) {
        for gap in markup::text_nodes(text) {
            let raw = &text[gap.clone()];
            if raw.contains('{') || raw.contains('}') {
                continue;
            }
            let trimmed = raw.trim();
            if !self.admits(trimmed) {
                continue;
            }
            let start = gap.start + (raw.len() - raw.trim_start().len());
            found.push(Candidate::new(
                trimmed,
                start..start + trimmed.len(),
                CandidateContext::MarkupText,
            ));
        }
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// The `sq`/`dq` alternative that matched, with its content range.
fn quoted_group(caps: &Captures<'_>) -> Option<(char, Range<usize>)> {
    if let Some(m) = caps.name("sq") {
        Some(('\'', m.range()))
    } else {
        caps.name("dq").map(|m| ('"', m.range()))
    }
}

/// Check that `expr` is exactly one quoted string literal.
///
/// Returns the quote and the literal content range relative to `expr`, or the
/// reason it was rejected.
pub(crate) fn single_string_literal(expr: &str) -> Result<(char, Range<usize>), &'static str> {
    let trimmed = expr.trim();
    let lead = expr.len() - expr.trim_start().len();

    if let Some(quote) = trimmed.chars().next().filter(|c| matches!(c, '\'' | '"' | '`'))
        && trimmed.len() >= 2
        && trimmed.ends_with(quote)
    {
        let inner = &trimmed[1..trimmed.len() - 1];
        if !has_unescaped(inner, quote) && !(quote == '`' && inner.contains("${")) {
            return Ok((quote, lead + 1..lead + 1 + inner.len()));
        }
    }

    let outside = outside_quotes(trimmed);
    if outside.contains('(') {
        Err("call expression")
    } else if outside.contains('+') {
        Err("concatenation")
    } else if outside.contains('?') && !ACCESS_CHAIN_REGEX.is_match(trimmed) {
        Err("conditional")
    } else if ACCESS_CHAIN_REGEX.is_match(trimmed) {
        Err("property access")
    } else {
        Err("not a string literal")
    }
}

fn has_unescaped(text: &str, quote: char) -> bool {
    let mut escaped = false;
    for c in text.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            c if c == quote => return true,
            _ => {}
        }
    }
    false
}

/// `text` with the contents of quoted strings removed.
fn outside_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for c in text.chars() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(_) if c == '\\' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if matches!(c, '\'' | '"' | '`') => quote = Some(c),
            None => out.push(c),
        }
    }
    out
}

#[derive(Debug, PartialEq, Eq)]
enum AttributeKind<'a> {
    Plain(&'a str),
    Bound(&'a str),
    Event,
    Directive,
}

fn attribute_kind(name: &str) -> AttributeKind<'_> {
    if name.starts_with('@') || name.starts_with("v-on:") {
        AttributeKind::Event
    } else if let Some(rest) = name.strip_prefix("v-bind:").or_else(|| name.strip_prefix(':')) {
        AttributeKind::Bound(rest)
    } else if name.starts_with("v-") || name.starts_with('#') {
        AttributeKind::Directive
    } else {
        AttributeKind::Plain(name)
    }
}

fn is_denied_attribute(name: &str) -> bool {
    let name = name.split('.').next().unwrap_or(name);
    ATTRIBUTE_DENYLIST
        .iter()
        .any(|denied| denied.eq_ignore_ascii_case(name))
}
