//! Syntactic flavor of a buffer and offset classification.
//!
//! A [`Dialect`] is picked once per buffer and answers "what kind of place is
//! this offset in", which is all the replacement synthesizer needs to know.

use std::{ops::Range, path::Path};

use enum_dispatch::enum_dispatch;

use crate::{
    core::markup::{self, AttributeValue, Tag},
    error::AmbiguousContextError,
};

/// How a dialect binds an expression to an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingSyntax {
    /// `:name="expr"`
    Colon,
    /// `name={expr}`
    Brace,
}

/// The attribute an offset sits in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSite {
    /// Attribute name without any binding prefix.
    pub name: String,
    /// Whole `name="value"` text, absolute.
    pub range: Range<usize>,
    /// Value is already an expression (`:name="…"`, `v-bind:name="…"`, `name={…}`).
    pub bound: bool,
    /// Quote delimiting the value; `None` for `{…}` values.
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntacticContext {
    ObjectProperty,
    TemplateLiteral,
    AttributeValue(AttributeSite),
    /// Markup text; `wrapped` when already inside an interpolation or expression container.
    InterpolationExpr { wrapped: bool },
    Plain,
}

#[enum_dispatch]
pub trait DialectProbe {
    /// The buffer being classified.
    fn text(&self) -> &str;

    /// Absolute offset of the first byte of [`DialectProbe::text`].
    fn base(&self) -> usize;

    /// Classify an absolute offset (normally the start of a candidate's content).
    fn classify(&self, offset: usize) -> Result<SyntacticContext, AmbiguousContextError>;

    fn binding_syntax(&self) -> Option<BindingSyntax> {
        None
    }

    /// Opening and closing delimiters used to interpolate an expression into markup text.
    fn interpolation(&self) -> Option<(&'static str, &'static str)> {
        None
    }

    fn char_before(&self, offset: usize) -> Option<char> {
        let local = offset.checked_sub(self.base())?;
        self.text().get(..local)?.chars().next_back()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        let local = offset.checked_sub(self.base())?;
        self.text().get(local..)?.chars().next()
    }
}

/// Plain JavaScript/TypeScript without markup.
#[derive(Debug, Clone)]
pub struct ScriptDialect {
    text: String,
    base: usize,
}

/// Single-file component: markup in `<template>`, code in `<script>`.
#[derive(Debug, Clone)]
pub struct VueDialect {
    text: String,
    base: usize,
    template: Range<usize>,
    excluded: Vec<Range<usize>>,
    tags: Vec<Tag>,
}

/// JSX/TSX: code with embedded markup.
#[derive(Debug, Clone)]
pub struct JsxDialect {
    text: String,
    base: usize,
    tags: Vec<Tag>,
    text_nodes: Vec<Range<usize>>,
}

#[enum_dispatch(DialectProbe)]
#[derive(Debug, Clone)]
pub enum Dialect {
    Script(ScriptDialect),
    Vue(VueDialect),
    Jsx(JsxDialect),
}

impl Dialect {
    /// Pick the dialect from the file extension, falling back to content sniffing.
    pub fn detect(path: &Path, text: impl Into<String>) -> Self {
        let text = text.into();
        match path.extension().and_then(|e| e.to_str()) {
            Some("vue") => Dialect::Vue(VueDialect::new(text)),
            Some("jsx" | "tsx") => Dialect::Jsx(JsxDialect::new(text)),
            _ if markup::template_block(&text).is_some() => Dialect::Vue(VueDialect::new(text)),
            _ => Dialect::Script(ScriptDialect::new(text)),
        }
    }

    /// Shift every offset this dialect accepts and reports by `base`.
    pub fn with_base(mut self, base: usize) -> Self {
        match &mut self {
            Dialect::Script(d) => d.base = base,
            Dialect::Vue(d) => d.base = base,
            Dialect::Jsx(d) => d.base = base,
        }
        self
    }

    pub fn has_markup(&self) -> bool {
        !matches!(self, Dialect::Script(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Script(_) => "script",
            Dialect::Vue(_) => "vue",
            Dialect::Jsx(_) => "jsx",
        }
    }
}

impl ScriptDialect {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            base: 0,
        }
    }
}

impl VueDialect {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let template = markup::markup_region(&text);
        let template = if markup::template_block(&text).is_some() {
            template
        } else {
            0..0
        };
        let excluded = markup::excluded_ranges(&text);
        let tags = markup::tags(&text);
        Self {
            text,
            base: 0,
            template,
            excluded,
            tags,
        }
    }
}

impl JsxDialect {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let tags = markup::tags(&text);
        let text_nodes = markup::text_nodes(&text);
        Self {
            text,
            base: 0,
            tags,
            text_nodes,
        }
    }
}

/// Convert an absolute offset into one local to `text`.
fn local_offset(text: &str, base: usize, offset: usize) -> Result<usize, AmbiguousContextError> {
    match offset.checked_sub(base) {
        Some(local) if local <= text.len() && text.is_char_boundary(local) => Ok(local),
        _ => Err(AmbiguousContextError::new(offset, "offset outside the buffer")),
    }
}

fn is_quote(c: char) -> bool {
    matches!(c, '\'' | '"' | '`')
}

/// Classification by the characters around a code literal.
fn classify_code(text: &str, local: usize) -> SyntacticContext {
    let before = &text[..local];
    match before.chars().next_back() {
        Some('`') => SyntacticContext::TemplateLiteral,
        Some(q) if is_quote(q) => {
            let ahead = before[..before.len() - q.len_utf8()].trim_end();
            if ahead.ends_with(':') {
                SyntacticContext::ObjectProperty
            } else {
                SyntacticContext::Plain
            }
        }
        _ => SyntacticContext::Plain,
    }
}

/// The attribute of `tag` whose value holds `local`.
fn attribute_site(
    text: &str,
    base: usize,
    tag: &Tag,
    local: usize,
) -> Result<SyntacticContext, AmbiguousContextError> {
    for attr in markup::attributes(text, tag) {
        let (content, delimiter, expression) = match &attr.value {
            AttributeValue::Quoted { quote, content } => (content.clone(), Some(*quote), false),
            AttributeValue::Expression { content } => (content.clone(), None, true),
            AttributeValue::Missing => continue,
        };
        if local < content.start || local > content.end {
            continue;
        }

        let (name, prefixed) = match attr
            .name
            .strip_prefix("v-bind:")
            .or_else(|| attr.name.strip_prefix(':'))
        {
            Some(rest) => (rest.to_string(), true),
            None => (attr.name.clone(), false),
        };
        return Ok(SyntacticContext::AttributeValue(AttributeSite {
            name,
            range: base + attr.range.start..base + attr.range.end,
            bound: prefixed || expression,
            delimiter,
        }));
    }
    Err(AmbiguousContextError::new(
        base + local,
        "inside a tag but not in an attribute value",
    ))
}

impl DialectProbe for ScriptDialect {
    fn text(&self) -> &str {
        &self.text
    }

    fn base(&self) -> usize {
        self.base
    }

    fn classify(&self, offset: usize) -> Result<SyntacticContext, AmbiguousContextError> {
        let local = local_offset(&self.text, self.base, offset)?;
        Ok(classify_code(&self.text, local))
    }
}

impl DialectProbe for VueDialect {
    fn text(&self) -> &str {
        &self.text
    }

    fn base(&self) -> usize {
        self.base
    }

    fn classify(&self, offset: usize) -> Result<SyntacticContext, AmbiguousContextError> {
        let local = local_offset(&self.text, self.base, offset)?;
        let in_template =
            self.template.contains(&local) && !markup::is_inside(&self.excluded, local);
        if !in_template {
            return Ok(classify_code(&self.text, local));
        }

        if let Some(tag) = self.tags.iter().find(|t| t.range.contains(&local)) {
            return attribute_site(&self.text, self.base, tag, local);
        }

        // Inside `{{ … }}` when the last opener before the offset is still unclosed
        let before = &self.text[self.template.start..local];
        let wrapped = match (before.rfind("{{"), before.rfind("}}")) {
            (Some(open), Some(close)) => open > close,
            (Some(_), None) => true,
            _ => false,
        };
        Ok(SyntacticContext::InterpolationExpr { wrapped })
    }

    fn binding_syntax(&self) -> Option<BindingSyntax> {
        Some(BindingSyntax::Colon)
    }

    fn interpolation(&self) -> Option<(&'static str, &'static str)> {
        Some(("{{ ", " }}"))
    }
}

impl DialectProbe for JsxDialect {
    fn text(&self) -> &str {
        &self.text
    }

    fn base(&self) -> usize {
        self.base
    }

    fn classify(&self, offset: usize) -> Result<SyntacticContext, AmbiguousContextError> {
        let local = local_offset(&self.text, self.base, offset)?;

        if let Some(tag) = self.tags.iter().find(|t| t.range.contains(&local)) {
            return attribute_site(&self.text, self.base, tag, local);
        }

        let quoted = self.text[..local].chars().next_back().is_some_and(is_quote);
        if quoted {
            return Ok(classify_code(&self.text, local));
        }

        match self.text_nodes.iter().find(|gap| gap.contains(&local)) {
            Some(gap) => {
                let before = &self.text[gap.start..local];
                let depth = before.matches('{').count() as isize - before.matches('}').count() as isize;
                Ok(SyntacticContext::InterpolationExpr { wrapped: depth > 0 })
            }
            None => Err(AmbiguousContextError::new(
                offset,
                "unquoted text outside markup",
            )),
        }
    }

    fn binding_syntax(&self) -> Option<BindingSyntax> {
        Some(BindingSyntax::Brace)
    }

    fn interpolation(&self) -> Option<(&'static str, &'static str)> {
        Some(("{", "}"))
    }
}
