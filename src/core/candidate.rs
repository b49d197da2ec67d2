use std::{fmt, ops::Range};

use serde::Serialize;

/// Syntactic context a candidate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateContext {
    ObjectProperty,
    StringVariable,
    TemplateLiteral,
    InterpolationExpression,
    MarkupAttribute,
    MarkupText,
}

impl CandidateContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateContext::ObjectProperty => "object-property",
            CandidateContext::StringVariable => "string-variable",
            CandidateContext::TemplateLiteral => "template-literal",
            CandidateContext::InterpolationExpression => "interpolation-expression",
            CandidateContext::MarkupAttribute => "markup-attribute",
            CandidateContext::MarkupText => "markup-text",
        }
    }
}

impl fmt::Display for CandidateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One span of literal text considered for extraction.
///
/// `start..end` covers the literal content only (quotes excluded) and is
/// absolute: the scanner adds its base offset. The context is fixed at
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub text: String,
    pub start: usize,
    pub end: usize,
    context: CandidateContext,
    /// Property, variable or attribute name the value belongs to.
    pub context_meta: Option<String>,
    /// Delimiting quote when the text was a quoted literal.
    pub quote: Option<char>,
    /// Full construct the value belongs to (`label: '...'`, `title="..."`).
    pub enclosing: Option<Range<usize>>,
    pub i18n_key: Option<String>,
    pub source_file: Option<String>,
}

impl Candidate {
    pub fn new(text: impl Into<String>, range: Range<usize>, context: CandidateContext) -> Self {
        Self {
            text: text.into(),
            start: range.start,
            end: range.end,
            context,
            context_meta: None,
            quote: None,
            enclosing: None,
            i18n_key: None,
            source_file: None,
        }
    }

    pub fn with_meta(mut self, meta: impl Into<String>) -> Self {
        self.context_meta = Some(meta.into());
        self
    }

    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = Some(quote);
        self
    }

    pub fn with_enclosing(mut self, enclosing: Range<usize>) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn context(&self) -> CandidateContext {
        self.context
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_quoted(&self) -> bool {
        self.quote.is_some()
    }
}
