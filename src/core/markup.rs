//! Lightweight markup structure: tags, attributes and text nodes.
//!
//! Regex driven; good enough for Vue templates and JSX bodies, not an HTML parser.

use std::{ops::Range, sync::LazyLock};

use regex::Regex;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<>|</>|<(?P<close>/?)(?P<name>[A-Za-z][\w.:-]*)(?P<attrs>(?:"[^"]*"|'[^']*'|\{(?:[^{}]|\{[^{}]*\})*\}|[^"'{}<>])*)>"#,
    )
    .unwrap()
});

static ATTRIBUTE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?P<name>[^\s"'=<>/{}]+)(?:\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)'|\{(?P<expr>(?:[^{}]|\{[^{}]*\})*)\}))?"#,
    )
    .unwrap()
});

static EXCLUDED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>|<!--.*?-->")
        .unwrap()
});

static TEMPLATE_OPEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<template\b[^>]*>").unwrap());

/// A tag occurrence, opening or closing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub range: Range<usize>,
    pub name: String,
    pub closing: bool,
    /// Raw attribute area between the tag name and `>`.
    pub attrs: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// `"..."` / `'...'`; the range is the content between the quotes.
    Quoted { quote: char, content: Range<usize> },
    /// JSX `{...}`; the range is the content between the braces.
    Expression { content: Range<usize> },
    /// Boolean attribute without a value.
    Missing,
}

/// One `name=value` pair inside a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub name_range: Range<usize>,
    /// The whole `name="value"` text.
    pub range: Range<usize>,
    pub value: AttributeValue,
}

/// Markup part of a buffer: the outer `<template>` block when there is one,
/// otherwise the whole buffer.
pub fn markup_region(text: &str) -> Range<usize> {
    if let Some(open) = TEMPLATE_OPEN_REGEX.find(text)
        && let Some(close) = text.rfind("</template>")
        && close >= open.end()
    {
        return open.start()..close + "</template>".len();
    }
    0..text.len()
}

/// Content of the outer `<template>` block, tags excluded.
pub fn template_block(text: &str) -> Option<Range<usize>> {
    let open = TEMPLATE_OPEN_REGEX.find(text)?;
    let close = text.rfind("</template>")?;
    (close >= open.end()).then(|| open.end()..close)
}

/// `<script>` and `<style>` blocks and HTML comments.
pub fn excluded_ranges(text: &str) -> Vec<Range<usize>> {
    EXCLUDED_REGEX.find_iter(text).map(|m| m.range()).collect()
}

pub fn is_inside(ranges: &[Range<usize>], offset: usize) -> bool {
    ranges.iter().any(|r| r.contains(&offset))
}

/// Tags inside the markup region, skipping excluded blocks.
///
/// Outside a `<template>` block the buffer is code, so a `<` right after an
/// identifier (`useState<string>`, `Array<T>`) opens type arguments, not a tag.
pub fn tags(text: &str) -> Vec<Tag> {
    let region = markup_region(text);
    let excluded = excluded_ranges(text);
    tags_in(text, &region, &excluded)
}

fn tags_in(text: &str, region: &Range<usize>, excluded: &[Range<usize>]) -> Vec<Tag> {
    let in_code = template_block(text).is_none();
    let mut found = Vec::new();
    let mut pos = region.start;
    while pos < region.end {
        let Some(caps) = TAG_REGEX.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        if whole.end() > region.end {
            break;
        }
        if let Some(block) = excluded.iter().find(|r| r.contains(&whole.start())) {
            pos = block.end.max(whole.start() + 1);
            continue;
        }
        if in_code && follows_identifier(text, whole.start()) {
            pos = whole.start() + 1;
            continue;
        }
        let (name, closing, attrs) = match caps.name("name") {
            Some(name) => (
                name.as_str().to_string(),
                caps.name("close").is_some_and(|c| !c.is_empty()),
                caps.name("attrs").map_or(name.end()..name.end(), |a| a.range()),
            ),
            // Fragments `<>` and `</>`
            None => (
                String::new(),
                whole.as_str() == "</>",
                whole.end() - 1..whole.end() - 1,
            ),
        };
        found.push(Tag {
            range: whole.range(),
            name,
            closing,
            attrs,
        });
        pos = whole.end();
    }
    found
}

/// Attributes of an opening tag, with absolute offsets.
pub fn attributes(text: &str, tag: &Tag) -> Vec<Attribute> {
    if tag.closing {
        return Vec::new();
    }
    let area = &text[tag.attrs.clone()];
    let base = tag.attrs.start;

    ATTRIBUTE_REGEX
        .captures_iter(area)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.name("name")?;
            let value = if let Some(m) = caps.name("dq") {
                AttributeValue::Quoted {
                    quote: '"',
                    content: base + m.start()..base + m.end(),
                }
            } else if let Some(m) = caps.name("sq") {
                AttributeValue::Quoted {
                    quote: '\'',
                    content: base + m.start()..base + m.end(),
                }
            } else if let Some(m) = caps.name("expr") {
                AttributeValue::Expression {
                    content: base + m.start()..base + m.end(),
                }
            } else {
                AttributeValue::Missing
            };
            Some(Attribute {
                name: name.as_str().to_string(),
                name_range: base + name.start()..base + name.end(),
                range: base + whole.start()..base + whole.end(),
                value,
            })
        })
        .collect()
}

fn follows_identifier(text: &str, offset: usize) -> bool {
    text[..offset]
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Raw text between adjacent tags (or excluded blocks) that sits inside an
/// element whose opening and closing tags pair up.
///
/// Gaps outside every element are code (the space between two JSX
/// expressions, or after an unclosed `<T,>`) and are not text nodes.
/// Ranges are untrimmed; empty gaps are dropped.
pub fn text_nodes(text: &str) -> Vec<Range<usize>> {
    let region = markup_region(text);
    let excluded = excluded_ranges(text);
    let tags = tags_in(text, &region, &excluded);
    let elements = element_bodies(text, &tags);

    let mut boundaries: Vec<Range<usize>> = tags
        .into_iter()
        .map(|tag| tag.range)
        .chain(
            excluded
                .iter()
                .filter(|r| r.start >= region.start && r.end <= region.end)
                .cloned(),
        )
        .collect();
    boundaries.sort_by_key(|r| r.start);

    boundaries
        .windows(2)
        .filter_map(|pair| {
            let gap = pair[0].end..pair[1].start;
            (gap.start < gap.end).then_some(gap)
        })
        .filter(|gap| {
            elements
                .iter()
                .any(|body| body.start <= gap.start && gap.end <= body.end)
        })
        .collect()
}

/// Content ranges of elements with a matching closing tag.
///
/// A closing tag pairs with the nearest open tag of the same name; open tags
/// above it on the stack are left unclosed (void elements like `<br>`).
fn element_bodies(text: &str, tags: &[Tag]) -> Vec<Range<usize>> {
    let mut open: Vec<&Tag> = Vec::new();
    let mut bodies = Vec::new();
    for tag in tags {
        if tag.closing {
            if let Some(index) = open.iter().rposition(|o| o.name == tag.name) {
                bodies.push(open[index].range.end..tag.range.start);
                open.truncate(index);
            }
        } else if !text[tag.range.clone()].ends_with("/>") {
            open.push(tag);
        }
    }
    bodies
}
