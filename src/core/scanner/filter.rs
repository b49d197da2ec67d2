use std::ops::RangeInclusive;

use crate::utils::{contains_alphabetic, is_noise_only};

/// Decides whether trimmed literal text is natural-language content worth extracting.
pub trait TextFilter: Send + Sync {
    fn admits(&self, text: &str) -> bool;
}

/// Admits text containing at least one character from the given code point ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRange {
    ranges: Vec<RangeInclusive<char>>,
}

impl ScriptRange {
    pub fn new(ranges: Vec<RangeInclusive<char>>) -> Self {
        Self { ranges }
    }

    /// CJK unified ideographs, extension A/B and compatibility ideographs.
    pub fn cjk() -> Self {
        Self::new(vec![
            '\u{4E00}'..='\u{9FFF}',
            '\u{3400}'..='\u{4DBF}',
            '\u{F900}'..='\u{FAFF}',
            '\u{20000}'..='\u{2A6DF}',
        ])
    }

    /// Parse ranges written as `4E00-9FFF` or `U+3040-U+30FF`.
    pub fn parse(specs: &[String]) -> Result<Self, String> {
        let mut ranges = Vec::with_capacity(specs.len());
        for spec in specs {
            let (lo, hi) = spec.split_once('-').unwrap_or((spec.as_str(), spec.as_str()));
            let lo = parse_code_point(lo).ok_or_else(|| format!("invalid code point in \"{}\"", spec))?;
            let hi = parse_code_point(hi).ok_or_else(|| format!("invalid code point in \"{}\"", spec))?;
            if lo > hi {
                return Err(format!("empty range \"{}\"", spec));
            }
            ranges.push(lo..=hi);
        }
        Ok(Self::new(ranges))
    }
}

fn parse_code_point(raw: &str) -> Option<char> {
    let raw = raw.trim();
    let hex = raw
        .strip_prefix("U+")
        .or_else(|| raw.strip_prefix("u+"))
        .or_else(|| raw.strip_prefix("0x"))
        .unwrap_or(raw);
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

impl TextFilter for ScriptRange {
    fn admits(&self, text: &str) -> bool {
        text.chars()
            .any(|c| self.ranges.iter().any(|range| range.contains(&c)))
    }
}

/// Admits any text with a letter in any script.
#[derive(Debug, Clone, Copy, Default)]
pub struct Alphabetic;

impl TextFilter for Alphabetic {
    fn admits(&self, text: &str) -> bool {
        contains_alphabetic(text)
    }
}

/// Shared admissibility check applied by every sub-scan.
pub fn is_admissible(text: &str, filter: &dyn TextFilter) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && !is_noise_only(trimmed) && filter.admits(trimmed)
}
