//! Common utility functions shared across the codebase.

/// Checks if the text contains at least one Unicode alphabetic character.
///
/// Returns false for empty strings, pure numbers, or pure symbols.
///
/// # Examples
///
/// ```
/// use tolk::utils::contains_alphabetic;
///
/// assert!(contains_alphabetic("Hello"));
/// assert!(contains_alphabetic("你好"));
/// assert!(contains_alphabetic("Hello123"));
/// assert!(!contains_alphabetic("123"));
/// assert!(!contains_alphabetic("---"));
/// assert!(!contains_alphabetic("$100"));
/// assert!(!contains_alphabetic(""));
/// ```
pub fn contains_alphabetic(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic())
}

/// True when every character is whitespace, punctuation, a symbol or a digit.
///
/// Empty text counts as "nothing but noise".
pub fn is_noise_only(text: &str) -> bool {
    text.chars().all(|c| {
        c.is_whitespace() || c.is_ascii_punctuation() || c.is_numeric() || is_cjk_punctuation(c)
    })
}

/// Full-width and ideographic punctuation (，。！？「」 and friends).
fn is_cjk_punctuation(c: char) -> bool {
    matches!(c,
        '\u{3000}'..='\u{303F}'
        | '\u{FF01}'..='\u{FF0F}'
        | '\u{FF1A}'..='\u{FF20}'
        | '\u{FF3B}'..='\u{FF40}'
        | '\u{FF5B}'..='\u{FF65}'
        | '\u{2010}'..='\u{206F}')
}

/// Index of line start offsets for O(log n) offset → line/column lookups.
///
/// Offsets are byte offsets into the indexed text; lines are 1-based and
/// columns are 1-based character counts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let mut starts = vec![0]; // Line 1 starts at offset 0
        for (i, c) in content.char_indices() {
            if c == '\n' {
                starts.push(i + 1);
            }
        }
        Self { starts }
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line + 1, // Exact match at line start
            Err(line) => line,    // Falls within this line
        }
    }

    /// 1-based (line, column) for `offset` in `content`.
    ///
    /// `content` must be the text this index was built from.
    pub fn line_col(&self, content: &str, offset: usize) -> (usize, usize) {
        let line = self.line_of(offset);
        let line_start = self.starts[line - 1];
        let end = offset.min(content.len());
        let col = content
            .get(line_start..end)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(0);
        (line, col + 1)
    }

    /// Text of a 1-based line without its trailing newline.
    pub fn line_text<'a>(&self, content: &'a str, line: usize) -> &'a str {
        let Some(&start) = self.starts.get(line.saturating_sub(1)) else {
            return "";
        };
        let end = self
            .starts
            .get(line)
            .map(|next| next - 1)
            .unwrap_or(content.len());
        content
            .get(start..end)
            .map(|s| s.trim_end_matches('\r'))
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::*;

    #[test]
    fn test_contains_alphabetic() {
        // Should return true for text with letters
        assert!(contains_alphabetic("Hello"));
        assert!(contains_alphabetic("你好"));
        assert!(contains_alphabetic("Hello123"));
        assert!(contains_alphabetic("123 abc"));
        assert!(contains_alphabetic("  abc  "));
        assert!(contains_alphabetic("Test!@#"));

        // Should return false for text without letters
        assert!(!contains_alphabetic("123"));
        assert!(!contains_alphabetic("---"));
        assert!(!contains_alphabetic("$100"));
        assert!(!contains_alphabetic("!@#$%"));
        assert!(!contains_alphabetic("   "));
        assert!(!contains_alphabetic(""));
        assert!(!contains_alphabetic("123-456"));
    }

    #[test]
    fn test_is_noise_only() {
        assert!(is_noise_only(""));
        assert!(is_noise_only("  "));
        assert!(is_noise_only("12:30"));
        assert!(is_noise_only("，。！"));
        assert!(is_noise_only("-- / --"));
        assert!(!is_noise_only("确定"));
        assert!(!is_noise_only("OK"));
    }

    #[test]
    fn test_line_index() {
        let content = "line1\nline2\nline3";
        let index = LineIndex::new(content);

        assert_eq!(index.line_of(0), 1);
        assert_eq!(index.line_of(3), 1);
        assert_eq!(index.line_of(6), 2);
        assert_eq!(index.line_of(8), 2);
        assert_eq!(index.line_of(12), 3);
        assert_eq!(index.line_text(content, 2), "line2");
        assert_eq!(index.line_text(content, 3), "line3");
        assert_eq!(index.line_text(content, 9), "");
    }

    #[test]
    fn test_line_col_counts_characters() {
        let content = "a\nconst s = '你好';";
        let index = LineIndex::new(content);
        let offset = content.find('好').unwrap();
        // "const s = '你" is 12 characters before 好
        assert_eq!(index.line_col(content, offset), (2, 13));
    }
}
