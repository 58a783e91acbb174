//! The `Line` value type and the line tokenizer.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// An immutable line of text, stripped of its terminator.
///
/// Cloning a `Line` is cheap (it's a reference-counted string slice), which
/// keeps the operation merger and the hunker from having to
/// re-copy line content every time runs of operations are coalesced.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Line(Arc<str>);

impl Line {
    /// Wraps `text` as a `Line`.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Line(text.into())
    }

    /// Returns the line's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Line {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Line(Arc::from(s))
    }
}

impl From<String> for Line {
    fn from(s: String) -> Self {
        Line(Arc::from(s))
    }
}

/// Comparator transforms applied to the comparison key of a line, without
/// touching the rendered content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComparatorOptions {
    /// Case-insensitive comparison.
    pub ignore_case: bool,
    /// Collapse runs of whitespace to a single space and trim the line
    /// before comparing.
    pub ignore_whitespace: bool,
    /// Trim leading/trailing whitespace before comparing.
    pub trim_lines: bool,
}

impl ComparatorOptions {
    /// Whether any transform is configured. A fast path for the common case
    /// where the original text can double as its own comparison key.
    pub fn is_identity(&self) -> bool {
        !self.ignore_case && !self.ignore_whitespace && !self.trim_lines
    }

    /// Computes the comparison key for `line` under these options. The
    /// rendered line itself is never modified.
    pub fn key(&self, line: &str) -> Line {
        if self.is_identity() {
            return Line::new(line);
        }
        let mut text = line.to_string();
        if self.trim_lines {
            text = text.trim().to_string();
        }
        if self.ignore_whitespace {
            text = collapse_whitespace(&text);
        }
        if self.ignore_case {
            text = text.to_lowercase();
        }
        Line::new(text)
    }
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.trim().chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                out.push(' ');
            }
            prev_was_space = true;
        } else {
            out.push(ch);
            prev_was_space = false;
        }
    }
    out
}

/// A line together with the key used to compare it against other lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    /// The original, unmodified line content.
    pub original: Line,
    /// The key used for equality comparisons, after `ComparatorOptions` are
    /// applied.
    pub key: Line,
}

/// Splits `text` into lines on LF, CR, or CRLF; terminators are not
/// retained. If `text` ends with a terminator, the trailing empty element is
/// dropped, so `"a\n"` yields a single line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Tokenizes `text` into `LineRecord`s under the given comparator options.
pub fn tokenize(text: &str, options: ComparatorOptions) -> Vec<LineRecord> {
    split_lines(text)
        .into_iter()
        .map(|line| LineRecord {
            original: Line::new(line),
            key: options.key(line),
        })
        .collect()
}
