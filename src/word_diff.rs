//! The word/char-diff engine: refines a single old/new line pair into
//! intra-line [`Segment`] overlays via an LCS over word or character
//! tokens. Uses the classic O(n*m) LCS table rather than Myers' diagonal
//! trace; the lines involved are short enough that the table is cheap.

use crate::line::ComparatorOptions;

/// The unit a line is split into for refinement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Word,
    Char,
}

/// A labeled token run within one side of a [`WordDiffResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Equal(String),
    Insert(String),
    Delete(String),
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Equal(s) | Segment::Insert(s) | Segment::Delete(s) => s,
        }
    }
}

/// The paired result of refining one old/new line: `old` uses
/// `Equal`/`Delete` segments, `new` uses `Equal`/`Insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDiffResult {
    pub old: Vec<Segment>,
    pub new: Vec<Segment>,
    pub has_differences: bool,
}

/// Splits `line` into tokens at whitespace/non-whitespace boundaries
/// (`Granularity::Word`) or into one token per Unicode scalar value
/// (`Granularity::Char`).
fn tokenize(line: &str, granularity: Granularity) -> Vec<String> {
    match granularity {
        Granularity::Char => line.chars().map(String::from).collect(),
        Granularity::Word => {
            let mut tokens = Vec::new();
            let mut current = String::new();
            let mut current_is_space: Option<bool> = None;
            for ch in line.chars() {
                let is_space = ch.is_whitespace();
                if current_is_space == Some(is_space) {
                    current.push(ch);
                } else {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                    current.push(ch);
                    current_is_space = Some(is_space);
                }
            }
            if !current.is_empty() {
                tokens.push(current);
            }
            tokens
        }
    }
}

fn comparison_key(token: &str, options: &ComparatorOptions) -> String {
    options.key(token).as_str().to_string()
}

/// Tokenizes `a` and `b` at `granularity`, runs the same word-LCS used for
/// refinement, and returns the total character length of the matched old
/// tokens. Used by the line-pair matcher to score similarity
/// without constructing full `Segment` output.
pub fn tokenize_for_similarity(a: &str, b: &str, granularity: Granularity, options: &ComparatorOptions) -> usize {
    let a_tokens = tokenize(a, granularity);
    let b_tokens = tokenize(b, granularity);
    let a_keys: Vec<String> = a_tokens.iter().map(|t| comparison_key(t, options)).collect();
    let b_keys: Vec<String> = b_tokens.iter().map(|t| comparison_key(t, options)).collect();
    let matches = lcs_matches(&a_keys, &b_keys);
    matches
        .iter()
        .map(|&(i, _)| a_tokens[i].chars().count())
        .sum()
}

/// Refines `old_line` and `new_line` into paired segment sequences.
pub fn word_diff(
    old_line: &str,
    new_line: &str,
    granularity: Granularity,
    options: &ComparatorOptions,
) -> WordDiffResult {
    if old_line == new_line {
        return WordDiffResult {
            old: vec![Segment::Equal(old_line.to_string())],
            new: vec![Segment::Equal(new_line.to_string())],
            has_differences: false,
        };
    }

    let old_tokens = tokenize(old_line, granularity);
    let new_tokens = tokenize(new_line, granularity);
    let old_keys: Vec<String> = old_tokens.iter().map(|t| comparison_key(t, options)).collect();
    let new_keys: Vec<String> = new_tokens.iter().map(|t| comparison_key(t, options)).collect();

    let matches = lcs_matches(&old_keys, &new_keys);

    let old = build_segments(&old_tokens, &matches.iter().map(|&(o, _)| o).collect::<Vec<_>>(), |tok| {
        (Segment::Equal(tok.clone()), Segment::Delete(tok.clone()))
    });
    let new = build_segments(&new_tokens, &matches.iter().map(|&(_, n)| n).collect::<Vec<_>>(), |tok| {
        (Segment::Equal(tok.clone()), Segment::Insert(tok.clone()))
    });

    let has_differences = !(old.len() == 1
        && new.len() == 1
        && matches!(old[0], Segment::Equal(_))
        && matches!(new[0], Segment::Equal(_)));

    WordDiffResult { old, new, has_differences }
}

/// Walks `tokens`, turning the indices present in `matched` into `Equal`
/// segments (via `make.0`) and the rest into the side-specific variant (via
/// `make.1`), concatenating consecutive same-typed runs.
fn build_segments(
    tokens: &[String],
    matched: &[usize],
    make: impl Fn(&String) -> (Segment, Segment),
) -> Vec<Segment> {
    let matched: std::collections::HashSet<usize> = matched.iter().copied().collect();
    let mut segments: Vec<Segment> = Vec::new();
    for (i, tok) in tokens.iter().enumerate() {
        let (equal, other) = make(tok);
        let next = if matched.contains(&i) { equal } else { other };
        match (segments.last_mut(), &next) {
            (Some(Segment::Equal(s)), Segment::Equal(_)) => s.push_str(tok),
            (Some(Segment::Insert(s)), Segment::Insert(_)) => s.push_str(tok),
            (Some(Segment::Delete(s)), Segment::Delete(_)) => s.push_str(tok),
            _ => segments.push(next),
        }
    }
    segments
}

/// Computes the LCS of two key sequences via the standard DP table, then
/// backtracks to recover the matched `(old_index, new_index)` pairs in
/// ascending order.
fn lcs_matches(a: &[String], b: &[String]) -> Vec<(usize, usize)> {
    let n = a.len();
    let m = b.len();
    let mut table = vec![vec![0u32; m + 1]; n + 1];
    for i in 0..n {
        for j in 0..m {
            table[i + 1][j + 1] = if a[i] == b[j] {
                table[i][j] + 1
            } else {
                table[i][j + 1].max(table[i + 1][j])
            };
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            pairs.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] >= table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    pairs.reverse();
    pairs
}
