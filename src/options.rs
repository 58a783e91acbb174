//! The top-level configuration surface and result types: [`DiffOptions`]
//! plus the [`DiffResult`] and [`Stats`] returned by [`crate::diff::diff`].
//! The engine set is closed, so selection is a plain enum rather than
//! dynamic dispatch.

use crate::hunk::Hunk;
use crate::line::ComparatorOptions;
use crate::operation::Operation;

/// Selects a line-diff engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Myers,
    Patience,
    Histogram,
}

/// The token unit a diff operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Line,
    Word,
    Char,
}

/// All tunables for a top-level [`crate::diff::diff`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffOptions {
    pub algorithm: Algorithm,
    pub granularity: Granularity,
    pub context: usize,
    pub ignore_case: bool,
    pub ignore_whitespace: bool,
    pub trim_lines: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        DiffOptions {
            algorithm: Algorithm::default(),
            granularity: Granularity::default(),
            context: 3,
            ignore_case: false,
            ignore_whitespace: false,
            trim_lines: false,
        }
    }
}

impl DiffOptions {
    pub(crate) fn comparator(&self) -> ComparatorOptions {
        ComparatorOptions {
            ignore_case: self.ignore_case,
            ignore_whitespace: self.ignore_whitespace,
            trim_lines: self.trim_lines,
        }
    }
}

/// Running counts plus a derived similarity percentage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub additions: usize,
    pub deletions: usize,
    pub changes: usize,
    pub old_line_count: usize,
    pub new_line_count: usize,
    pub similarity: u32,
}

impl Stats {
    pub(crate) fn from_operations(ops: &[Operation], old_line_count: usize, new_line_count: usize) -> Self {
        let additions = ops.iter().filter(|o| o.kind == crate::operation::OpKind::Insert).map(Operation::new_len).sum();
        let deletions = ops.iter().filter(|o| o.kind == crate::operation::OpKind::Delete).map(Operation::old_len).sum();
        let changes = ops.iter().filter(|o| !o.is_equal()).count();
        let similarity = similarity_percent(old_line_count, new_line_count, additions, deletions);
        Stats {
            additions,
            deletions,
            changes,
            old_line_count,
            new_line_count,
            similarity,
        }
    }
}

/// `round(100 * (maxLines - max(additions, deletions)) / maxLines)`; two
/// empty inputs are defined as 100% similar.
fn similarity_percent(old_line_count: usize, new_line_count: usize, additions: usize, deletions: usize) -> u32 {
    let max_lines = old_line_count.max(new_line_count);
    if max_lines == 0 {
        return 100;
    }
    let worst = additions.max(deletions);
    let ratio = (max_lines.saturating_sub(worst)) as f64 * 100.0 / max_lines as f64;
    ratio.round() as u32
}

/// A word/char-level refinement of one paired removed/added line, located
/// by the index of its `Hunk` and the index of the `Delete` change it
/// starts from within that hunk's `changes`.
#[derive(Debug, Clone, PartialEq)]
pub struct WordRefinement {
    pub hunk_index: usize,
    pub delete_change_index: usize,
    pub result: crate::word_diff::WordDiffResult,
}

/// The full output of a top-level diff: operations, hunks, stats, and the
/// options actually used. `word_diffs` is populated only when
/// `options.granularity` is `Word` or `Char`.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffResult {
    pub operations: Vec<Operation>,
    pub hunks: Vec<Hunk>,
    pub stats: Stats,
    pub options: DiffOptions,
    pub word_diffs: Vec<WordRefinement>,
}
