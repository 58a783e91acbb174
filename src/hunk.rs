//! Groups non-`equal` operations into [`Hunk`]s with leading and trailing
//! context, producing 1-based [`Change`] line numbers.

use crate::line::Line;
use crate::operation::{OpKind, Operation};

/// A single rendered line within a [`Hunk`], carrying the literal text it
/// covers so a `Hunk` can reproduce the content it describes without a
/// caller re-supplying it from elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// An unchanged line, present at both `old_line` and `new_line`.
    Normal { old_line: usize, new_line: usize, text: Line },
    /// A line only present in the new side.
    Add { new_line: usize, text: Line },
    /// A line only present in the old side.
    Delete { old_line: usize, text: Line },
}

impl Change {
    pub fn old_line(&self) -> Option<usize> {
        match self {
            Change::Normal { old_line, .. } | Change::Delete { old_line, .. } => Some(*old_line),
            Change::Add { .. } => None,
        }
    }

    pub fn new_line(&self) -> Option<usize> {
        match self {
            Change::Normal { new_line, .. } | Change::Add { new_line, .. } => Some(*new_line),
            Change::Delete { .. } => None,
        }
    }

    /// The literal line text this change covers.
    pub fn text(&self) -> &str {
        match self {
            Change::Normal { text, .. } | Change::Add { text, .. } | Change::Delete { text, .. } => text.as_str(),
        }
    }
}

/// A contiguous region of a diff: at least one change, surrounded by up to
/// `context` lines on each side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub old_start: usize,
    pub old_line_count: usize,
    pub new_start: usize,
    pub new_line_count: usize,
    pub changes: Vec<Change>,
    pub header: String,
}

/// Groups `ops` into hunks with up to `context` lines of surrounding
/// context (default 3). `ops` must already be merged and cover the whole
/// input from the start.
pub fn generate_hunks(ops: &[Operation], context: usize) -> Vec<Hunk> {
    let groups = group_changed_indices(ops, context);
    groups
        .into_iter()
        .map(|(lo, hi)| build_hunk(ops, lo, hi, context))
        .collect()
}

/// Groups the indices of non-`equal` operations into runs, merging two runs
/// whenever the `equal` gap between them is at most `2 * context` lines.
/// Returns `(first_op_idx, last_op_idx)` inclusive pairs, where the range
/// may include the bounding `equal` operations that will later be trimmed
/// down to context.
fn group_changed_indices(ops: &[Operation], context: usize) -> Vec<(usize, usize)> {
    let changed: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| !op.is_equal())
        .map(|(i, _)| i)
        .collect();
    if changed.is_empty() {
        return Vec::new();
    }

    let mut groups: Vec<(usize, usize)> = Vec::new();
    let mut group_start = changed[0];
    let mut group_end = changed[0];

    for &idx in &changed[1..] {
        let gap: usize = ops[group_end + 1..idx].iter().map(|o| o.new_len()).sum();
        if gap > 2 * context {
            groups.push((group_start, group_end));
            group_start = idx;
        }
        group_end = idx;
    }
    groups.push((group_start, group_end));
    groups
}

fn build_hunk(ops: &[Operation], lo: usize, hi: usize, context: usize) -> Hunk {
    // Expand leading context from the tail of the preceding `equal` op, and
    // trailing context from the head of the following one.
    let leading_context = if lo > 0 {
        ops[lo - 1].new_len().min(context)
    } else {
        0
    };
    let trailing_context = if hi + 1 < ops.len() {
        ops[hi + 1].new_len().min(context)
    } else {
        0
    };

    let mut changes = Vec::new();

    if leading_context > 0 {
        let lead = &ops[lo - 1];
        let skip = lead.old_len() - leading_context;
        for i in 0..leading_context {
            changes.push(Change::Normal {
                old_line: lead.old_range.start + skip + i + 1,
                new_line: lead.new_range.start + skip + i + 1,
                text: lead.lines[skip + i].clone(),
            });
        }
    }

    for op in &ops[lo..=hi] {
        match op.kind {
            OpKind::Equal => {
                for i in 0..op.old_len() {
                    changes.push(Change::Normal {
                        old_line: op.old_range.start + i + 1,
                        new_line: op.new_range.start + i + 1,
                        text: op.lines[i].clone(),
                    });
                }
            }
            OpKind::Delete => {
                for i in 0..op.old_len() {
                    changes.push(Change::Delete {
                        old_line: op.old_range.start + i + 1,
                        text: op.lines[i].clone(),
                    });
                }
            }
            OpKind::Insert => {
                for i in 0..op.new_len() {
                    changes.push(Change::Add {
                        new_line: op.new_range.start + i + 1,
                        text: op.lines[i].clone(),
                    });
                }
            }
        }
    }

    if trailing_context > 0 {
        let trail = &ops[hi + 1];
        for i in 0..trailing_context {
            changes.push(Change::Normal {
                old_line: trail.old_range.start + i + 1,
                new_line: trail.new_range.start + i + 1,
                text: trail.lines[i].clone(),
            });
        }
    }

    let old_line_count = changes
        .iter()
        .filter(|c| !matches!(c, Change::Add { .. }))
        .count();
    let new_line_count = changes
        .iter()
        .filter(|c| !matches!(c, Change::Delete { .. }))
        .count();

    let old_start = changes
        .iter()
        .find_map(Change::old_line)
        .unwrap_or_else(|| ops[lo].old_range.start + 1);
    let new_start = changes
        .iter()
        .find_map(Change::new_line)
        .unwrap_or_else(|| ops[lo].new_range.start + 1);

    let header = format_header(old_start, old_line_count, new_start, new_line_count);

    Hunk {
        old_start,
        old_line_count,
        new_start,
        new_line_count,
        changes,
        header,
    }
}

/// Formats `@@ -O[,L] +N[,L] @@`, omitting `,L` when the count is exactly 1.
fn format_header(old_start: usize, old_len: usize, new_start: usize, new_len: usize) -> String {
    let old_part = if old_len == 1 {
        format!("{old_start}")
    } else {
        format!("{old_start},{old_len}")
    };
    let new_part = if new_len == 1 {
        format!("{new_start}")
    } else {
        format!("{new_start},{new_len}")
    };
    format!("@@ -{old_part} +{new_part} @@")
}
