//! `Operation`, the line-level edit-script record, and the operation merger.

use std::ops::Range;

use crate::line::Line;

/// The kind of change an [`Operation`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// Both ranges carry identical lines (under the configured comparator).
    Equal,
    /// `old_range` is empty; lines come from the new side.
    Insert,
    /// `new_range` is empty; lines come from the old side.
    Delete,
}

/// One contiguous run of inserted, deleted, or equal lines.
///
/// Operations form a partition of the inputs: concatenating old-side
/// contributions reconstructs the old input, and concatenating new-side
/// contributions reconstructs the new input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub kind: OpKind,
    /// Half-open range into the old sequence.
    pub old_range: Range<usize>,
    /// Half-open range into the new sequence.
    pub new_range: Range<usize>,
    /// The literal lines this operation carries: the old lines for
    /// `Delete`/`Equal`, the new lines for `Insert`.
    pub lines: Vec<Line>,
    /// Set by [`crate::moves::annotate_moves`] once move detection has run:
    /// a delete operation and the insert operation it was paired with share
    /// the same id. `None` until annotated, and always `None` for `Equal`.
    pub move_id: Option<u32>,
}

/// A single-line edit emitted directly by a line-diff engine, before lines
/// are attached and before the merger coalesces same-kind runs. All three
/// engines build their result as `Vec<RawOp>` with indices already rebased
/// into the caller's coordinate space, then hand it to
/// [`raw_to_operations`] followed by [`merge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOp {
    pub kind: OpKind,
    pub old_range: Range<usize>,
    pub new_range: Range<usize>,
}

/// Attaches literal line content to a sequence of [`RawOp`]s.
pub fn raw_to_operations(raw: Vec<RawOp>, before_lines: &[Line], after_lines: &[Line]) -> Vec<Operation> {
    raw.into_iter()
        .map(|r| {
            let lines = match r.kind {
                OpKind::Insert => after_lines[r.new_range.clone()].to_vec(),
                _ => before_lines[r.old_range.clone()].to_vec(),
            };
            Operation {
                kind: r.kind,
                old_range: r.old_range,
                new_range: r.new_range,
                lines,
                move_id: None,
            }
        })
        .collect()
}

impl Operation {
    pub fn is_equal(&self) -> bool {
        matches!(self.kind, OpKind::Equal)
    }

    /// Number of lines contributed to the old side.
    pub fn old_len(&self) -> usize {
        self.old_range.len()
    }

    /// Number of lines contributed to the new side.
    pub fn new_len(&self) -> usize {
        self.new_range.len()
    }
}

/// Merges adjacent operations of the same kind whose index ranges are
/// contiguous into a single operation. Idempotent: `merge(merge(ops)) ==
/// merge(ops)`. Run before move detection, so `move_id` is always `None` on
/// both sides of a merge.
pub fn merge(ops: Vec<Operation>) -> Vec<Operation> {
    let mut merged: Vec<Operation> = Vec::with_capacity(ops.len());
    for op in ops {
        if op.lines.is_empty() && !matches!(op.kind, OpKind::Equal) {
            // An empty insert/delete carries no content and contributes
            // nothing to either side; dropping it keeps the "no two
            // consecutive operations share a type" invariant trivially true
            // even if an engine ever emits a zero-length edit.
            continue;
        }
        match merged.last_mut() {
            Some(prev)
                if prev.kind == op.kind
                    && prev.old_range.end == op.old_range.start
                    && prev.new_range.end == op.new_range.start =>
            {
                prev.old_range.end = op.old_range.end;
                prev.new_range.end = op.new_range.end;
                prev.lines.extend(op.lines);
            }
            _ => merged.push(op),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(kind: OpKind, old: Range<usize>, new: Range<usize>, lines: &[&str]) -> Operation {
        Operation {
            kind,
            old_range: old,
            new_range: new,
            lines: lines.iter().map(|l| Line::new(*l)).collect(),
            move_id: None,
        }
    }

    #[test]
    fn merges_contiguous_same_kind_runs() {
        let ops = vec![
            op(OpKind::Delete, 0..1, 0..0, &["a"]),
            op(OpKind::Delete, 1..2, 0..0, &["b"]),
            op(OpKind::Equal, 2..3, 0..1, &["c"]),
        ];
        let merged = merge(ops);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].old_range, 0..2);
        assert_eq!(merged[0].lines.len(), 2);
    }

    #[test]
    fn does_not_merge_across_a_different_kind() {
        let ops = vec![
            op(OpKind::Delete, 0..1, 0..0, &["a"]),
            op(OpKind::Insert, 1..1, 0..1, &["x"]),
            op(OpKind::Delete, 1..2, 1..1, &["b"]),
        ];
        let merged = merge(ops);
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_is_idempotent() {
        let ops = vec![
            op(OpKind::Delete, 0..1, 0..0, &["a"]),
            op(OpKind::Delete, 1..2, 0..0, &["b"]),
        ];
        let once = merge(ops);
        let twice = merge(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn drops_empty_edits() {
        let ops = vec![
            op(OpKind::Insert, 0..0, 0..0, &[]),
            op(OpKind::Equal, 0..1, 0..1, &["a"]),
        ];
        assert_eq!(merge(ops).len(), 1);
    }
}
