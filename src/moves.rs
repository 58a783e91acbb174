//! The move detector: recognizes blocks that appear as both a `delete` and
//! an `insert` in an operation sequence, via an exact pass (hash map keyed
//! by block content) followed by an optional fuzzy pass (block-similarity
//! scoring), plus [`annotate_moves`] to stamp the paired operations with a
//! shared id once moves are found.

use hashbrown::HashMap;

use crate::line::ComparatorOptions;
use crate::operation::{OpKind, Operation};
use crate::similarity::{djb2, levenshtein_similarity};

/// Tunables for [`detect_moves`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveDetectionOptions {
    pub min_block_size: usize,
    pub similarity_threshold: f64,
    pub detect_fuzzy_moves: bool,
    pub ignore_whitespace: bool,
    pub max_search_distance: usize,
}

impl Default for MoveDetectionOptions {
    fn default() -> Self {
        MoveDetectionOptions {
            min_block_size: 3,
            similarity_threshold: 0.8,
            detect_fuzzy_moves: true,
            ignore_whitespace: false,
            max_search_distance: 1000,
        }
    }
}

/// A recognized relocation: a `delete` block and an `insert` block whose
/// content matches exactly or closely enough.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveBlock {
    pub delete_op_index: usize,
    pub insert_op_index: usize,
    pub old_range: std::ops::Range<usize>,
    pub new_range: std::ops::Range<usize>,
    pub lines: Vec<String>,
    pub similarity: f64,
    pub is_exact: bool,
}

struct Block {
    op_index: usize,
    start: usize,
    lines: Vec<String>,
}

/// Detects moves across `ops` in two passes (exact, then fuzzy). `ops` is
/// assumed already merged. `MoveBlock.delete_op_index`/`insert_op_index`
/// index into this same `ops` slice, so they can be fed straight to
/// [`annotate_moves`].
pub fn detect_moves(ops: &[Operation], options: &MoveDetectionOptions) -> Vec<MoveBlock> {
    let normalize = |s: &str| -> String {
        if options.ignore_whitespace {
            ComparatorOptions {
                ignore_whitespace: true,
                ..Default::default()
            }
            .key(s)
            .as_str()
            .to_string()
        } else {
            s.to_string()
        }
    };

    let delete_blocks: Vec<Block> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| op.kind == OpKind::Delete && op.old_len() >= options.min_block_size)
        .map(|(i, op)| Block {
            op_index: i,
            start: op.old_range.start,
            lines: op.lines.iter().map(|l| l.as_str().to_string()).collect(),
        })
        .collect();
    let insert_blocks: Vec<Block> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| op.kind == OpKind::Insert && op.new_len() >= options.min_block_size)
        .map(|(i, op)| Block {
            op_index: i,
            start: op.new_range.start,
            lines: op.lines.iter().map(|l| l.as_str().to_string()).collect(),
        })
        .collect();

    let mut insert_used = vec![false; insert_blocks.len()];
    let mut delete_used = vec![false; delete_blocks.len()];
    let mut moves = Vec::new();

    // Pass 1: exact matches via a block-hash map.
    let mut hash_index: HashMap<u32, Vec<usize>> = HashMap::new();
    for (j, block) in insert_blocks.iter().enumerate() {
        let joined = block.lines.iter().map(|l| normalize(l)).collect::<Vec<_>>().join("\n");
        hash_index.entry(djb2(joined.as_bytes())).or_default().push(j);
    }
    for (i, delete_block) in delete_blocks.iter().enumerate() {
        let joined = delete_block
            .lines
            .iter()
            .map(|l| normalize(l))
            .collect::<Vec<_>>()
            .join("\n");
        let hash = djb2(joined.as_bytes());
        if let Some(candidates) = hash_index.get(&hash) {
            if let Some(&j) = candidates.iter().find(|&&j| {
                !insert_used[j]
                    && insert_blocks[j].lines.len() == delete_block.lines.len()
                    && insert_blocks[j]
                        .lines
                        .iter()
                        .zip(&delete_block.lines)
                        .all(|(a, b)| normalize(a) == normalize(b))
            }) {
                delete_used[i] = true;
                insert_used[j] = true;
                moves.push(MoveBlock {
                    delete_op_index: delete_block.op_index,
                    insert_op_index: insert_blocks[j].op_index,
                    old_range: delete_block.start..delete_block.start + delete_block.lines.len(),
                    new_range: insert_blocks[j].start..insert_blocks[j].start + insert_blocks[j].lines.len(),
                    lines: delete_block.lines.clone(),
                    similarity: 1.0,
                    is_exact: true,
                });
            }
        }
    }

    if !options.detect_fuzzy_moves {
        return moves;
    }

    // Pass 2: fuzzy matches, scanning unpaired inserts within
    // `max_search_distance` of each unpaired delete's start position.
    // Tie-break: earliest delete index first, then earliest insert index.
    for (i, delete_block) in delete_blocks.iter().enumerate() {
        if delete_used[i] {
            continue;
        }
        let mut best: Option<(usize, f64)> = None;
        for (j, insert_block) in insert_blocks.iter().enumerate() {
            if insert_used[j] {
                continue;
            }
            let distance = delete_block.start.abs_diff(insert_block.start);
            if distance > options.max_search_distance {
                continue;
            }
            let score = block_similarity(&delete_block.lines, &insert_block.lines, options.ignore_whitespace);
            if score < options.similarity_threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((_, best_score)) => score > best_score,
            };
            if better {
                best = Some((j, score));
            }
        }
        if let Some((j, score)) = best {
            delete_used[i] = true;
            insert_used[j] = true;
            moves.push(MoveBlock {
                delete_op_index: delete_block.op_index,
                insert_op_index: insert_blocks[j].op_index,
                old_range: delete_block.start..delete_block.start + delete_block.lines.len(),
                new_range: insert_blocks[j].start..insert_blocks[j].start + insert_blocks[j].lines.len(),
                lines: delete_block.lines.clone(),
                similarity: score,
                is_exact: score == 1.0,
            });
        }
    }

    moves
}

/// Tags the delete and insert operation of each of `moves` with a shared id,
/// so a move's provenance survives past `MoveBlock` into the `Operation`
/// list itself and on into hunking and unified-diff rendering. `moves` must
/// have come from [`detect_moves`] on this same `ops` slice; indices from
/// [`detect_moves_from_content`] do not index operations and must not be
/// passed here.
pub fn annotate_moves(ops: &mut [Operation], moves: &[MoveBlock]) {
    for (id, mv) in moves.iter().enumerate() {
        let id = id as u32;
        ops[mv.delete_op_index].move_id = Some(id);
        ops[mv.insert_op_index].move_id = Some(id);
    }
}

/// Scores two blocks: the mean of per-line Levenshtein similarities when
/// line counts match, or the Levenshtein similarity of the two blocks
/// joined by a sentinel otherwise.
fn block_similarity(a: &[String], b: &[String], ignore_whitespace: bool) -> f64 {
    let normalize = |s: &str| -> String {
        if ignore_whitespace {
            ComparatorOptions {
                ignore_whitespace: true,
                ..Default::default()
            }
            .key(s)
            .as_str()
            .to_string()
        } else {
            s.to_string()
        }
    };

    if a.len() == b.len() {
        let sum: f64 = a
            .iter()
            .zip(b)
            .map(|(x, y)| levenshtein_similarity(&normalize(x), &normalize(y)))
            .sum();
        sum / a.len() as f64
    } else {
        // `\u{0}` cannot appear in line content (lines are already
        // terminator-stripped and this core never handles binary input),
        // so it's a safe join sentinel.
        let joined_a = a.iter().map(|s| normalize(s)).collect::<Vec<_>>().join("\u{0}");
        let joined_b = b.iter().map(|s| normalize(s)).collect::<Vec<_>>().join("\u{0}");
        levenshtein_similarity(&joined_a, &joined_b)
    }
}

/// The "from-content" variant: detects exact moved blocks directly from two
/// raw line arrays, with no prior operation list. Scans candidate
/// block sizes from `min_block_size` up to `min(line_count, 50)`, largest
/// first, hashing all windows of `new_lines` once per size and reporting
/// the first non-overlapping exact match per window on `old_lines`. Used
/// lines on each side are tracked to prevent overlapping reports.
pub fn detect_moves_from_content(
    old_lines: &[&str],
    new_lines: &[&str],
    min_block_size: usize,
) -> Vec<MoveBlock> {
    let max_size = min_block_size.max(1).min(old_lines.len().min(new_lines.len()).min(50));
    if max_size < min_block_size {
        return Vec::new();
    }

    let mut old_used = vec![false; old_lines.len()];
    let mut new_used = vec![false; new_lines.len()];
    let mut moves = Vec::new();

    for size in (min_block_size..=max_size).rev() {
        if size == 0 {
            continue;
        }
        let mut windows: HashMap<u32, Vec<usize>> = HashMap::new();
        for start in 0..=new_lines.len().saturating_sub(size) {
            if new_used[start..start + size].iter().any(|&u| u) {
                continue;
            }
            let joined = new_lines[start..start + size].join("\n");
            windows.entry(djb2(joined.as_bytes())).or_default().push(start);
        }

        for old_start in 0..=old_lines.len().saturating_sub(size) {
            if old_used[old_start..old_start + size].iter().any(|&u| u) {
                continue;
            }
            let joined = old_lines[old_start..old_start + size].join("\n");
            let hash = djb2(joined.as_bytes());
            let Some(candidates) = windows.get(&hash) else {
                continue;
            };
            let Some(&new_start) = candidates.iter().find(|&&new_start| {
                !new_used[new_start..new_start + size].iter().any(|&u| u)
                    && new_lines[new_start..new_start + size] == old_lines[old_start..old_start + size]
            }) else {
                continue;
            };
            for u in &mut old_used[old_start..old_start + size] {
                *u = true;
            }
            for u in &mut new_used[new_start..new_start + size] {
                *u = true;
            }
            moves.push(MoveBlock {
                delete_op_index: old_start,
                insert_op_index: new_start,
                old_range: old_start..old_start + size,
                new_range: new_start..new_start + size,
                lines: old_lines[old_start..old_start + size].iter().map(|s| s.to_string()).collect(),
                similarity: 1.0,
                is_exact: true,
            });
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::Line;

    fn op(kind: OpKind, old: std::ops::Range<usize>, new: std::ops::Range<usize>, lines: &[&str]) -> Operation {
        Operation {
            kind,
            old_range: old,
            new_range: new,
            lines: lines.iter().map(|l| Line::new(*l)).collect(),
            move_id: None,
        }
    }

    #[test]
    fn exact_move_matches_scenario_four() {
        let ops = vec![
            op(OpKind::Delete, 0..3, 0..0, &["x", "y", "z"]),
            op(OpKind::Insert, 3..3, 10..13, &["x", "y", "z"]),
        ];
        let moves = detect_moves(&ops, &MoveDetectionOptions::default());
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].old_range, 0..3);
        assert_eq!(moves[0].new_range, 10..13);
        assert_eq!(moves[0].similarity, 1.0);
        assert!(moves[0].is_exact);
    }

    #[test]
    fn blocks_below_min_size_are_ignored() {
        let ops = vec![
            op(OpKind::Delete, 0..2, 0..0, &["x", "y"]),
            op(OpKind::Insert, 2..2, 10..12, &["x", "y"]),
        ];
        let moves = detect_moves(&ops, &MoveDetectionOptions::default());
        assert!(moves.is_empty());
    }

    #[test]
    fn fuzzy_pass_matches_near_identical_blocks() {
        let ops = vec![
            op(OpKind::Delete, 0..3, 0..0, &["foo", "bar", "baz"]),
            op(OpKind::Insert, 3..3, 10..13, &["foo", "bar", "baz!"]),
        ];
        let moves = detect_moves(&ops, &MoveDetectionOptions::default());
        assert_eq!(moves.len(), 1);
        assert!(!moves[0].is_exact);
        assert!(moves[0].similarity >= MoveDetectionOptions::default().similarity_threshold);
    }

    #[test]
    fn fuzzy_pass_disabled_finds_nothing_for_near_identical_blocks() {
        let ops = vec![
            op(OpKind::Delete, 0..3, 0..0, &["foo", "bar", "baz"]),
            op(OpKind::Insert, 3..3, 10..13, &["foo", "bar", "baz!"]),
        ];
        let options = MoveDetectionOptions {
            detect_fuzzy_moves: false,
            ..Default::default()
        };
        assert!(detect_moves(&ops, &options).is_empty());
    }

    #[test]
    fn annotate_moves_stamps_matching_ids_on_both_operations() {
        let mut ops = vec![
            op(OpKind::Delete, 0..3, 0..0, &["x", "y", "z"]),
            op(OpKind::Insert, 3..3, 10..13, &["x", "y", "z"]),
        ];
        let moves = detect_moves(&ops, &MoveDetectionOptions::default());
        assert_eq!(moves.len(), 1);
        annotate_moves(&mut ops, &moves);
        let delete_id = ops[moves[0].delete_op_index].move_id;
        let insert_id = ops[moves[0].insert_op_index].move_id;
        assert!(delete_id.is_some());
        assert_eq!(delete_id, insert_id);
    }

    #[test]
    fn from_content_finds_relocated_block() {
        let old_lines = vec!["x", "y", "z", "unchanged"];
        let new_lines = vec!["unchanged", "x", "y", "z"];
        let moves = detect_moves_from_content(&old_lines, &new_lines, 3);
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].old_range, 0..3);
        assert_eq!(moves[0].new_range, 1..4);
    }
}
