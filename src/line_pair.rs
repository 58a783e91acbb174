//! Pairs removed lines with added lines by similarity so the word-diff
//! engine can refine the right pairs, plus the pass that finds which runs
//! of a change list are eligible for refinement in the first place. Uses
//! [`crate::word_diff`]'s word-LCS for scoring; [`crate::similarity`] backs
//! the move detector instead, which scores whole blocks rather than token
//! overlap.

use crate::hunk::Change;
use crate::line::ComparatorOptions;
use crate::word_diff::{tokenize_for_similarity, Granularity};

/// Minimum similarity a removed/added line pair must clear to be considered
/// a refinement candidate.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.4;

/// A matched `(removed_index, added_index, similarity)` triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePair {
    pub removed_index: usize,
    pub added_index: usize,
    pub similarity: f64,
}

/// Scores every `(i, j)` pair between `removed` and `added` by the fraction
/// of the larger line's character length contributed by matched word
/// tokens, discards anything below `threshold`, then greedily pairs by
/// descending similarity, skipping already-consumed indices. Each index
/// appears in at most one returned pair.
pub fn pair_lines(removed: &[&str], added: &[&str], threshold: f64) -> Vec<LinePair> {
    let mut candidates = Vec::new();
    for (i, r) in removed.iter().enumerate() {
        for (j, a) in added.iter().enumerate() {
            let score = word_lcs_similarity(r, a);
            if score >= threshold {
                candidates.push(LinePair {
                    removed_index: i,
                    added_index: j,
                    similarity: score,
                });
            }
        }
    }
    candidates.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap());

    let mut used_removed = vec![false; removed.len()];
    let mut used_added = vec![false; added.len()];
    let mut pairs = Vec::new();
    for candidate in candidates {
        if used_removed[candidate.removed_index] || used_added[candidate.added_index] {
            continue;
        }
        used_removed[candidate.removed_index] = true;
        used_added[candidate.added_index] = true;
        pairs.push(candidate);
    }
    pairs
}

/// The fraction of the larger line's character length contributed by
/// tokens matched in the word-level LCS of `a` and `b`.
fn word_lcs_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let options = ComparatorOptions::default();
    let matched_chars = tokenize_for_similarity(a, b, Granularity::Word, &options);
    matched_chars as f64 / max_len as f64
}

/// Finds every maximal run of `delete` changes immediately followed by a
/// run of `add` changes within `changes`, returning `(delete_range,
/// add_range)` index pairs. Runs separated by a `normal` change are never
/// paired.
pub fn delete_then_add_runs(changes: &[Change]) -> Vec<(std::ops::Range<usize>, std::ops::Range<usize>)> {
    let mut runs = Vec::new();
    let mut i = 0;
    while i < changes.len() {
        if matches!(changes[i], Change::Delete { .. }) {
            let delete_start = i;
            while i < changes.len() && matches!(changes[i], Change::Delete { .. }) {
                i += 1;
            }
            let delete_end = i;
            let add_start = i;
            while i < changes.len() && matches!(changes[i], Change::Add { .. }) {
                i += 1;
            }
            let add_end = i;
            if add_end > add_start {
                runs.push((delete_start..delete_end, add_start..add_end));
            }
        } else {
            i += 1;
        }
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_most_similar_lines_first() {
        let removed = ["let x = 1;", "totally different"];
        let added = ["let x = 2;", "nothing alike"];
        let pairs = pair_lines(&removed, &added, DEFAULT_SIMILARITY_THRESHOLD);
        assert!(pairs.iter().any(|p| p.removed_index == 0 && p.added_index == 0));
    }

    #[test]
    fn pairs_below_threshold_are_discarded() {
        let removed = ["abc"];
        let added = ["xyz"];
        let pairs = pair_lines(&removed, &added, DEFAULT_SIMILARITY_THRESHOLD);
        assert!(pairs.is_empty());
    }

    #[test]
    fn each_index_used_at_most_once() {
        let removed = ["foo bar", "foo baz"];
        let added = ["foo bar"];
        let pairs = pair_lines(&removed, &added, DEFAULT_SIMILARITY_THRESHOLD);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn delete_add_runs_split_on_normal() {
        use crate::line::Line;
        let changes = vec![
            Change::Delete { old_line: 1, text: Line::new("a") },
            Change::Add { new_line: 1, text: Line::new("x") },
            Change::Normal { old_line: 2, new_line: 2, text: Line::new("b") },
            Change::Delete { old_line: 3, text: Line::new("c") },
            Change::Add { new_line: 3, text: Line::new("y") },
        ];
        let runs = delete_then_add_runs(&changes);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], (0..1, 1..2));
        assert_eq!(runs[1], (3..4, 4..5));
    }
}
