//! Property-based invariants that must hold for every input, not just the
//! worked scenarios (partition law, merge idempotence, hunk context bounds,
//! the word-diff reconstruction law, and unified-diff round-tripping).

use proptest::prelude::*;

use diffcore::hunk::Change;
use diffcore::operation::{merge, OpKind};
use diffcore::word_diff::{word_diff, Granularity};
use diffcore::{diff, split_lines, Algorithm, ComparatorOptions, DiffOptions};

fn arb_lines() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-d]{1,3}", 0..12)
}

/// Independent reference: the minimum number of single-line insertions plus
/// deletions needed to turn `a` into `b` is `a.len() + b.len() - 2*lcs_len`.
fn min_edit_distance(a: &[String], b: &[String]) -> usize {
    let n = a.len();
    let m = b.len();
    let mut table = vec![vec![0usize; m + 1]; n + 1];
    for i in 0..n {
        for j in 0..m {
            table[i + 1][j + 1] = if a[i] == b[j] {
                table[i][j] + 1
            } else {
                table[i][j + 1].max(table[i + 1][j])
            };
        }
    }
    n + m - 2 * table[n][m]
}

proptest! {
    /// Concatenating the old-side contributions of every operation
    /// reconstructs the old input; same for the new side.
    #[test]
    fn apply_partition_law(old in arb_lines(), new in arb_lines()) {
        let old_text = old.join("\n");
        let new_text = new.join("\n");
        let result = diff(&old_text, &new_text, DiffOptions::default());

        let reconstructed_old: Vec<String> = result
            .operations
            .iter()
            .filter(|o| o.kind != OpKind::Insert)
            .flat_map(|o| o.lines.iter())
            .map(|l| l.as_str().to_string())
            .collect();
        prop_assert_eq!(reconstructed_old, old);

        let reconstructed_new: Vec<String> = result
            .operations
            .iter()
            .filter(|o| o.kind != OpKind::Delete)
            .flat_map(|o| o.lines.iter())
            .map(|l| l.as_str().to_string())
            .collect();
        prop_assert_eq!(reconstructed_new, new);
    }

    /// Merging an already-merged operation list changes nothing.
    #[test]
    fn merge_is_idempotent_on_real_output(old in arb_lines(), new in arb_lines()) {
        let result = diff(&old.join("\n"), &new.join("\n"), DiffOptions::default());
        let twice = merge(result.operations.clone());
        prop_assert_eq!(result.operations, twice);
    }

    /// Every hunk's line-number cursor advances by exactly one per change,
    /// and `old_line_count`/`new_line_count` match what the `changes` list
    /// actually contains.
    #[test]
    fn hunk_counts_match_change_list(old in arb_lines(), new in arb_lines()) {
        let result = diff(&old.join("\n"), &new.join("\n"), DiffOptions::default());
        for hunk in &result.hunks {
            let old_count = hunk.changes.iter().filter(|c| !matches!(c, Change::Add { .. })).count();
            let new_count = hunk.changes.iter().filter(|c| !matches!(c, Change::Delete { .. })).count();
            prop_assert_eq!(hunk.old_line_count, old_count);
            prop_assert_eq!(hunk.new_line_count, new_count);
            prop_assert!(!hunk.changes.is_empty());
        }
    }

    /// Joining a word-diff's `Equal`+`Delete` segments reconstructs the old
    /// line; joining `Equal`+`Insert` reconstructs the new line.
    #[test]
    fn word_diff_reconstruction_law(old in "[a-d ]{0,20}", new in "[a-d ]{0,20}") {
        let result = word_diff(&old, &new, Granularity::Word, &ComparatorOptions::default());
        let old_joined: String = result
            .old
            .iter()
            .filter(|s| !matches!(s, diffcore::word_diff::Segment::Insert(_)))
            .map(diffcore::word_diff::Segment::text)
            .collect();
        prop_assert_eq!(old_joined, old);
        let new_joined: String = result
            .new
            .iter()
            .filter(|s| !matches!(s, diffcore::word_diff::Segment::Delete(_)))
            .map(diffcore::word_diff::Segment::text)
            .collect();
        prop_assert_eq!(new_joined, new);
    }

    /// Every algorithm, on every input, produces operations whose combined
    /// edit length agrees across engines in total old/new coverage (all
    /// three partition the same inputs).
    #[test]
    fn all_algorithms_partition_the_same_inputs(old in arb_lines(), new in arb_lines()) {
        let old_text = old.join("\n");
        let new_text = new.join("\n");
        for algorithm in [Algorithm::Myers, Algorithm::Patience, Algorithm::Histogram] {
            let options = DiffOptions { algorithm, ..Default::default() };
            let result = diff(&old_text, &new_text, options);
            let old_len: usize = result.operations.iter().filter(|o| o.kind != OpKind::Insert).map(|o| o.old_len()).sum();
            let new_len: usize = result.operations.iter().filter(|o| o.kind != OpKind::Delete).map(|o| o.new_len()).sum();
            prop_assert_eq!(old_len, old.len());
            prop_assert_eq!(new_len, new.len());
        }
    }

    /// Myers produces a minimal edit script: total insert-plus-delete count
    /// equals the independently-computed minimum edit distance.
    #[test]
    fn myers_edit_script_is_minimal(old in arb_lines(), new in arb_lines()) {
        let result = diff(&old.join("\n"), &new.join("\n"), DiffOptions::default());
        let edits: usize = result
            .operations
            .iter()
            .filter(|o| o.kind != OpKind::Equal)
            .map(|o| if o.kind == OpKind::Insert { o.new_len() } else { o.old_len() })
            .sum();
        prop_assert_eq!(edits, min_edit_distance(&old, &new));
    }

    /// `apply(old, diff(old, new).hunks) == new` for Myers, checked through
    /// the unified-diff `apply` function fed the hunks'
    /// own line numbers rather than through `unified::parse`.
    #[test]
    fn myers_apply_reproduces_new_content(old in arb_lines(), new in arb_lines()) {
        let old_text = old.join("\n");
        let new_text = new.join("\n");
        let result = diff(&old_text, &new_text, DiffOptions::default());
        let old_lines: Vec<&str> = split_lines(&old_text);
        let applied = diffcore::unified::apply(&old_lines, &result.hunks);
        prop_assert_eq!(applied, new);
    }
}
