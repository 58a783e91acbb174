//! End-to-end scenarios from the testable-properties table: one test per
//! concrete example, plus the multi-file unified-diff parse.

use diffcore::hunk::Change;
use diffcore::line::Line;
use diffcore::moves::{detect_moves, MoveDetectionOptions};
use diffcore::operation::OpKind;
use diffcore::semantic::{diff_tree, SemanticDiffOptions};
use diffcore::unified::parse_multi_file;
use diffcore::{diff, Algorithm, DiffOptions};

#[test]
fn minimal_substitution_with_myers() {
    let result = diff("a\nb\nc", "a\nx\nc", DiffOptions::default());
    assert_eq!(result.hunks.len(), 1);
    assert_eq!(
        result.hunks[0].changes,
        vec![
            Change::Normal { old_line: 1, new_line: 1, text: Line::new("a") },
            Change::Delete { old_line: 2, text: Line::new("b") },
            Change::Add { new_line: 2, text: Line::new("x") },
            Change::Normal { old_line: 3, new_line: 3, text: Line::new("c") },
        ]
    );
    assert_eq!(result.stats.additions, 1);
    assert_eq!(result.stats.deletions, 1);
    assert_eq!(result.stats.old_line_count, 3);
    assert_eq!(result.stats.new_line_count, 3);
    assert_eq!(result.hunks[0].header, "@@ -1,3 +1,3 @@");
}

#[test]
fn pure_insertion_at_start() {
    let result = diff("b\nc", "a\nb\nc", DiffOptions::default());
    assert_eq!(result.operations.len(), 2);
    assert_eq!(result.operations[0].kind, OpKind::Insert);
    assert_eq!(result.operations[0].lines.len(), 1);
    assert_eq!(result.operations[0].lines[0].as_str(), "a");
    assert_eq!(result.stats.additions, 1);
    assert_eq!(result.stats.deletions, 0);
}

#[test]
fn patience_anchoring_preserves_unique_lines() {
    let options = DiffOptions {
        algorithm: Algorithm::Patience,
        ..Default::default()
    };
    let result = diff(
        "header\nfn(){\n  old\n}\nfooter",
        "header\nfn(){\n  new\n}\nfooter",
        options,
    );
    let equal_lines: Vec<&str> = result
        .operations
        .iter()
        .filter(|o| o.is_equal())
        .flat_map(|o| o.lines.iter())
        .map(|l| l.as_str())
        .collect();
    for anchor in ["header", "fn(){", "}", "footer"] {
        assert!(equal_lines.contains(&anchor));
    }
    let changed: Vec<&str> = result
        .operations
        .iter()
        .filter(|o| !o.is_equal())
        .flat_map(|o| o.lines.iter())
        .map(|l| l.as_str())
        .collect();
    assert_eq!(changed, vec!["  old", "  new"]);
}

#[test]
fn exact_move_detection() {
    let result = diff("x\ny\nz\na\nb\nc\nd\ne\nf\ng\nh", "a\nb\nc\nd\ne\nf\ng\nh\nx\ny\nz", DiffOptions::default());
    let moves = detect_moves(&result.operations, &MoveDetectionOptions::default());
    assert_eq!(moves.len(), 1);
    assert_eq!(moves[0].old_range, 0..3);
    assert_eq!(moves[0].similarity, 1.0);
    assert!(moves[0].is_exact);
}

#[test]
fn semantic_diff_nested_modify() {
    let old = serde_json::json!({ "user": { "name": "Alice", "age": 30 } });
    let new = serde_json::json!({ "user": { "name": "Bob", "age": 30 } });
    let (changes, stats) = diff_tree(&old, &new, &SemanticDiffOptions::default());
    assert_eq!(changes.len(), 1);
    assert!(!stats.is_equal());
}

#[test]
fn unified_diff_multi_file_git_patch() {
    let text = "diff --git a/f1 b/f1\n--- a/f1\n+++ b/f1\n@@ -1 +1 @@\n-x\n+y\n\
diff --git a/f2 b/f2\n--- a/f2\n+++ b/f2\n@@ -1 +1 @@\n-x\n+y\n";
    let parsed = parse_multi_file(text).unwrap();
    assert_eq!(parsed.files.len(), 2);
    let total_additions: usize = parsed
        .files
        .iter()
        .flat_map(|f| &f.hunks)
        .flat_map(|h| &h.changes)
        .filter(|c| matches!(c, Change::Add { .. }))
        .count();
    assert_eq!(total_additions, 2);
}
