//! Top-level orchestration: tokenizes both inputs, interns them, dispatches
//! to the selected engine, merges, hunks, and computes stats, folding every
//! stage into a single [`DiffResult`].

use crate::histogram;
use crate::hunk::generate_hunks;
use crate::intern::InternedInput;
use crate::line::{split_lines, Line};
use crate::line_pair::{self, DEFAULT_SIMILARITY_THRESHOLD};
use crate::myers;
use crate::operation::{merge, raw_to_operations, Operation};
use crate::options::{Algorithm, DiffOptions, DiffResult, Granularity, Stats, WordRefinement};
use crate::patience;
use crate::word_diff::{self, word_diff};

/// Computes a full [`DiffResult`] between `old` and `new` under `options`.
/// When `options.granularity` is `Word` or `Char`, each maximal
/// delete-then-add run in every hunk is refined via the line-pair matcher
/// and the word-diff engine; `line` granularity skips refinement and
/// leaves `word_diffs` empty.
pub fn diff(old: &str, new: &str, options: DiffOptions) -> DiffResult {
    let comparator = options.comparator();
    let old_lines: Vec<&str> = split_lines(old);
    let new_lines: Vec<&str> = split_lines(new);

    let old_keys = old_lines.iter().map(|l| comparator.key(l));
    let new_keys = new_lines.iter().map(|l| comparator.key(l));
    let input: InternedInput<Line> = InternedInput::new(old_keys, new_keys);

    let before_lines: Vec<Line> = old_lines.iter().map(|&l| Line::new(l)).collect();
    let after_lines: Vec<Line> = new_lines.iter().map(|&l| Line::new(l)).collect();

    let ops = diff_tokens(options.algorithm, &input.before, &input.after, &before_lines, &after_lines);

    let hunks = generate_hunks(&ops, options.context);
    let stats = Stats::from_operations(&ops, old_lines.len(), new_lines.len());

    let word_diffs = match options.granularity {
        Granularity::Line => Vec::new(),
        Granularity::Word => refine_hunks(&hunks, &old_lines, &new_lines, word_diff::Granularity::Word, &comparator),
        Granularity::Char => refine_hunks(&hunks, &old_lines, &new_lines, word_diff::Granularity::Char, &comparator),
    };

    DiffResult {
        operations: ops,
        hunks,
        stats,
        options,
        word_diffs,
    }
}

fn refine_hunks(
    hunks: &[crate::hunk::Hunk],
    old_lines: &[&str],
    new_lines: &[&str],
    granularity: word_diff::Granularity,
    comparator: &crate::line::ComparatorOptions,
) -> Vec<WordRefinement> {
    let mut refinements = Vec::new();
    for (hunk_index, hunk) in hunks.iter().enumerate() {
        for (delete_range, add_range) in line_pair::delete_then_add_runs(&hunk.changes) {
            let removed: Vec<&str> = hunk.changes[delete_range.clone()]
                .iter()
                .map(|c| old_lines[c.old_line().unwrap() - 1])
                .collect();
            let added: Vec<&str> = hunk.changes[add_range.clone()]
                .iter()
                .map(|c| new_lines[c.new_line().unwrap() - 1])
                .collect();
            for pair in line_pair::pair_lines(&removed, &added, DEFAULT_SIMILARITY_THRESHOLD) {
                let result = word_diff(removed[pair.removed_index], added[pair.added_index], granularity, comparator);
                refinements.push(WordRefinement {
                    hunk_index,
                    delete_change_index: delete_range.start + pair.removed_index,
                    result,
                });
            }
        }
    }
    refinements
}

fn diff_tokens(
    algorithm: Algorithm,
    before_tokens: &[crate::intern::Token],
    after_tokens: &[crate::intern::Token],
    before_lines: &[Line],
    after_lines: &[Line],
) -> Vec<Operation> {
    match algorithm {
        Algorithm::Myers => myers::diff_tokens(before_tokens, after_tokens, before_lines, after_lines),
        Algorithm::Patience => {
            let raw = patience::raw_edit_script(before_tokens, after_tokens);
            merge(raw_to_operations(raw, before_lines, after_lines))
        }
        Algorithm::Histogram => {
            let raw = histogram::raw_edit_script(before_tokens, after_tokens);
            merge(raw_to_operations(raw, before_lines, after_lines))
        }
    }
}
