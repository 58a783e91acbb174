//! The Histogram diff algorithm: anchors on the line with the lowest
//! combined occurrence count on both sides and recurses between anchors,
//! falling back to Myers when no candidate exists or recursion runs too
//! deep. Occurrence counting is keyed by interned token through a plain
//! `hashbrown::HashMap` pass.

use hashbrown::HashMap;

use crate::intern::Token;
use crate::myers;
use crate::operation::{OpKind, RawOp};

/// Recursion past this depth almost certainly means the input is
/// pathologically repetitive; bail out to Myers rather than keep dividing.
const MAX_RECURSION_DEPTH: u32 = 64;

pub(crate) fn raw_edit_script(a: &[Token], b: &[Token]) -> Vec<RawOp> {
    recurse(a, b, 0, 0, 0)
}

fn recurse(a: &[Token], b: &[Token], old_off: usize, new_off: usize, depth: u32) -> Vec<RawOp> {
    let (mid_a, mid_b, prefix, suffix) = crate::util::strip_common_ends(a, b);

    let mut ops = Vec::new();
    if prefix > 0 {
        ops.push(RawOp {
            kind: OpKind::Equal,
            old_range: old_off..old_off + prefix,
            new_range: new_off..new_off + prefix,
        });
    }

    let mid_old_off = old_off + prefix;
    let mid_new_off = new_off + prefix;

    if mid_a.is_empty() && mid_b.is_empty() {
        // nothing left in the middle
    } else if mid_a.is_empty() {
        ops.push(RawOp {
            kind: OpKind::Insert,
            old_range: mid_old_off..mid_old_off,
            new_range: mid_new_off..mid_new_off + mid_b.len(),
        });
    } else if mid_b.is_empty() {
        ops.push(RawOp {
            kind: OpKind::Delete,
            old_range: mid_old_off..mid_old_off + mid_a.len(),
            new_range: mid_new_off..mid_new_off,
        });
    } else if depth >= MAX_RECURSION_DEPTH {
        log::trace!("histogram: recursion depth cap reached, falling back to myers");
        ops.extend(rebase(myers::raw_edit_script(mid_a, mid_b), mid_old_off, mid_new_off));
    } else {
        ops.extend(diff_middle(mid_a, mid_b, mid_old_off, mid_new_off, depth));
    }

    if suffix > 0 {
        let suffix_old_off = old_off + a.len() - suffix;
        let suffix_new_off = new_off + b.len() - suffix;
        ops.push(RawOp {
            kind: OpKind::Equal,
            old_range: suffix_old_off..suffix_old_off + suffix,
            new_range: suffix_new_off..suffix_new_off + suffix,
        });
    }
    ops
}

fn diff_middle(a: &[Token], b: &[Token], old_off: usize, new_off: usize, depth: u32) -> Vec<RawOp> {
    match find_anchor(a, b) {
        None => {
            log::trace!("histogram: no shared line in region, falling back to myers");
            rebase(myers::raw_edit_script(a, b), old_off, new_off)
        }
        Some(anchor) => {
            let mut ops = Vec::new();
            if anchor.old_idx > 0 || anchor.new_idx > 0 {
                ops.extend(recurse(
                    &a[..anchor.old_idx],
                    &b[..anchor.new_idx],
                    old_off,
                    new_off,
                    depth + 1,
                ));
            }
            ops.push(RawOp {
                kind: OpKind::Equal,
                old_range: old_off + anchor.old_idx..old_off + anchor.old_idx + 1,
                new_range: new_off + anchor.new_idx..new_off + anchor.new_idx + 1,
            });
            let old_rest = anchor.old_idx + 1;
            let new_rest = anchor.new_idx + 1;
            if old_rest < a.len() || new_rest < b.len() {
                ops.extend(recurse(
                    &a[old_rest..],
                    &b[new_rest..],
                    old_off + old_rest,
                    new_off + new_rest,
                    depth + 1,
                ));
            }
            ops
        }
    }
}

fn rebase(raw: Vec<RawOp>, old_off: usize, new_off: usize) -> Vec<RawOp> {
    raw.into_iter()
        .map(|mut op| {
            op.old_range = op.old_range.start + old_off..op.old_range.end + old_off;
            op.new_range = op.new_range.start + new_off..op.new_range.end + new_off;
            op
        })
        .collect()
}

struct Anchor {
    old_idx: usize,
    new_idx: usize,
}

/// Finds the lowest-score split anchor: for every token
/// appearing at least once on each side, score it by `occurrences_in_a +
/// occurrences_in_b` and keep the lowest-scoring one, breaking ties by
/// first appearance in `a`. Scanning stops as soon as a score-2 candidate
/// is found, since 2 is the minimum possible score (both sides occurring
/// exactly once) and nothing can beat it.
fn find_anchor(a: &[Token], b: &[Token]) -> Option<Anchor> {
    let mut counts_a: HashMap<Token, (u32, usize)> = HashMap::new();
    for (i, &tok) in a.iter().enumerate() {
        let entry = counts_a.entry(tok).or_insert((0, i));
        entry.0 += 1;
    }
    let mut counts_b: HashMap<Token, (u32, usize)> = HashMap::new();
    for (i, &tok) in b.iter().enumerate() {
        let entry = counts_b.entry(tok).or_insert((0, i));
        entry.0 += 1;
    }

    let mut best: Option<(u32, Anchor)> = None;
    for (i, &tok) in a.iter().enumerate() {
        let (_, first_a) = counts_a[&tok];
        if first_a != i {
            // Only consider each distinct token once, at its first
            // appearance in `a`, so ties break by first appearance.
            continue;
        }
        let Some(&(count_b, first_b)) = counts_b.get(&tok) else {
            continue;
        };
        let count_a = counts_a[&tok].0;
        let score = count_a + count_b;
        let better = match &best {
            None => true,
            Some((best_score, _)) => score < *best_score,
        };
        if better {
            best = Some((
                score,
                Anchor {
                    old_idx: first_a,
                    new_idx: first_b,
                },
            ));
            if score == 2 {
                break;
            }
        }
    }
    best.map(|(_, anchor)| anchor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::InternedInput;
    use crate::line::{split_lines, Line};
    use crate::operation::{merge, raw_to_operations, Operation};

    fn compute(before: &str, after: &str) -> Vec<Operation> {
        let input = InternedInput::new(split_lines(before).into_iter(), split_lines(after).into_iter());
        let before_lines: Vec<Line> = split_lines(before).into_iter().map(Line::new).collect();
        let after_lines: Vec<Line> = split_lines(after).into_iter().map(Line::new).collect();
        let raw = raw_edit_script(&input.before, &input.after);
        merge(raw_to_operations(raw, &before_lines, &after_lines))
    }

    #[test]
    fn anchors_on_lowest_score_line() {
        let before = "header\nfn(){\n  old\n}\nfooter";
        let after = "header\nfn(){\n  new\n}\nfooter";
        let ops = compute(before, after);
        let equal_lines: Vec<&str> = ops
            .iter()
            .filter(|o| o.is_equal())
            .flat_map(|o| o.lines.iter())
            .map(|l| l.as_str())
            .collect();
        for anchor in ["header", "fn(){", "}", "footer"] {
            assert!(equal_lines.contains(&anchor), "missing anchor {anchor}");
        }
        let changed: Vec<&str> = ops
            .iter()
            .filter(|o| !o.is_equal())
            .flat_map(|o| o.lines.iter())
            .map(|l| l.as_str())
            .collect();
        assert_eq!(changed, vec!["  old", "  new"]);
    }

    #[test]
    fn prefers_rarer_token_over_more_common_one() {
        // "rare" occurs once on each side (score 2); "common" occurs twice
        // on each side (score 4). The anchor should be "rare", splitting the
        // region so "common" on either side of it is diffed separately.
        let anchor = find_anchor(
            &tokens(&["common", "rare", "common"]),
            &tokens(&["common", "rare", "common"]),
        )
        .unwrap();
        assert_eq!(anchor.old_idx, 1);
        assert_eq!(anchor.new_idx, 1);
    }

    #[test]
    fn no_anchor_when_sides_share_nothing() {
        assert!(find_anchor(&tokens(&["a", "b"]), &tokens(&["c", "d"])).is_none());
    }

    fn tokens(values: &[&str]) -> Vec<Token> {
        let mut interner = crate::intern::Interner::with_capacity(values.len());
        values.iter().map(|v| interner.intern(v.to_string())).collect()
    }
}
