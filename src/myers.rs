//! The Myers O(ND) shortest-edit-script algorithm: the classic
//! trace-and-backtrack formulation. The O((n+m)*d) trace-snapshot version is
//! used here for its direct correspondence to the textbook algorithm, with
//! no `unsafe`, rather than a linear-space variant.

use crate::intern::Token;
use crate::line::Line;
use crate::operation::{merge, raw_to_operations, OpKind, Operation, RawOp};

/// Computes the Myers edit-script between two interned token sequences,
/// returning merged [`Operation`]s built from the corresponding `Line`
/// slices.
pub fn diff_tokens(
    before_tokens: &[Token],
    after_tokens: &[Token],
    before_lines: &[Line],
    after_lines: &[Line],
) -> Vec<Operation> {
    let raw = raw_edit_script(before_tokens, after_tokens);
    merge(raw_to_operations(raw, before_lines, after_lines))
}

/// Builds the raw (pre-merge), single-line edit script for two token
/// sequences using the classic trace-and-backtrack formulation of Myers'
/// algorithm. Used directly (without going through [`diff_tokens`]) by the
/// Patience and Histogram engines as their fallback when no useful anchor
/// can be found, with indices already rebased into the caller's region.
pub(crate) fn raw_edit_script(a: &[Token], b: &[Token]) -> Vec<RawOp> {
    let n = a.len();
    let m = b.len();

    if n == 0 && m == 0 {
        return Vec::new();
    }
    if n == 0 {
        return vec![RawOp {
            kind: OpKind::Insert,
            old_range: 0..0,
            new_range: 0..m,
        }];
    }
    if m == 0 {
        return vec![RawOp {
            kind: OpKind::Delete,
            old_range: 0..n,
            new_range: 0..0,
        }];
    }

    let trace = shortest_edit_trace(a, b);
    let snakes = backtrack(&trace, a, b);
    snakes_to_ops(snakes)
}

/// A single backtracked step: either a diagonal (`old_end - old_start ==
/// new_end - new_start == 1` and `a[old_start] == b[new_start]`) or an
/// insertion/deletion of a single element.
struct Step {
    old_range: std::ops::Range<usize>,
    new_range: std::ops::Range<usize>,
}

/// Runs the forward Myers search, recording a snapshot of the `V` array
/// *before* each value of `d` is processed. `trace[d]` therefore reflects
/// the furthest-reaching `x` for every diagonal reachable with edit
/// distance `< d`, which is exactly what the backtrack pass needs to
/// reconstruct the path taken to reach edit distance `d`.
fn shortest_edit_trace(a: &[Token], b: &[Token]) -> Vec<Vec<isize>> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    let offset = max;
    let size = (2 * max + 1) as usize;
    let mut v = vec![0isize; size];
    let mut trace = Vec::with_capacity(max as usize + 1);

    let idx = |k: isize| (k + offset) as usize;

    for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            // Tie-break: prefer extending from k+1 ("down", an insertion)
            // unless k is the upper edge of the frontier or the k-1
            // neighbour has made strictly more progress; this fixes the
            // only ambiguity in the algorithm and is evaluated the same way
            // on every run, so output is deterministic.
            let down = k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]);
            let mut x = if down { v[idx(k + 1)] } else { v[idx(k - 1)] + 1 };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[idx(k)] = x;
            if x >= n && y >= m {
                return trace;
            }
            k += 2;
        }
    }
    trace
}

fn backtrack(trace: &[Vec<isize>], a: &[Token], b: &[Token]) -> Vec<Step> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    let offset = max;
    let idx = |k: isize| (k + offset) as usize;

    let mut x = n;
    let mut y = m;
    let mut steps = Vec::new();

    for d in (0..trace.len() as isize).rev() {
        let v = &trace[d as usize];
        let k = x - y;
        let down = k == -d || (k != d && v[idx(k - 1)] < v[idx(k + 1)]);
        let prev_k = if down { k + 1 } else { k - 1 };
        let prev_x = v[idx(prev_k)];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            steps.push(Step {
                old_range: (x - 1) as usize..x as usize,
                new_range: (y - 1) as usize..y as usize,
            });
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if prev_x < x {
                steps.push(Step {
                    old_range: prev_x as usize..x as usize,
                    new_range: y as usize..y as usize,
                });
            } else {
                steps.push(Step {
                    old_range: x as usize..x as usize,
                    new_range: prev_y as usize..y as usize,
                });
            }
        }
        x = prev_x;
        y = prev_y;
    }
    steps.reverse();
    steps
}

fn snakes_to_ops(steps: Vec<Step>) -> Vec<RawOp> {
    steps
        .into_iter()
        .map(|step| {
            let kind = if step.old_range.is_empty() {
                OpKind::Insert
            } else if step.new_range.is_empty() {
                OpKind::Delete
            } else {
                OpKind::Equal
            };
            RawOp {
                kind,
                old_range: step.old_range,
                new_range: step.new_range,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intern::InternedInput;

    fn compute(before: &str, after: &str) -> Vec<Operation> {
        let input = InternedInput::new(
            crate::line::split_lines(before).into_iter(),
            crate::line::split_lines(after).into_iter(),
        );
        let before_lines: Vec<Line> = crate::line::split_lines(before)
            .into_iter()
            .map(Line::new)
            .collect();
        let after_lines: Vec<Line> = crate::line::split_lines(after)
            .into_iter()
            .map(Line::new)
            .collect();
        diff_tokens(&input.before, &input.after, &before_lines, &after_lines)
    }

    #[test]
    fn empty_inputs_yield_no_operations() {
        assert!(compute("", "").is_empty());
    }

    #[test]
    fn pure_insertion_at_start() {
        let ops = compute("b\nc", "a\nb\nc");
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].kind, OpKind::Insert);
        assert_eq!(ops[0].lines, vec![Line::new("a")]);
        assert_eq!(ops[1].kind, OpKind::Equal);
    }

    #[test]
    fn minimal_substitution() {
        let ops = compute("a\nb\nc", "a\nx\nc");
        let kinds: Vec<_> = ops.iter().map(|o| o.kind).collect();
        assert_eq!(
            kinds,
            vec![OpKind::Equal, OpKind::Delete, OpKind::Insert, OpKind::Equal]
        );
        assert_eq!(ops[1].lines, vec![Line::new("b")]);
        assert_eq!(ops[2].lines, vec![Line::new("x")]);
    }

    #[test]
    fn edit_distance_is_minimal() {
        let ops = compute("a\nb\nc\nd\ne", "a\nx\nc\ny\ne");
        let edits: usize = ops
            .iter()
            .filter(|o| !o.is_equal())
            .map(|o| o.old_len().max(o.new_len()))
            .sum();
        assert_eq!(edits, 4); // delete b, insert x, delete d, insert y
    }
}
