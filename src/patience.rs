//! The Patience diff algorithm: anchors on lines unique to each side and
//! recurses between anchors, falling back to Myers when no useful anchor
//! exists. Shares its recursive "strip affixes, find anchors, recurse
//! between them" skeleton with the Histogram engine; only the
//! anchor-selection step differs.

use hashbrown::HashMap;

use crate::intern::Token;
use crate::myers;
use crate::operation::{OpKind, RawOp};

pub(crate) fn raw_edit_script(a: &[Token], b: &[Token]) -> Vec<RawOp> {
    recurse(a, b, 0, 0)
}

fn recurse(a: &[Token], b: &[Token], old_off: usize, new_off: usize) -> Vec<RawOp> {
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
        // nothing to do in the middle
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
    } else {
        ops.extend(diff_middle(mid_a, mid_b, mid_old_off, mid_new_off));
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

fn diff_middle(a: &[Token], b: &[Token], old_off: usize, new_off: usize) -> Vec<RawOp> {
    let anchors = unique_line_anchors(a, b);
    let lis = longest_increasing_by_new_index(&anchors);

    if lis.is_empty() {
        log::trace!("patience: no anchors in region, falling back to myers");
        return rebase(myers::raw_edit_script(a, b), old_off, new_off);
    }

    let mut ops = Vec::new();
    let mut prev_old = 0usize;
    let mut prev_new = 0usize;
    for &(old_idx, new_idx) in &lis {
        if old_idx > prev_old || new_idx > prev_new {
            ops.extend(recurse(
                &a[prev_old..old_idx],
                &b[prev_new..new_idx],
                old_off + prev_old,
                new_off + prev_new,
            ));
        }
        ops.push(RawOp {
            kind: OpKind::Equal,
            old_range: old_off + old_idx..old_off + old_idx + 1,
            new_range: new_off + new_idx..new_off + new_idx + 1,
        });
        prev_old = old_idx + 1;
        prev_new = new_idx + 1;
    }
    if prev_old < a.len() || prev_new < b.len() {
        ops.extend(recurse(
            &a[prev_old..],
            &b[prev_new..],
            old_off + prev_old,
            new_off + prev_new,
        ));
    }
    ops
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

/// Finds lines that occur exactly once in `a` and exactly once in `b`,
/// returning their `(old_index, new_index)` pairs.
fn unique_line_anchors(a: &[Token], b: &[Token]) -> Vec<(usize, usize)> {
    let mut counts_a: HashMap<Token, (u32, usize)> = HashMap::new();
    for (i, &tok) in a.iter().enumerate() {
        let entry = counts_a.entry(tok).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = i;
    }
    let mut counts_b: HashMap<Token, (u32, usize)> = HashMap::new();
    for (i, &tok) in b.iter().enumerate() {
        let entry = counts_b.entry(tok).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = i;
    }

    let mut anchors = Vec::new();
    for (&tok, &(count_a, idx_a)) in &counts_a {
        if count_a != 1 {
            continue;
        }
        if let Some(&(count_b, idx_b)) = counts_b.get(&tok) {
            if count_b == 1 {
                anchors.push((idx_a, idx_b));
            }
        }
    }
    anchors.sort_unstable_by_key(|&(old_idx, _)| old_idx);
    anchors
}

/// Computes the longest strictly-increasing (by `new_index`) subsequence of
/// `anchors`, which is already ordered by `old_index`. This is
/// the classic patience-sort LIS: `piles[i]` holds the smallest tail value
/// seen so far for an increasing run of length `i + 1`; `backpointers`
/// records, for each element appended to a pile, the index of the element
/// that preceded it in that run.
fn longest_increasing_by_new_index(anchors: &[(usize, usize)]) -> Vec<(usize, usize)> {
    if anchors.is_empty() {
        return Vec::new();
    }

    let mut piles: Vec<usize> = Vec::new(); // indices into `anchors`, one per pile, tail element
    let mut backpointers: Vec<Option<usize>> = vec![None; anchors.len()];

    for i in 0..anchors.len() {
        let new_idx = anchors[i].1;
        let pile = piles.partition_point(|&p| anchors[p].1 < new_idx);
        if pile > 0 {
            backpointers[i] = Some(piles[pile - 1]);
        }
        if pile == piles.len() {
            piles.push(i);
        } else {
            piles[pile] = i;
        }
    }

    let mut lis = Vec::with_capacity(piles.len());
    let mut cur = piles.last().copied();
    while let Some(i) = cur {
        lis.push(anchors[i]);
        cur = backpointers[i];
    }
    lis.reverse();
    lis
}
