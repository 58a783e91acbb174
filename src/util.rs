//! Shared helpers for stripping common affixes, used by the Patience and
//! Histogram engines.

use crate::intern::Token;

pub fn common_prefix_len(a: &[Token], b: &[Token]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

pub fn common_suffix_len(a: &[Token], b: &[Token]) -> usize {
    a.iter().rev().zip(b.iter().rev()).take_while(|(x, y)| x == y).count()
}

/// Strips the common prefix and suffix shared by `a` and `b`, returning the
/// middle slices plus the prefix/suffix lengths that were removed.
pub fn strip_common_ends<'a>(
    a: &'a [Token],
    b: &'a [Token],
) -> (&'a [Token], &'a [Token], usize, usize) {
    let prefix = common_prefix_len(a, b);
    let a_rest = &a[prefix..];
    let b_rest = &b[prefix..];
    let suffix = common_suffix_len(a_rest, b_rest);
    let a_mid = &a_rest[..a_rest.len() - suffix];
    let b_mid = &b_rest[..b_rest.len() - suffix];
    (a_mid, b_mid, prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(ids: &[u32]) -> Vec<Token> {
        ids.iter().map(|&i| Token(i)).collect()
    }

    #[test]
    fn strips_prefix_and_suffix() {
        let a = toks(&[1, 2, 3, 4, 9]);
        let b = toks(&[1, 2, 5, 4, 9]);
        let (mid_a, mid_b, prefix, suffix) = strip_common_ends(&a, &b);
        assert_eq!(prefix, 2);
        assert_eq!(suffix, 2);
        assert_eq!(mid_a, &[Token(3)]);
        assert_eq!(mid_b, &[Token(5)]);
    }

    #[test]
    fn no_overlap_between_prefix_and_suffix_when_fully_shared() {
        let a = toks(&[1, 1, 1]);
        let b = toks(&[1, 1, 1]);
        let (mid_a, mid_b, prefix, suffix) = strip_common_ends(&a, &b);
        assert_eq!(prefix + suffix, 3);
        assert!(mid_a.is_empty());
        assert!(mid_b.is_empty());
    }
}
