//! Line-to-line similarity scoring.
//!
//! Two lines are compared byte-for-byte up to their shared prefix, then
//! token by token: after any mismatch both cursors jump to the next space,
//! so runs of equal bytes only count when they start on the same token
//! boundary. The score is the total number of bytes a differential encoding
//! could copy from the reference line.

use crate::quote::first_space;
use crate::MAX_SIMILARITY;

/// How the scored line lines up with its reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prefix {
    /// The first `n` bytes of both lines are equal (`n` may be zero).
    Shared(usize),
    /// No shared prefix, but token matching succeeds once the reference
    /// cursor starts at this offset. Always at least 1; a would-be offset of
    /// zero is expressed as `Shared(0)`, which encodes the same bytes.
    KeyOffset(usize),
}

impl Default for Prefix {
    fn default() -> Self {
        Prefix::Shared(0)
    }
}

/// Scores `curr` against `ref_line`, returning the prefix relation and a
/// similarity score. Higher scores mean more bytes are recoverable from
/// `ref_line`; the score is bounded by the comparison window of
/// `min(len(ref), len(curr), 140)` bytes.
pub(crate) fn estimate_similarity(ref_line: &[u8], curr: &[u8]) -> (Prefix, usize) {
    let limit = ref_line.len().min(curr.len()).min(MAX_SIMILARITY);
    let r = &ref_line[..limit];
    let c = &curr[..limit];

    let mut shared = 0;
    while shared < limit && r[shared] == c[shared] {
        shared += 1;
    }

    let mut ir = first_space(r, shared);
    let mut ic = first_space(c, shared);

    // Token matching can still pay off without a shared prefix, as long as
    // both lines have a token boundary to sync on.
    let prefix = if shared == 0 && ir > 0 && ir < limit && ic < limit {
        Prefix::KeyOffset(ir)
    } else {
        Prefix::Shared(shared)
    };

    let mut score = shared;
    let mut run = 0;
    while ir < limit && ic < limit {
        if r[ir] == c[ic] {
            run += 1;
            ir += 1;
            ic += 1;
        } else {
            score += run;
            run = 0;
            ir = first_space(r, ir);
            ic = first_space(c, ic);
        }
    }

    (prefix, score + run)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_lines_score_their_length() {
        let line = b"[warn] disk almost full\n";
        let (prefix, score) = estimate_similarity(line, line);
        assert_eq!(prefix, Prefix::Shared(line.len()));
        assert_eq!(score, line.len());
    }

    #[test]
    fn shared_prefix_plus_matching_tail_tokens() {
        let (prefix, score) = estimate_similarity(b"GET /a HTTP/1.1\n", b"GET /b HTTP/1.1\n");
        // "GET /" is shared; "HTTP/1.1\n" re-syncs on the space after the path
        assert_eq!(prefix, Prefix::Shared(5));
        assert_eq!(score, 5 + " HTTP/1.1\n".len());
    }

    #[test]
    fn no_shared_prefix_reports_key_offset() {
        let (prefix, score) = estimate_similarity(b"alpha code=7\n", b"beta code=7\n");
        assert_eq!(prefix, Prefix::KeyOffset(5));
        // the window is the shorter line, so the ref's newline is outside it
        assert_eq!(score, " code=7".len());
    }

    #[test]
    fn ref_starting_with_space_degrades_to_shared_zero() {
        let (prefix, _) = estimate_similarity(b" x y\n", b"q x y\n");
        assert_eq!(prefix, Prefix::Shared(0));
    }

    #[test]
    fn disjoint_lines_score_zero() {
        let (prefix, score) = estimate_similarity(b"aaaa\n", b"bbbb\n");
        assert_eq!(prefix, Prefix::Shared(0));
        assert_eq!(score, 0);
    }

    #[test]
    fn scoring_window_caps_long_lines() {
        let a = vec![b'x'; 400];
        let (prefix, score) = estimate_similarity(&a, &a);
        assert_eq!(prefix, Prefix::Shared(MAX_SIMILARITY));
        assert_eq!(score, MAX_SIMILARITY);
    }
}
