//! Bounded cyclic history of recently seen lines.
//!
//! The ring is a fixed-size array plus two cursors; nothing is allocated
//! per entry. `push` writes at `write_idx` and bumps `oldest_idx` along once
//! the ring is full, so at any moment the ring holds the most recent `n`
//! entries in insertion order, `n` at most the configured capacity.
//!
//! Entries are whatever the caller can name a line by: the compressor keeps
//! `&[u8]` slices of its input, the decompressor keeps `(start, end)` spans
//! of its own output buffer.

use crate::similarity::{estimate_similarity, Prefix};
use crate::{MAX_BACKREF_CAPACITY, MAX_SIMILARITY};

/// Result of a key-line search: the best-scoring candidate in the ring.
pub(crate) struct LineRef<'a> {
    /// Distance back in insertion order, 1 = immediately previous line.
    pub lines_before: u8,
    /// The candidate's bytes; empty when nothing scored above zero.
    pub key_line: &'a [u8],
    /// Prefix relation between `key_line` and the scored line.
    pub prefix: Prefix,
    /// Its similarity score.
    pub score: usize,
}

pub(crate) struct BackrefRing<T> {
    entries: [T; MAX_BACKREF_CAPACITY],
    write_idx: usize,
    oldest_idx: usize,
    capacity: usize,
}

impl<T: Copy + Default> BackrefRing<T> {
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity >= 2 && capacity <= MAX_BACKREF_CAPACITY);
        Self {
            entries: [T::default(); MAX_BACKREF_CAPACITY],
            write_idx: 0,
            oldest_idx: 0,
            capacity,
        }
    }

    /// Records a line, overwriting the oldest entry once full.
    pub(crate) fn push(&mut self, line: T) {
        self.entries[self.write_idx] = line;
        self.write_idx = (self.write_idx + 1) % self.capacity;
        if self.write_idx == self.oldest_idx {
            self.oldest_idx = (self.oldest_idx + 1) % self.capacity;
        }
    }

    /// Entry `lines_before` insertions back (1 = most recent). A slot that
    /// was never written yields the default entry, which callers treat as an
    /// empty line.
    pub(crate) fn get(&self, lines_before: usize) -> T {
        debug_assert!(lines_before <= self.capacity);
        let idx = (self.write_idx + self.capacity - lines_before % self.capacity) % self.capacity;
        self.entries[idx]
    }
}

impl<'a> BackrefRing<&'a [u8]> {
    /// Walks the history from newest to oldest and returns the
    /// best-scoring candidate for `curr`. The search stops early once a
    /// candidate's score reaches `good_enough_factor` of the similarity
    /// window, trading ratio for speed.
    ///
    /// Replacement uses a strictly-greater comparison, so among equal
    /// scores the most recent line wins; it also encodes in fewer bytes.
    pub(crate) fn choose_reference_line(
        &self,
        curr: &[u8],
        good_enough_factor: f32,
    ) -> LineRef<'a> {
        let mut best = LineRef {
            lines_before: 1,
            key_line: &[],
            prefix: Prefix::Shared(0),
            score: 0,
        };
        let good_enough = good_enough_factor * curr.len().min(MAX_SIMILARITY) as f32;

        let mut lines_before = 1usize;
        loop {
            let idx = (self.write_idx + self.capacity - lines_before) % self.capacity;
            let candidate = self.entries[idx];

            let (prefix, score) = estimate_similarity(candidate, curr);
            if score > best.score {
                best = LineRef {
                    lines_before: lines_before as u8,
                    key_line: candidate,
                    prefix,
                    score,
                };
                if score as f32 >= good_enough {
                    break;
                }
            }

            // the oldest occupied slot has been scored; nothing older exists
            if idx == self.oldest_idx {
                break;
            }
            lines_before += 1;
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_walks_back_in_insertion_order() {
        let mut ring: BackrefRing<&[u8]> = BackrefRing::new(4);
        ring.push(b"one\n");
        ring.push(b"two\n");
        ring.push(b"three\n");
        assert_eq!(ring.get(1), &b"three\n"[..]);
        assert_eq!(ring.get(2), &b"two\n"[..]);
        assert_eq!(ring.get(3), &b"one\n"[..]);
    }

    #[test]
    fn never_written_slot_is_empty() {
        let mut ring: BackrefRing<&[u8]> = BackrefRing::new(4);
        ring.push(b"one\n");
        assert!(ring.get(2).is_empty());
    }

    #[test]
    fn full_ring_overwrites_oldest() {
        let mut ring: BackrefRing<&[u8]> = BackrefRing::new(2);
        ring.push(b"one\n");
        ring.push(b"two\n");
        ring.push(b"three\n");
        assert_eq!(ring.get(1), &b"three\n"[..]);
        // capacity 2 keeps one line of usable history once full
        assert_eq!(ring.get(2), &b"two\n"[..]);
    }

    #[test]
    fn selector_prefers_the_most_recent_equal_score() {
        let mut ring: BackrefRing<&[u8]> = BackrefRing::new(8);
        ring.push(b"status ok\n");
        ring.push(b"status ok\n");
        let picked = ring.choose_reference_line(b"status ok\n", 0.8);
        assert_eq!(picked.lines_before, 1);
        assert_eq!(picked.score, b"status ok\n".len());
    }

    #[test]
    fn selector_reaches_past_a_poor_previous_line() {
        let mut ring: BackrefRing<&[u8]> = BackrefRing::new(8);
        ring.push(b"connection reset by peer\n");
        ring.push(b"XYZZY\n");
        let picked = ring.choose_reference_line(b"connection reset by peer\n", 0.8);
        assert_eq!(picked.lines_before, 2);
    }

    #[test]
    fn selector_stops_at_the_oldest_entry() {
        let mut ring: BackrefRing<&[u8]> = BackrefRing::new(8);
        ring.push(b"only\n");
        let picked = ring.choose_reference_line(b"unrelated data here\n", 1.0);
        // nothing scored, the default previous-line reference stands
        assert_eq!(picked.lines_before, 1);
        assert_eq!(picked.score, 0);
        assert!(picked.key_line.is_empty());
    }
}
