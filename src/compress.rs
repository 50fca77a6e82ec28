//! Chunk compressor.
//!
//! One call packs at most one chunk: the first line is quoted verbatim, and
//! every following line is encoded as a backreference to the most similar
//! line still in the history ring, a sequence of run-length tokens for the
//! bytes shared with it, and quoted literals for the rest.

use crate::config::CompressionParams;
use crate::header::store_header;
use crate::quote::{first_space, next_line, quote, quote_bounded};
use crate::ring::{BackrefRing, LineRef};
use crate::similarity::Prefix;
use crate::varint::encode_length;
use crate::{ESCAPE_BYTE, HEADER_SIZE, MAX_CHUNK_SIZE, NO_SHARED_PREFIX_FLAG};

/// Compresses at most one chunk of `src` into `dst` and returns
/// `(bytes_read, bytes_written)`. Callers loop until `bytes_read` reaches
/// `src.len()`, concatenating the outputs.
///
/// `level` runs from 1 (fastest) to 9 (best ratio); 0 selects the default.
/// A `dst` of [`decompress_bound()`](crate::decompress_bound) bytes always
/// fits a whole chunk. Empty input, or a `dst` too small to hold any of the
/// first line, reads and writes nothing.
pub fn compress(dst: &mut [u8], src: &[u8], level: u32) -> (usize, usize) {
    if src.is_empty() || dst.len() <= HEADER_SIZE {
        return (0, 0);
    }
    let params = CompressionParams::for_level(level);

    let src = &src[..src.len().min(MAX_CHUNK_SIZE)];
    let (header, payload) = dst.split_at_mut(HEADER_SIZE);
    let payload_len = payload.len().min(MAX_CHUNK_SIZE);
    let payload = &mut payload[..payload_len];

    let mut ring: BackrefRing<&[u8]> = BackrefRing::new(params.ring_capacity);

    // The first line of a chunk has no earlier line to reference, so it is
    // quoted with the bounded variant; nothing else limits its size.
    let (first_line, mut rest) = next_line(src);
    let (mut bytes_read, mut written) = quote_bounded(payload, first_line);
    if bytes_read == 0 {
        return (0, 0);
    }
    ring.push(&first_line[..bytes_read]);

    loop {
        let (curr, tail) = next_line(rest);
        if curr.is_empty() {
            break;
        }
        // worst case: a two-byte reference header plus every byte escaped;
        // reserving it up front spares per-byte bounds checks below
        if payload.len() - written < 2 * curr.len() + 2 {
            break;
        }

        let line_ref = ring.choose_reference_line(curr, params.good_enough_factor);
        written += compress_line(&line_ref, curr, &mut payload[written..]);

        bytes_read += curr.len();
        ring.push(curr);
        rest = tail;
    }

    store_header(header, written, bytes_read);
    (bytes_read, written + HEADER_SIZE)
}

/// Emits one differentially encoded line into `dst` and returns the bytes
/// written. The caller has already reserved worst-case space.
fn compress_line(line_ref: &LineRef<'_>, curr: &[u8], dst: &mut [u8]) -> usize {
    let key = line_ref.key_line;

    // The previous line is named ESCAPE_BYTE + 1, two lines back
    // ESCAPE_BYTE + 2, and so on; distance zero would reference the line
    // itself and is never produced.
    dst[0] = line_ref.lines_before | ESCAPE_BYTE;
    let mut written = 1;

    let mut matched;
    let mut ikey;
    let mut icur;
    match line_ref.prefix {
        Prefix::Shared(len) => {
            matched = len;
            ikey = len;
            icur = len;
        }
        Prefix::KeyOffset(offset) => {
            // no shared prefix: tell the decoder where token matching
            // starts in the key line
            dst[0] |= NO_SHARED_PREFIX_FLAG;
            written += encode_length(offset, &mut dst[written..]);
            matched = 0;
            ikey = offset;
            icur = 0;
        }
    }

    while ikey < key.len() && icur < curr.len() {
        if curr[icur] == key[ikey] {
            matched += 1;
            icur += 1;
            ikey += 1;
        } else {
            // run over: flush it, then re-sync both cursors on the next
            // token boundary, quoting the skipped bytes of `curr`
            written += encode_length(matched, &mut dst[written..]);
            matched = 0;

            ikey = first_space(key, ikey);

            let token_end = first_space(curr, icur);
            written += quote(&mut dst[written..], &curr[icur..token_end]);
            icur = token_end;
        }
    }

    written += encode_length(matched, &mut dst[written..]);
    written += quote(&mut dst[written..], &curr[icur..]);

    written
}
