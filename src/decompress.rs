//! Chunk decompressor.
//!
//! Rebuilds lines by replaying the compressed token stream against its own
//! output: run-length tokens copy from a previously reconstructed line, the
//! history ring names lines by `(start, end)` spans of the output buffer,
//! and literals are unquoted in place. Every read is bounds-checked;
//! malformed input of any shape is reported as [`DecompressError::Corrupt`]
//! rather than decoded loosely.

use crate::error::DecompressError;
use crate::header::read_header;
use crate::quote::first_space;
use crate::ring::BackrefRing;
use crate::varint::decode_length;
use crate::{ESCAPE_BYTE, HEADER_SIZE, MAX_BACKREF_CAPACITY, NO_SHARED_PREFIX_FLAG};

/// `(start, end)` of a reconstructed line inside the chunk's output buffer.
type LineSpan = (usize, usize);

/// Decompresses as many whole chunks of `src` into `dst` as both buffers
/// allow and returns `(bytes_read, bytes_written)`.
///
/// An empty `src` decodes to nothing. When the first chunk already fails to
/// fit, the call returns [`DecompressError::NotEnoughInput`] or
/// [`DecompressError::NotEnoughOutputSpace`] and the caller retries with
/// more buffer; once at least one chunk has been decoded, running out of
/// either buffer just ends the call with the counts so far. Corruption
/// anywhere voids the whole call: no byte counts are reported for a stream
/// that failed to decode.
pub fn decompress(dst: &mut [u8], src: &[u8]) -> Result<(usize, usize), DecompressError> {
    if src.is_empty() {
        return Ok((0, 0));
    }

    let mut bytes_read = 0usize;
    let mut bytes_written = 0usize;

    while src.len() - bytes_read >= HEADER_SIZE {
        let (compressed_size, raw_size) = read_header(&src[bytes_read..]);
        let payload_start = bytes_read + HEADER_SIZE;

        if src.len() - payload_start < compressed_size {
            if bytes_read == 0 {
                return Err(DecompressError::NotEnoughInput);
            }
            return Ok((bytes_read, bytes_written));
        }
        if dst.len() - bytes_written < raw_size {
            if bytes_read == 0 {
                return Err(DecompressError::NotEnoughOutputSpace);
            }
            return Ok((bytes_read, bytes_written));
        }

        let payload = &src[payload_start..payload_start + compressed_size];
        let out = &mut dst[bytes_written..bytes_written + raw_size];
        if decompress_chunk(payload, out)? != raw_size {
            return Err(DecompressError::Corrupt);
        }

        bytes_read = payload_start + compressed_size;
        bytes_written += raw_size;
    }

    if bytes_read == 0 {
        // not even one header
        return Err(DecompressError::NotEnoughInput);
    }
    Ok((bytes_read, bytes_written))
}

/// Decodes one chunk payload into `dst`, which is exactly the declared raw
/// size, and returns the bytes written.
fn decompress_chunk(compressed: &[u8], dst: &mut [u8]) -> Result<usize, DecompressError> {
    let mut ring: BackrefRing<LineSpan> = BackrefRing::new(MAX_BACKREF_CAPACITY);

    // A chunk opens with its quoted first line; a backreference here would
    // name a line that cannot exist yet.
    if compressed[0] > ESCAPE_BYTE {
        return Err(DecompressError::Corrupt);
    }

    let mut written = 0usize;
    let mut line_begin = 0usize;
    let mut pos = 0usize;

    while pos < compressed.len() {
        let mut key: LineSpan = (0, 0);
        let mut ikey = 0usize;

        // a line may open with a backreference byte naming its key line
        if compressed[pos] > ESCAPE_BYTE {
            let head = compressed[pos];
            pos += 1;

            let lines_before = (head & !(ESCAPE_BYTE | NO_SHARED_PREFIX_FLAG)) as usize;
            key = ring.get(lines_before);

            if head & NO_SHARED_PREFIX_FLAG != 0 {
                let (offset, consumed) =
                    decode_length(&compressed[pos..]).ok_or(DecompressError::Corrupt)?;
                ikey = offset;
                pos += consumed;
            }
        }

        while pos < compressed.len() {
            if compressed[pos] > ESCAPE_BYTE {
                // run-length token: copy from the key line
                let (len, consumed) =
                    decode_length(&compressed[pos..]).ok_or(DecompressError::Corrupt)?;
                pos += consumed;

                let (key_start, key_end) = key;
                // an overlong run also catches references to lines the ring
                // never held, whose span is empty
                if len > (key_end - key_start).saturating_sub(ikey) {
                    return Err(DecompressError::Corrupt);
                }
                if len > dst.len() - written {
                    return Err(DecompressError::Corrupt);
                }

                let run_start = key_start + ikey;
                dst.copy_within(run_start..run_start + len, written);
                written += len;
                ikey = first_space(&dst[key_start..key_end], ikey + len);
            } else {
                let mut byte = compressed[pos];
                if byte == ESCAPE_BYTE {
                    pos += 1;
                    if pos >= compressed.len() {
                        // dangling escape
                        return Err(DecompressError::Corrupt);
                    }
                    byte = compressed[pos];
                }
                if written >= dst.len() {
                    // more output than the header declared
                    return Err(DecompressError::Corrupt);
                }
                dst[written] = byte;
                written += 1;
                pos += 1;
            }

            if dst[written - 1] == b'\n' {
                ring.push((line_begin, written));
                line_begin = written;
                break;
            }
        }
    }

    // the chunk may end mid-line; that unterminated tail is still the most
    // recent line
    if written > line_begin {
        ring.push((line_begin, written));
    }

    Ok(written)
}
