//! Line-differential compressor for repetitive, line-oriented text such as
//! server logs.
//!
//! The codec transforms a byte stream into self-framed chunks of at most
//! 64 KiB. Inside a chunk, every line after the first is encoded against a
//! recently seen "key line": a header byte names the key line by how many
//! lines back it was seen, and the body alternates run-length tokens (bytes
//! copied from the key line) with quoted literal tokens. The output is an
//! intermediate representation that exposes the redundancy of log files to a
//! general-purpose coder downstream; it decodes back bit-identically on its
//! own.
//!
//! [`compress`] packs at most one chunk per call and [`decompress`] unpacks
//! as many whole chunks as fit, so both ends run in bounded memory:
//!
//! ```
//! let src: &[u8] = b"[info] worker 1 started\n[info] worker 2 started\n";
//! let mut packed = vec![0u8; linepack::decompress_bound()];
//! let mut unpacked = vec![0u8; src.len()];
//!
//! let (read, written) = linepack::compress(&mut packed, src, 4);
//! assert_eq!(read, src.len());
//!
//! let (_, n) = linepack::decompress(&mut unpacked, &packed[..written]).unwrap();
//! assert_eq!(&unpacked[..n], src);
//! ```

mod compress;
mod config;
mod decompress;
mod error;
mod header;
mod quote;
mod ring;
mod similarity;
mod varint;

pub mod io_utils;
pub mod stats;

pub use compress::compress;
pub use config::{CompressionParams, DEFAULT_LEVEL, MAX_LEVEL, MIN_LEVEL};
pub use decompress::decompress;
pub use error::DecompressError;

/// Marks anything that is not a plain ASCII literal in the compressed
/// stream. Its meaning depends on position: at the start of a line it
/// carries a backreference, inside a line it starts a run-length token, and
/// on its own it escapes the following literal byte.
pub const ESCAPE_BYTE: u8 = 0x80;

/// Set in a line's backreference byte when the line shares no prefix with
/// its key line; the numeric code that follows is then an initial key-line
/// offset instead of being absent.
pub const NO_SHARED_PREFIX_FLAG: u8 = 0x40;

/// Largest value a single numeric-code byte can carry.
pub const LENGTH_BASE: u8 = 127;

/// Per-chunk framing header: two little-endian `u16` values holding the
/// compressed and raw payload sizes, each biased by one.
pub const HEADER_SIZE: usize = 4;

/// Most raw bytes a single chunk can carry, and also the most compressed
/// payload bytes. A size of exactly this value still fits the biased 16-bit
/// header field.
pub const MAX_CHUNK_SIZE: usize = 65536;

/// How many previous lines the decoder keeps for backreferences. Encoders
/// may use less (lower compression levels do) but never more.
pub(crate) const MAX_BACKREF_CAPACITY: usize = 64;

/// Similarity scoring only looks at this many leading bytes of a line,
/// bounding the per-candidate comparison cost.
pub(crate) const MAX_SIMILARITY: usize = 140;

/// Size of the largest possible output of one [`compress`] call. An output
/// buffer of this size also fits any single chunk handed to
/// [`decompress`].
pub fn decompress_bound() -> usize {
    MAX_CHUNK_SIZE + HEADER_SIZE
}
