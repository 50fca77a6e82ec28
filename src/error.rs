use thiserror::Error;

/// Errors returned by [`decompress`](crate::decompress).
///
/// The first two variants are buffer-size signals, not failures: the caller
/// repeats the call with more input or a drained output buffer. `Corrupt` is
/// terminal for the stream.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    /// The compressed buffer ends before one whole chunk. Supply the rest of
    /// the chunk and retry.
    #[error("compressed input ends before a whole chunk")]
    NotEnoughInput,

    /// The output buffer cannot hold the first chunk's declared raw size.
    #[error("output buffer too small for the declared chunk size")]
    NotEnoughOutputSpace,

    /// The input cannot be decoded safely: a malformed header, an impossible
    /// backreference, a run-length token past the end of its key line, or a
    /// dangling escape byte.
    #[error("input is not a valid linepack archive")]
    Corrupt,
}
