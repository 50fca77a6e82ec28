//! Error formatting helpers for the command-line front end.

use std::fmt;
use std::io;
use std::path::Path;

use crate::DecompressError;

#[derive(Debug)]
pub struct CliError {
    pub msg: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Format a user friendly I/O error message with suggestions.
pub fn format_io_error(operation: &str, path: &Path, err: &io::Error) -> String {
    use io::ErrorKind::*;
    let suggestion = match err.kind() {
        NotFound => "Check that the file exists and the path is correct.",
        PermissionDenied => "Check permissions or run as a different user.",
        UnexpectedEof => "File appears truncated or corrupted.",
        WriteZero => "Disk may be full. Free up space and try again.",
        Other if err.raw_os_error() == Some(28) => "Disk may be full. Free up space and try again.",
        _ => "Check permissions or free up disk space.",
    };
    format!(
        "Error {} '{}': {}. {}",
        operation,
        path.display(),
        err,
        suggestion
    )
}

/// Convert an I/O error into a CLI error with context.
pub fn io_cli_error(operation: &str, path: &Path, err: io::Error) -> CliError {
    CliError {
        msg: format_io_error(operation, path, &err),
        source: Some(Box::new(err)),
    }
}

/// Convert a decoding failure into a CLI error with a hint.
pub fn decompress_cli_error(path: &Path, err: DecompressError) -> CliError {
    use DecompressError::*;
    let hint = match err {
        NotEnoughInput => "The archive ends in the middle of a chunk; the file is truncated.",
        NotEnoughOutputSpace => "A chunk declares more data than the scratch buffer holds.",
        Corrupt => "The file is corrupted or is not a linepack archive.",
    };
    CliError {
        msg: format!("Cannot unpack '{}': {}", path.display(), hint),
        source: Some(Box::new(err)),
    }
}
