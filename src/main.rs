use clap::Parser;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use linepack::io_utils::{decompress_cli_error, io_cli_error, CliError};
use linepack::stats::{self, TransferStats};
use linepack::DecompressError;

/// Largest slab read from disk at a time; compression itself is chunked far
/// smaller, this only sizes the I/O.
const MAX_DISK_READ_BYTES: usize = 5_000_000;

const PACKED_SUFFIX: &str = "lp";

/// Pack repetitive log files line by line, or unpack them again.
#[derive(Parser)]
#[command(name = "linepack", version, about)]
struct Args {
    /// File to pack, or a packed .lp file to unpack with -d
    input: PathBuf,

    /// Unpack INPUT (expects the .lp suffix) instead of packing it
    #[arg(short = 'd', long)]
    decompress: bool,

    /// Compression level: 1 packs fastest, 9 packs best
    #[arg(short, long, default_value_t = linepack::DEFAULT_LEVEL,
          value_parser = clap::value_parser!(u32).range(1..=9))]
    level: u32,

    /// Overwrite an existing output file without asking
    #[arg(short, long)]
    force: bool,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args.decompress {
        unpack(&args)
    } else {
        pack(&args)
    }
}

fn pack(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut input =
        File::open(&args.input).map_err(|e| io_cli_error("opening", &args.input, e))?;
    let input_size = input
        .metadata()
        .map_err(|e| io_cli_error("inspecting", &args.input, e))?
        .len();

    let output_path = packed_path(&args.input);
    let mut output = match create_output(&output_path, args.force)? {
        Some(file) => file,
        None => return Ok(()),
    };

    let start = Instant::now();
    let (bytes_read, bytes_written) = pack_file(&mut input, &mut output, input_size, args.level)
        .map_err(|e| io_cli_error("packing", &args.input, e))?;

    let totals = TransferStats::packed(bytes_read, bytes_written, start.elapsed());
    if args.json {
        totals.report_json();
    } else {
        totals.report(
            &args.input.display().to_string(),
            &output_path.display().to_string(),
        );
    }
    Ok(())
}

fn unpack(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = match unpacked_path(&args.input) {
        Some(path) => path,
        None => {
            println!("Unknown file extension (.lp expected). Ignoring.");
            return Ok(());
        }
    };

    let mut input =
        File::open(&args.input).map_err(|e| io_cli_error("opening", &args.input, e))?;
    let input_size = input
        .metadata()
        .map_err(|e| io_cli_error("inspecting", &args.input, e))?
        .len();

    let mut output = match create_output(&output_path, args.force)? {
        Some(file) => file,
        None => return Ok(()),
    };

    let start = Instant::now();
    let (bytes_read, bytes_written) =
        unpack_file(&mut input, &mut output, &args.input, input_size)?;

    let totals = TransferStats::unpacked(bytes_read, bytes_written, start.elapsed());
    if args.json {
        totals.report_json();
    } else {
        totals.report(
            &args.input.display().to_string(),
            &output_path.display().to_string(),
        );
    }
    Ok(())
}

/// `file.log` packs to `file.log.lp`.
fn packed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(PACKED_SUFFIX);
    PathBuf::from(name)
}

/// `file.log.lp` unpacks to `file.log`; anything without the suffix is
/// refused.
fn unpacked_path(input: &Path) -> Option<PathBuf> {
    if input.extension()?.to_str()? != PACKED_SUFFIX {
        return None;
    }
    Some(input.with_extension(""))
}

/// Creates the output file, asking before clobbering an existing one unless
/// `force` is set. `None` means the user declined.
fn create_output(path: &Path, force: bool) -> Result<Option<File>, CliError> {
    if !force {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(file) => return Ok(Some(file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                print!("File {} already exists. Overwrite (y/n) ? ", path.display());
                let _ = io::stdout().flush();
                let mut answer = String::new();
                io::stdin()
                    .read_line(&mut answer)
                    .map_err(|e| io_cli_error("reading answer for", path, e))?;
                if answer.trim() != "y" {
                    println!("Not overwritten");
                    return Ok(None);
                }
            }
            Err(e) => return Err(io_cli_error("creating", path, e)),
        }
    }
    File::create(path)
        .map(Some)
        .map_err(|e| io_cli_error("creating", path, e))
}

fn pack_file(
    input: &mut File,
    output: &mut File,
    input_size: u64,
    level: u32,
) -> io::Result<(u64, u64)> {
    let mut in_buf = vec![0u8; MAX_DISK_READ_BYTES];
    let mut out_buf = vec![0u8; linepack::decompress_bound()];
    let mut total_read = 0u64;
    let mut total_written = 0u64;

    loop {
        let filled = read_fully(input, &mut in_buf)?;
        if filled == 0 {
            break;
        }

        let mut remainder = &in_buf[..filled];
        while !remainder.is_empty() {
            let (read, written) = linepack::compress(&mut out_buf, remainder, level);
            output.write_all(&out_buf[..written])?;
            remainder = &remainder[read..];
            total_written += written as u64;
        }
        total_read += filled as u64;
        stats::print_pack_progress(total_read, input_size, total_written);

        if filled < in_buf.len() {
            break;
        }
    }
    Ok((total_read, total_written))
}

fn unpack_file(
    input: &mut File,
    output: &mut File,
    input_path: &Path,
    input_size: u64,
) -> Result<(u64, u64), CliError> {
    let mut in_buf = vec![0u8; MAX_DISK_READ_BYTES];
    let mut out_buf = vec![0u8; linepack::decompress_bound()];
    let mut total_read = 0u64;
    let mut total_written = 0u64;
    let mut filled = 0usize;

    loop {
        let n = read_fully(input, &mut in_buf[filled..])
            .map_err(|e| io_cli_error("reading", input_path, e))?;
        filled += n;
        let at_eof = filled < in_buf.len();
        if filled == 0 {
            break;
        }

        let mut consumed = 0usize;
        while consumed < filled {
            match linepack::decompress(&mut out_buf, &in_buf[consumed..filled]) {
                Ok((read, written)) => {
                    output
                        .write_all(&out_buf[..written])
                        .map_err(|e| io_cli_error("writing", input_path, e))?;
                    consumed += read;
                    total_read += read as u64;
                    total_written += written as u64;
                }
                // a split chunk: read more from disk and retry
                Err(DecompressError::NotEnoughInput) if !at_eof => break,
                Err(e) => return Err(decompress_cli_error(input_path, e)),
            }
        }

        in_buf.copy_within(consumed..filled, 0);
        filled -= consumed;

        stats::print_unpack_progress(total_read, input_size);

        if at_eof {
            if filled > 0 {
                // the header promises more data than the file holds
                return Err(decompress_cli_error(
                    input_path,
                    DecompressError::NotEnoughInput,
                ));
            }
            break;
        }
    }
    Ok((total_read, total_written))
}

/// Reads until `buf` is full or the reader is exhausted.
fn read_fully(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
