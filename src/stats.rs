//! Transfer statistics and progress reporting for the command line.

use serde::Serialize;
use std::time::Duration;

/// Totals for one pack or unpack run.
#[derive(Serialize)]
pub struct TransferStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub elapsed_ms: u128,
    /// Output as a percentage of input; only meaningful when packing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio_percent: Option<f64>,
}

impl TransferStats {
    pub fn packed(input_bytes: u64, output_bytes: u64, elapsed: Duration) -> Self {
        let ratio = 100.0 * output_bytes as f64 / input_bytes.max(1) as f64;
        Self {
            input_bytes,
            output_bytes,
            elapsed_ms: elapsed.as_millis(),
            ratio_percent: Some(ratio),
        }
    }

    pub fn unpacked(input_bytes: u64, output_bytes: u64, elapsed: Duration) -> Self {
        Self {
            input_bytes,
            output_bytes,
            elapsed_ms: elapsed.as_millis(),
            ratio_percent: None,
        }
    }

    fn speed_mb_per_s(&self) -> f64 {
        let micros = self.elapsed_ms as f64 * 1000.0;
        if micros > 0.0 {
            self.input_bytes as f64 / micros
        } else {
            0.0
        }
    }

    /// Human summary on stderr.
    pub fn report(&self, input_name: &str, output_name: &str) {
        let seconds = self.elapsed_ms as f64 / 1000.0;
        match self.ratio_percent {
            Some(ratio) => eprintln!(
                "({} => {}) {:.2} MB packed to {:.2} MB ({:.1}%) in {:.2}s; average speed: {:.1} MB/s",
                input_name,
                output_name,
                megabytes(self.input_bytes),
                megabytes(self.output_bytes),
                ratio,
                seconds,
                self.speed_mb_per_s(),
            ),
            None => eprintln!(
                "{:.2} MB unpacked to {:.2} MB in {:.2}s ({:5.2} MB/s)",
                megabytes(self.input_bytes),
                megabytes(self.output_bytes),
                seconds,
                self.speed_mb_per_s(),
            ),
        }
    }

    /// Machine summary on stdout.
    pub fn report_json(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("cannot serialize stats: {e}"),
        }
    }
}

/// One in-place status line per disk read while packing.
pub fn print_pack_progress(bytes_read: u64, input_size: u64, bytes_written: u64) {
    let ratio = if bytes_read > 0 {
        100.0 * bytes_written as f64 / bytes_read as f64
    } else {
        0.0
    };
    eprint!(
        "{:7.2} MB / {:.2} MB packed ({:.1}%)\r",
        megabytes(bytes_read),
        megabytes(input_size),
        ratio
    );
}

/// One in-place status line per disk read while unpacking.
pub fn print_unpack_progress(bytes_read: u64, input_size: u64) {
    eprint!(
        "{:.2} MB / {:.2} MB unpacked\r",
        megabytes(bytes_read),
        megabytes(input_size)
    );
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1_000_000.0
}
