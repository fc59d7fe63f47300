//! Metrics for a compression or decompression run.
//!
//! Collected by the caller around [`compress`](crate::compress) and
//! [`decompress`](crate::decompress); the codec itself keeps no counters.
//!
//! # Thread Safety
//!
//! `Metrics` is a plain value. Use one per thread and merge if needed.

use std::time::{Duration, Instant};

use crate::table::{CodeTable, CodeWidthMode};

#[derive(Debug, Clone)]
pub struct Metrics {
    // === Timing ===
    pub start_time: Instant,
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Uncompressed bytes
    pub raw_bytes: u64,

    /// Compressed bytes (blob or container)
    pub compressed_bytes: u64,

    /// Payload bits before word padding
    pub payload_bits: u64,

    // === Table ===
    /// Distinct byte values in the code table
    pub distinct_symbols: usize,

    /// Longest code in bits
    pub max_code_width: u8,

    pub mode: Option<CodeWidthMode>,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            compressed_bytes: 0,
            payload_bits: 0,
            distinct_symbols: 0,
            max_code_width: 0,
            mode: None,
        }
    }

    /// Record the shape of the table used for `data`.
    pub fn record_table(&mut self, table: &CodeTable, data: &[u8]) {
        self.distinct_symbols = table.len();
        self.max_code_width = table.max_code_width();
        self.mode = Some(table.mode());
        self.payload_bits = table.encoded_bits(data);
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if no data compressed.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average payload bits per input byte.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.raw_bytes as f64
        }
    }

    /// Compute throughput in raw bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Compression Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Raw:        {} bytes ({:.2} KiB)", self.raw_bytes, self.raw_bytes as f64 / 1024.0);
        println!(
            "Compressed: {} bytes ({:.2} KiB)",
            self.compressed_bytes,
            self.compressed_bytes as f64 / 1024.0
        );
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Code Table ===");
        println!("Symbols: {}", self.distinct_symbols);
        println!("Max code width: {} bits", self.max_code_width);
        if let Some(mode) = self.mode {
            println!("Storage mode: {}-bit", mode.bits());
        }
        println!("Bits per symbol: {:.3}", self.bits_per_symbol());
        println!();
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             raw_bytes={}\n\
             compressed_bytes={}\n\
             compression_ratio={:.4}\n\
             distinct_symbols={}\n\
             max_code_width={}\n\
             bits_per_symbol={:.4}\n",
            self.duration().as_millis(),
            self.raw_bytes,
            self.compressed_bytes,
            self.compression_ratio(),
            self.distinct_symbols,
            self.max_code_width,
            self.bits_per_symbol(),
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert!(metrics.end_time.is_none());
        assert!(metrics.mode.is_none());
        assert_eq!(metrics.compression_ratio(), 0.0);
    }

    #[test]
    fn test_compression_ratio() {
        let mut metrics = Metrics::new();
        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 750;

        assert_eq!(metrics.compression_ratio(), 0.75);
    }

    #[test]
    fn test_record_table() {
        let data = b"aaaabbbccd";
        let table = CodeTable::from_data(data).unwrap();

        let mut metrics = Metrics::new();
        metrics.raw_bytes = data.len() as u64;
        metrics.record_table(&table, data);

        assert_eq!(metrics.distinct_symbols, 4);
        assert_eq!(metrics.max_code_width, 3);
        assert_eq!(metrics.mode, Some(CodeWidthMode::B8));
        // 4x1 + 3x2 + 2x3 + 1x3
        assert_eq!(metrics.payload_bits, 19);
        assert!((metrics.bits_per_symbol() - 1.9).abs() < 1e-9);
    }

    #[test]
    fn test_complete_freezes_duration() {
        let mut metrics = Metrics::new();
        metrics.complete();
        let first = metrics.duration();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(metrics.duration(), first);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new();
        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 500;
        metrics.distinct_symbols = 10;

        let text = metrics.export_text();
        assert!(text.contains("raw_bytes=1000"));
        assert!(text.contains("compressed_bytes=500"));
        assert!(text.contains("compression_ratio=0.5000"));
        assert!(text.contains("distinct_symbols=10"));
    }
}
