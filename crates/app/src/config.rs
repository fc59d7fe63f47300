//! Command-line configuration for the huffblob tool.
//!
//! Every subcommand works with only its required paths; the `demo` subcommand
//! works with zero arguments. A missing seed is drawn from the clock and
//! printed so that any run can be reproduced.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::input_gen::SampleKind;

#[derive(Parser, Debug, Clone)]
#[command(name = "huffblob", version, about = "Byte-oriented Huffman compression")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Don't print the metrics summary
    #[arg(long, global = true)]
    pub no_metrics: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compress a file
    Compress {
        /// Input file
        input: PathBuf,

        /// Output file (default: <input>.hfb)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the bare blob without the CRC container
        #[arg(long)]
        raw: bool,
    },

    /// Decompress a file written by `compress`
    Decompress {
        /// Compressed input file
        input: PathBuf,

        /// Output file (default: <input> without .hfb, or <input>.out)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Treat the input as a bare blob without the CRC container
        #[arg(long)]
        raw: bool,
    },

    /// Print the header and code table of a compressed file
    Inspect {
        input: PathBuf,

        #[arg(long)]
        raw: bool,
    },

    /// Compress generated sample data and verify the round trip
    Demo {
        /// Random seed for determinism (default: time-based)
        #[arg(long)]
        seed: Option<u64>,

        /// Sample size in bytes
        #[arg(long, default_value_t = 256 * 1024)]
        size: usize,

        /// Kind of sample data
        #[arg(long, value_enum, default_value_t = SampleKind::Mixed)]
        kind: SampleKind,
    },
}

/// Resolve an explicit seed or draw one from the clock.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    })
}

/// Default output path for `compress`.
pub fn compressed_path(input: &std::path::Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".hfb");
    PathBuf::from(name)
}

/// Default output path for `decompress`.
pub fn decompressed_path(input: &std::path::Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == "hfb") {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}
