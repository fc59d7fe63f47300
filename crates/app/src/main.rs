//! huffblob: compress, decompress and inspect files with huffblob-core.

mod config;
mod input_gen;

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use huffblob_core::container::{parse_container, serialize_container};
use huffblob_core::metrics::Metrics;
use huffblob_core::{decompress, inspect, try_compress};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Cli, Command};

/// Log filter used when `RUST_LOG` is unset, empty or unparsable.
const DEFAULT_LOG_FILTER: &str = "huffblob=info";

fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.into())
}

fn main() -> anyhow::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let cli = Cli::parse();
    let print_metrics = !cli.no_metrics;

    match cli.command {
        Command::Compress { input, output, raw } => {
            let output = output.unwrap_or_else(|| config::compressed_path(&input));
            let metrics = run_compress(&input, &output, raw)?;
            if print_metrics {
                metrics.print_summary();
            }
        }
        Command::Decompress { input, output, raw } => {
            let output = output.unwrap_or_else(|| config::decompressed_path(&input));
            run_decompress(&input, &output, raw)?;
        }
        Command::Inspect { input, raw } => run_inspect(&input, raw)?,
        Command::Demo { seed, size, kind } => {
            let seed = config::resolve_seed(seed);
            info!(seed, size, ?kind, "generating sample");
            let data = input_gen::generate_sample(kind, seed, size);
            let metrics = round_trip(&data)?;
            if print_metrics {
                metrics.print_summary();
            }
            println!("\n✓ Round trip verified (seed {seed})");
        }
    }

    Ok(())
}

fn run_compress(input: &Path, output: &Path, raw: bool) -> anyhow::Result<Metrics> {
    let data = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;

    let mut metrics = Metrics::new();
    metrics.raw_bytes = data.len() as u64;

    let blob = try_compress(&data)?;
    if let Some(summary) = inspect(&blob)? {
        metrics.record_table(&summary.table, &data);
    }
    let bytes = if raw { blob } else { serialize_container(&blob) };
    metrics.compressed_bytes = bytes.len() as u64;
    metrics.complete();

    std::fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    info!(
        input = %input.display(),
        output = %output.display(),
        raw_bytes = data.len(),
        compressed_bytes = bytes.len(),
        "compressed file"
    );
    Ok(metrics)
}

fn run_decompress(input: &Path, output: &Path, raw: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let blob = if raw { &bytes[..] } else { parse_container(&bytes)? };

    let data = decompress(blob).with_context(|| format!("decoding {}", input.display()))?;
    std::fs::write(output, &data).with_context(|| format!("writing {}", output.display()))?;
    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = data.len(),
        "decompressed file"
    );
    Ok(())
}

fn run_inspect(input: &Path, raw: bool) -> anyhow::Result<()> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let blob = if raw { &bytes[..] } else { parse_container(&bytes)? };

    let Some(summary) = inspect(blob)? else {
        println!("Empty blob (original length 0)");
        return Ok(());
    };

    let header = &summary.header;
    println!("=== Header ===");
    println!("Original length: {} bytes", header.original_length);
    println!("Table entries: {}", header.entry_count);
    println!("Max code width: {} bits", header.max_code_width);
    println!("Width field: {} bits", header.width_field_bits);
    println!("Storage mode: {}-bit", summary.table.mode().bits());
    println!("Payload region: {} bits", summary.payload_bits);
    println!();
    println!("=== Code Table ===");
    let mut entries = summary.table.entries().to_vec();
    entries.sort_by_key(|e| (e.width, e.code));
    for entry in entries {
        println!(
            "{:#04x} {:>7}  {:0width$b}",
            entry.byte,
            format!("{:?}", entry.byte as char),
            entry.code,
            width = entry.width as usize
        );
    }
    Ok(())
}

fn round_trip(data: &[u8]) -> anyhow::Result<Metrics> {
    let mut metrics = Metrics::new();
    metrics.raw_bytes = data.len() as u64;

    let blob = try_compress(data)?;
    metrics.compressed_bytes = blob.len() as u64;
    if let Some(summary) = inspect(&blob)? {
        metrics.record_table(&summary.table, data);
    }

    let decoded = decompress(&blob)?;
    metrics.complete();

    if decoded != data {
        warn!(expected = data.len(), actual = decoded.len(), "round trip mismatch");
        anyhow::bail!("round trip mismatch");
    }
    Ok(metrics)
}
