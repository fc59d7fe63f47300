//! Seeded sample data for the `demo` subcommand.
//!
//! Each kind stresses the code table differently: runs collapse to a single
//! symbol, text uses a small skewed alphabet, patterns repeat a short random
//! sequence, and random bytes are close to incompressible.

use clap::ValueEnum;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Section size used when mixing kinds.
const MIXED_SECTION: usize = 8192;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleKind {
    /// One byte value repeated
    Runs,
    /// Lowercase letters and punctuation with English-like skew
    Text,
    /// A short random sequence repeated
    Pattern,
    /// Uniform random bytes
    Random,
    /// Sections of every other kind
    Mixed,
}

/// Generate `size` bytes of `kind` sample data from `seed`.
pub fn generate_sample(kind: SampleKind, seed: u64, size: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size);
    fill(kind, &mut rng, size, &mut data);
    data
}

fn fill(kind: SampleKind, rng: &mut ChaCha8Rng, size: usize, data: &mut Vec<u8>) {
    match kind {
        SampleKind::Runs => {
            let byte: u8 = rng.gen();
            data.extend(std::iter::repeat(byte).take(size));
        }
        SampleKind::Text => {
            // Earlier letters are drawn more often
            let alphabet = b"etaoinshrdlucmfwypvbgkjqxz .,\n";
            for _ in 0..size {
                let r: f64 = rng.gen();
                let idx = ((r * r) * alphabet.len() as f64) as usize;
                data.push(alphabet[idx.min(alphabet.len() - 1)]);
            }
        }
        SampleKind::Pattern => {
            let len = rng.gen_range(4..=32);
            let pattern: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
            data.extend(pattern.iter().copied().cycle().take(size));
        }
        SampleKind::Random => {
            data.extend((0..size).map(|_| rng.gen::<u8>()));
        }
        SampleKind::Mixed => {
            const KINDS: [SampleKind; 4] = [
                SampleKind::Runs,
                SampleKind::Text,
                SampleKind::Pattern,
                SampleKind::Random,
            ];
            let mut remaining = size;
            while remaining > 0 {
                let section = remaining.min(MIXED_SECTION);
                let kind = KINDS[rng.gen_range(0..KINDS.len())];
                fill(kind, rng, section, data);
                remaining -= section;
            }
        }
    }
}
