//! huffblob-core: byte-oriented Huffman compression into self-describing blobs
//!
//! `compress` turns any byte sequence into a bit-packed blob that carries its
//! own code table; `decompress` rebuilds the original bytes or reports
//! [`CorruptData`] without reading out of bounds.
//!
//! # Architecture
//!
//! Data flows one way through small modules:
//! - `frequency`: byte occurrence counts
//! - `tree`: deterministic Huffman tree construction
//! - `table`: code assignment, record serialization, decoder lookup
//! - `header`: fixed blob header and read-only inspection
//! - `codec`: `compress` / `decompress`
//! - `bitio`: MSB-first bit reader and writer over 64-bit words
//! - `container`: CRC-checked frame for blobs stored on disk
//! - `metrics`: sizes, ratios and timing for a run
//!
//! # Example
//! ```
//! let blob = huffblob_core::compress(b"aaaabbbccd");
//! assert_eq!(huffblob_core::decompress(&blob).unwrap(), b"aaaabbbccd");
//! ```

pub mod bitio;
pub mod codec;
pub mod container;
pub mod error;
pub mod frequency;
pub mod header;
pub mod metrics;
pub mod table;
pub mod tree;

// Re-export commonly used types
pub use codec::{compress, decompress, try_compress, MAX_INPUT_LEN};
pub use error::{CorruptData, Error, Result};
pub use header::{inspect, BlobHeader, BlobSummary};
pub use table::{CodeEntry, CodeTable, CodeWidthMode};
