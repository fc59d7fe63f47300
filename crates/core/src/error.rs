//! Error types for huffblob.
//!
//! Compression has no error path for inputs that fit the blob format.
//! Decompression reports every structural problem as [`CorruptData`] and never
//! returns a partial result.

use thiserror::Error;

/// Top-level error type for operations that touch files, containers or
/// oversized inputs.
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// The compressed blob is structurally invalid
    #[error("corrupt data: {0}")]
    Corrupt(#[from] CorruptData),

    /// The container frame around a blob is malformed
    #[error("container error: {0}")]
    Container(#[from] ContainerError),

    /// CRC validation failed, indicating data corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// Input longer than the 32-bit `original_length` header field can describe
    #[error("input of {len} bytes exceeds the maximum of {max} bytes")]
    InputTooLarge { len: usize, max: usize },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bit-level I/O errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Invalid bit count (more than 64 bits in one read or write)
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),
}

/// Every way a compressed blob can fail to decode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorruptData {
    /// The header or the table records end before their declared size
    #[error("truncated header: {0}")]
    TruncatedHeader(#[source] BitIoError),

    #[error("table declares {count} entries, more than 256 byte values")]
    TooManyEntries { count: u16 },

    #[error("maximum code width {width} exceeds 64 bits")]
    MaxCodeWidthTooLarge { width: u8 },

    #[error("width field of {bits} bits cannot hold a code width")]
    WidthFieldTooLarge { bits: u8 },

    #[error("code width {width} for byte {byte:#04x} exceeds declared maximum {max}")]
    WidthExceedsMax { byte: u8, width: u8, max: u8 },

    #[error("code width {width} does not fit a lookup of {buckets} buckets")]
    WidthOutOfLookup { width: u8, buckets: usize },

    #[error("byte {byte:#04x} has a zero-width code")]
    ZeroWidth { byte: u8 },

    #[error("code {code:#x} for byte {byte:#04x} does not fit in {width} bits")]
    CodeOverflow { byte: u8, code: u64, width: u8 },

    #[error("code {code:#x} of width {width} is assigned twice")]
    DuplicateCode { code: u64, width: u8 },

    /// Payload ran out before `original_length` bytes were decoded
    #[error("payload truncated after {decoded} of {expected} bytes")]
    TruncatedPayload { decoded: usize, expected: usize },

    /// No code of any permitted width matches the bits at `position`
    #[error("invalid huffman code at bit position {position}")]
    InvalidCode { position: usize },
}

/// Container frame errors.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Frame is too short to contain a valid header
    #[error("container too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// Blob length doesn't match the header
    #[error("blob length mismatch: header says {expected}, got {actual}")]
    LengthMismatch { expected: u64, actual: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
