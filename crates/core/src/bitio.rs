//! Bit-level I/O over 64-bit-word padded buffers.
//!
//! `BitWriter` and `BitReader` operate in MSB-first order. Blobs are laid out
//! in 64-bit words: the writer can pad to the next word boundary at any point
//! and always hands back a buffer whose length is a multiple of 8 bytes.
//!
//! # Example
//! ```
//! use huffblob_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.align_to_word();
//! writer.write_bits(0xBEEF, 16).unwrap();
//!
//! let bytes = writer.finish();
//! assert_eq!(bytes.len(), 16);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! reader.align_to_word().unwrap();
//! assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
//! ```

use crate::error::BitIoError;

/// Number of bits in one storage word.
pub const WORD_BITS: usize = 64;

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the lowest `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<(), BitIoError> {
        if count > WORD_BITS {
            return Err(BitIoError::InvalidBitCount(count));
        }
        self.push_bits(value, count);
        Ok(())
    }

    /// Append `count` (at most 64) bits without validation.
    fn push_bits(&mut self, value: u64, count: usize) {
        let mut remaining = count;
        while remaining > 0 {
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Top `bits_to_write` bits of what is left
            let shift = remaining - bits_to_write;
            let bits = ((value >> shift) & ((1 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;

            if self.bit_count == 8 {
                self.bytes.push(self.bit_buffer);
                self.bit_buffer = 0;
                self.bit_count = 0;
            }

            remaining = shift;
        }
    }

    /// Append a raw byte string.
    pub fn write_bytes(&mut self, data: &[u8]) {
        if self.bit_count == 0 {
            self.bytes.extend_from_slice(data);
        } else {
            for &byte in data {
                self.push_bits(byte as u64, 8);
            }
        }
    }

    /// Pad with zero bits up to the next 64-bit boundary.
    pub fn align_to_word(&mut self) {
        let pad = (WORD_BITS - self.bit_len() % WORD_BITS) % WORD_BITS;
        self.push_bits(0, pad);
    }

    /// Pad to a whole number of words and return the output bytes.
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_word();
        self.bytes
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read up to 64 bits from the input.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if not enough bits remain; the cursor does
    ///   not move in that case
    pub fn read_bits(&mut self, count: usize) -> Result<u64, BitIoError> {
        if count > WORD_BITS {
            return Err(BitIoError::InvalidBitCount(count));
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof);
        }

        let mut result = 0u64;
        let mut remaining = count;

        while remaining > 0 {
            let byte_idx = self.bit_position / 8;
            let bit_offset = self.bit_position % 8;

            let bits_in_byte = 8 - bit_offset;
            let bits_to_read = remaining.min(bits_in_byte);

            let byte = self.data[byte_idx];
            let mask = ((1u16 << bits_to_read) - 1) as u8;
            let bits = (byte >> (bits_in_byte - bits_to_read)) & mask;

            result = (result << bits_to_read) | bits as u64;

            self.bit_position += bits_to_read;
            remaining -= bits_to_read;
        }

        Ok(result)
    }

    /// Read a single bit (0 or 1).
    pub fn read_bit(&mut self) -> Result<bool, BitIoError> {
        Ok(self.read_bits(1)? == 1)
    }

    pub fn read_u8(&mut self) -> Result<u8, BitIoError> {
        Ok(self.read_bits(8)? as u8)
    }

    pub fn read_u16(&mut self) -> Result<u16, BitIoError> {
        Ok(self.read_bits(16)? as u16)
    }

    pub fn read_u32(&mut self) -> Result<u32, BitIoError> {
        Ok(self.read_bits(32)? as u32)
    }

    pub fn read_u64(&mut self) -> Result<u64, BitIoError> {
        self.read_bits(64)
    }

    /// Skip forward to the next 64-bit boundary.
    ///
    /// Fails without moving if the boundary lies past the end of the buffer.
    pub fn align_to_word(&mut self) -> Result<(), BitIoError> {
        let aligned = self.bit_position.div_ceil(WORD_BITS) * WORD_BITS;
        if aligned > self.data.len() * 8 {
            return Err(BitIoError::UnexpectedEof);
        }
        self.bit_position = aligned;
        Ok(())
    }

    /// Return the number of bits remaining in the buffer.
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check if we're at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.data.len() * 8
    }
}
