//! Blob header and read-only inspection.
//!
//! # Blob Format
//!
//! ```text
//! +------------------------+
//! | original_length (32)   |  bytes in the uncompressed input
//! +------------------------+
//! | entry_count (16)       |  distinct byte values in the table
//! +------------------------+
//! | max_code_width (8)     |  longest code in bits
//! +------------------------+
//! | width_field_bits (8)   |  bits per stored code width
//! +------------------------+  64-bit boundary
//! | records                |  entry_count x (max_code_width + width_field_bits + 8)
//! | (padded to 64 bits)    |
//! +------------------------+
//! | payload                |  one codeword per input byte
//! | (padded to 64 bits)    |
//! +------------------------+
//! ```
//!
//! All fields are big-endian, as written MSB-first by the bit writer.

use crate::bitio::{BitReader, BitWriter};
use crate::error::{BitIoError, CorruptData};
use crate::table::CodeTable;

/// Size of the fixed header in bytes. Exactly one 64-bit word.
pub const HEADER_SIZE: usize = 8;

/// The fixed fields at the start of every non-empty blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlobHeader {
    pub original_length: u32,
    pub entry_count: u16,
    pub max_code_width: u8,
    pub width_field_bits: u8,
}

impl BlobHeader {
    /// Header describing `table` applied to an input of `original_length` bytes.
    pub fn for_table(original_length: u32, table: &CodeTable) -> Self {
        Self {
            original_length,
            entry_count: table.len() as u16,
            max_code_width: table.max_code_width(),
            width_field_bits: table.width_field_bits(),
        }
    }

    /// Write the header and pad to the next word.
    pub fn write(&self, writer: &mut BitWriter) -> Result<(), BitIoError> {
        writer.write_bits(self.original_length as u64, 32)?;
        writer.write_bits(self.entry_count as u64, 16)?;
        writer.write_bits(self.max_code_width as u64, 8)?;
        writer.write_bits(self.width_field_bits as u64, 8)?;
        writer.align_to_word();
        Ok(())
    }

    /// Read the header and skip to the first record.
    pub fn read(reader: &mut BitReader<'_>) -> Result<Self, CorruptData> {
        let header = Self {
            original_length: reader.read_u32().map_err(CorruptData::TruncatedHeader)?,
            entry_count: reader.read_u16().map_err(CorruptData::TruncatedHeader)?,
            max_code_width: reader.read_u8().map_err(CorruptData::TruncatedHeader)?,
            width_field_bits: reader.read_u8().map_err(CorruptData::TruncatedHeader)?,
        };
        reader.align_to_word().map_err(CorruptData::TruncatedHeader)?;
        Ok(header)
    }

    /// Read the records this header announces.
    pub fn read_table(&self, reader: &mut BitReader<'_>) -> Result<CodeTable, CorruptData> {
        CodeTable::read_records(
            reader,
            self.entry_count,
            self.max_code_width,
            self.width_field_bits,
        )
    }
}

/// Header and code table of a blob, without decoding its payload.
#[derive(Debug, Clone)]
pub struct BlobSummary {
    pub header: BlobHeader,
    pub table: CodeTable,
    /// Bits left after the table region, padding included
    pub payload_bits: usize,
}

/// Parse the header and table of `blob`.
///
/// Returns `Ok(None)` for the empty blob, which has neither.
pub fn inspect(blob: &[u8]) -> Result<Option<BlobSummary>, CorruptData> {
    if blob.is_empty() {
        return Ok(None);
    }

    let mut reader = BitReader::new(blob);
    let header = BlobHeader::read(&mut reader)?;
    let table = header.read_table(&mut reader)?;
    reader.align_to_word().map_err(CorruptData::TruncatedHeader)?;

    Ok(Some(BlobSummary {
        header,
        table,
        payload_bits: reader.bits_remaining(),
    }))
}
