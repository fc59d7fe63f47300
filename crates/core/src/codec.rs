//! Whole-buffer compression and decompression.
//!
//! Each call builds its own frequency table, tree and code table, so the
//! functions are safe to call from any number of threads at once.

use tracing::debug;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{CorruptData, Error, Result};
use crate::frequency::FrequencyTable;
use crate::header::BlobHeader;
use crate::table::CodeTable;
use crate::tree::HuffmanTree;

/// Largest input the 32-bit `original_length` field can describe.
pub const MAX_INPUT_LEN: usize = u32::MAX as usize;

/// Compress `data` into a self-describing blob.
///
/// Empty input produces an empty blob.
///
/// # Panics
/// Panics if `data` is longer than [`MAX_INPUT_LEN`]; use [`try_compress`] to
/// get an error instead.
pub fn compress(data: &[u8]) -> Vec<u8> {
    match try_compress(data) {
        Ok(blob) => blob,
        Err(err) => panic!("{err}"),
    }
}

/// Compress `data`, reporting oversized input as an error.
///
/// # Errors
/// `Error::InputTooLarge` if `data` is longer than [`MAX_INPUT_LEN`].
pub fn try_compress(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() > MAX_INPUT_LEN {
        return Err(Error::InputTooLarge {
            len: data.len(),
            max: MAX_INPUT_LEN,
        });
    }

    let Some(tree) = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data)) else {
        return Ok(Vec::new());
    };
    let table = CodeTable::from_tree(&tree);
    let header = BlobHeader::for_table(data.len() as u32, &table);

    let mut writer = BitWriter::new();
    header.write(&mut writer)?;
    table.write_records(&mut writer)?;
    writer.align_to_word();

    for &byte in data {
        // The table was built from these bytes, so each one has a code
        let codeword = table.codeword(byte);
        debug_assert!(codeword.is_some(), "byte {byte:#04x} missing from its own code table");
        if let Some((code, width)) = codeword {
            writer.write_bits(code, width as usize)?;
        }
    }

    let blob = writer.finish();
    debug!(
        original_length = data.len(),
        compressed_length = blob.len(),
        entries = table.len(),
        max_code_width = table.max_code_width(),
        mode = ?table.mode(),
        "compressed"
    );
    Ok(blob)
}

/// Reconstruct the original bytes from a blob produced by [`compress`].
///
/// The empty blob decodes to empty output. Bits after the last decoded symbol
/// are padding and are ignored.
///
/// # Errors
/// `CorruptData` for any truncated or inconsistent blob. No partial output is
/// returned.
pub fn decompress(blob: &[u8]) -> std::result::Result<Vec<u8>, CorruptData> {
    if blob.is_empty() {
        return Ok(Vec::new());
    }

    decode_blob(blob).inspect_err(|err| {
        debug!(blob_length = blob.len(), error = %err, "rejected corrupt blob");
    })
}

fn decode_blob(blob: &[u8]) -> std::result::Result<Vec<u8>, CorruptData> {
    let mut reader = BitReader::new(blob);
    let header = BlobHeader::read(&mut reader)?;
    let table = header.read_table(&mut reader)?;
    let lookup = table.decode_lookup()?;
    reader.align_to_word().map_err(CorruptData::TruncatedHeader)?;

    let expected = header.original_length as usize;
    let max_width = lookup.max_width();
    // Every symbol costs at least one bit, so the payload bounds the output
    let mut output = Vec::with_capacity(expected.min(reader.bits_remaining()));

    let mut bits = 0u64;
    let mut bit_count = 0u8;
    while output.len() < expected {
        let bit = reader
            .read_bit()
            .map_err(|_| CorruptData::TruncatedPayload {
                decoded: output.len(),
                expected,
            })?;
        bits = (bits << 1) | bit as u64;
        bit_count += 1;

        if let Some(byte) = lookup.get(bit_count, bits) {
            output.push(byte);
            bits = 0;
            bit_count = 0;
        } else if bit_count >= max_width {
            return Err(CorruptData::InvalidCode {
                position: reader.position() - bit_count as usize,
            });
        }
    }

    // The word holding the last codeword must be complete
    reader
        .align_to_word()
        .map_err(|_| CorruptData::TruncatedPayload {
            decoded: output.len(),
            expected,
        })?;

    debug!(
        original_length = expected,
        compressed_length = blob.len(),
        entries = table.len(),
        "decompressed"
    );
    Ok(output)
}
