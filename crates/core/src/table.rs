//! Code table derivation, record serialization and the decoder lookup.
//!
//! A table is derived from one specific tree shape by a pre-order walk: child 0
//! appends a 0 bit, child 1 a 1 bit, and a leaf at depth `d` gets a `d`-bit
//! code. A tree that is a single leaf still yields a 1-bit code (value 0), so
//! every symbol costs at least one payload bit.
//!
//! # Record Format
//!
//! Each table entry is stored as a fixed-size record, MSB-first:
//!
//! ```text
//! +--------------------+----------------------+-----------+
//! | code (max_width)   | width (width_bits)   | byte (8)  |
//! +--------------------+----------------------+-----------+
//! ```
//!
//! `max_width` is the longest code in the table and `width_bits` the number of
//! significant bits in `max_width`.

use std::collections::HashMap;

use crate::bitio::{BitReader, BitWriter};
use crate::error::{BitIoError, CorruptData};
use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, NodeRef};

/// Largest code width the record format can carry.
pub const MAX_CODE_WIDTH: u8 = 64;

/// One `(byte, code, width)` assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry {
    pub byte: u8,
    /// Code value; only the low `width` bits are meaningful
    pub code: u64,
    pub width: u8,
}

impl CodeEntry {
    /// True if `self`'s code is a strict bit-prefix of `other`'s.
    pub fn is_prefix_of(&self, other: &CodeEntry) -> bool {
        self.width > 0
            && self.width < other.width
            && other.code.checked_shr(u32::from(other.width - self.width)) == Some(self.code)
    }
}

/// Smallest unsigned integer width that holds every code in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CodeWidthMode {
    B8,
    B16,
    B32,
    /// Only reachable with inputs large enough to grow trees deeper than 32
    B64,
}

impl CodeWidthMode {
    pub fn for_width(max_code_width: u8) -> Self {
        match max_code_width {
            0..=8 => CodeWidthMode::B8,
            9..=16 => CodeWidthMode::B16,
            17..=32 => CodeWidthMode::B32,
            _ => CodeWidthMode::B64,
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            CodeWidthMode::B8 => 8,
            CodeWidthMode::B16 => 16,
            CodeWidthMode::B32 => 32,
            CodeWidthMode::B64 => 64,
        }
    }
}

/// Number of bits needed to represent `value` (0 for 0).
pub fn significant_bits(value: u64) -> u8 {
    (u64::BITS - value.leading_zeros()) as u8
}

/// Code assignment for every byte value present in an input.
#[derive(Debug, Clone)]
pub struct CodeTable {
    /// Entries in tree-walk (or record) order
    entries: Vec<CodeEntry>,
    /// `(code, width)` indexed by byte; width 0 marks an absent byte
    codewords: [(u64, u8); 256],
    max_code_width: u8,
}

impl CodeTable {
    /// Derive the table from a built tree.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut entries = Vec::with_capacity(tree.leaf_count());
        walk(tree, tree.root(), 0, 0, &mut entries);
        Self::from_entries(entries)
    }

    /// Analyze `data` and derive its table. `None` for empty input.
    pub fn from_data(data: &[u8]) -> Option<Self> {
        HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data)).map(|tree| Self::from_tree(&tree))
    }

    fn from_entries(entries: Vec<CodeEntry>) -> Self {
        let mut codewords = [(0u64, 0u8); 256];
        for entry in &entries {
            codewords[entry.byte as usize] = (entry.code, entry.width);
        }
        let max_code_width = entries.iter().map(|e| e.width).max().unwrap_or(0);
        Self {
            entries,
            codewords,
            max_code_width,
        }
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(code, width)` for `byte`, or `None` if the byte was not in the input.
    pub fn codeword(&self, byte: u8) -> Option<(u64, u8)> {
        let (code, width) = self.codewords[byte as usize];
        (width > 0).then_some((code, width))
    }

    pub fn max_code_width(&self) -> u8 {
        self.max_code_width
    }

    /// Bits needed to store any entry's width.
    pub fn width_field_bits(&self) -> u8 {
        significant_bits(self.max_code_width as u64)
    }

    pub fn mode(&self) -> CodeWidthMode {
        CodeWidthMode::for_width(self.max_code_width)
    }

    /// Size in bits of one serialized record.
    pub fn record_bits(&self) -> usize {
        self.max_code_width as usize + self.width_field_bits() as usize + 8
    }

    /// Total payload bits needed to encode `data` with this table.
    pub fn encoded_bits(&self, data: &[u8]) -> u64 {
        data.iter()
            .map(|&byte| self.codewords[byte as usize].1 as u64)
            .sum()
    }

    /// Check that no code is a bit-prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.entries.iter().enumerate().all(|(i, a)| {
            self.entries.iter().enumerate().all(|(j, b)| {
                i == j || (!a.is_prefix_of(b) && !(a.width == b.width && a.code == b.code))
            })
        })
    }

    /// Write every entry as a fixed-size record.
    pub fn write_records(&self, writer: &mut BitWriter) -> Result<(), BitIoError> {
        let width_bits = self.width_field_bits() as usize;
        for entry in &self.entries {
            writer.write_bits(entry.code, self.max_code_width as usize)?;
            writer.write_bits(entry.width as u64, width_bits)?;
            writer.write_bits(entry.byte as u64, 8)?;
        }
        Ok(())
    }

    /// Read `count` records written by [`CodeTable::write_records`].
    ///
    /// # Errors
    /// Any `CorruptData` variant describing a truncated or inconsistent table.
    pub fn read_records(
        reader: &mut BitReader<'_>,
        count: u16,
        max_code_width: u8,
        width_field_bits: u8,
    ) -> Result<Self, CorruptData> {
        if count > 256 {
            return Err(CorruptData::TooManyEntries { count });
        }
        if max_code_width > MAX_CODE_WIDTH {
            return Err(CorruptData::MaxCodeWidthTooLarge {
                width: max_code_width,
            });
        }
        if width_field_bits > 8 {
            return Err(CorruptData::WidthFieldTooLarge {
                bits: width_field_bits,
            });
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let code = reader
                .read_bits(max_code_width as usize)
                .map_err(CorruptData::TruncatedHeader)?;
            let width = reader
                .read_bits(width_field_bits as usize)
                .map_err(CorruptData::TruncatedHeader)? as u8;
            let byte = reader.read_u8().map_err(CorruptData::TruncatedHeader)?;

            if width > max_code_width {
                return Err(CorruptData::WidthExceedsMax {
                    byte,
                    width,
                    max: max_code_width,
                });
            }
            if width == 0 {
                return Err(CorruptData::ZeroWidth { byte });
            }
            if width < MAX_CODE_WIDTH && code >> width != 0 {
                return Err(CorruptData::CodeOverflow { byte, code, width });
            }
            entries.push(CodeEntry { byte, code, width });
        }

        let mut table = Self::from_entries(entries);
        // Keep the declared maximum so the decoder bound matches the header
        table.max_code_width = max_code_width;
        Ok(table)
    }

    /// Build the decoder's width-indexed lookup.
    pub fn decode_lookup(&self) -> Result<DecodeLookup, CorruptData> {
        let bucket_count = self.max_code_width as usize + 1;
        let mut buckets: Vec<HashMap<u64, u8>> = vec![HashMap::new(); bucket_count];

        for entry in &self.entries {
            let bucket = buckets
                .get_mut(entry.width as usize)
                .ok_or(CorruptData::WidthOutOfLookup {
                    width: entry.width,
                    buckets: bucket_count,
                })?;
            if bucket.insert(entry.code, entry.byte).is_some() {
                return Err(CorruptData::DuplicateCode {
                    code: entry.code,
                    width: entry.width,
                });
            }
        }

        Ok(DecodeLookup { buckets })
    }
}

/// Pre-order walk assigning codes. `width` is the depth of `node` below the root.
fn walk(tree: &HuffmanTree, node: NodeRef, code: u64, width: u8, entries: &mut Vec<CodeEntry>) {
    match node {
        NodeRef::Leaf(byte) => entries.push(CodeEntry {
            byte,
            code,
            width: width.max(1),
        }),
        NodeRef::Internal(index) => {
            if let Some(internal) = tree.node(index) {
                for (bit, &child) in internal.children.iter().enumerate() {
                    walk(tree, child, (code << 1) | bit as u64, width + 1, entries);
                }
            }
        }
    }
}

/// Maps `(width, accumulated bits)` to a decoded byte.
#[derive(Debug, Clone)]
pub struct DecodeLookup {
    /// Indexed by code width; bucket 0 is always empty
    buckets: Vec<HashMap<u64, u8>>,
}

impl DecodeLookup {
    pub fn get(&self, width: u8, code: u64) -> Option<u8> {
        self.buckets.get(width as usize)?.get(&code).copied()
    }

    /// Largest width with a bucket.
    pub fn max_width(&self) -> u8 {
        (self.buckets.len() - 1) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_for(table: &CodeTable, byte: u8) -> CodeEntry {
        *table.entries().iter().find(|e| e.byte == byte).unwrap()
    }

    #[test]
    fn test_skewed_example_codes() {
        let table = CodeTable::from_data(b"aaaabbbccd").unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(entry_for(&table, b'a'), CodeEntry { byte: b'a', code: 0b0, width: 1 });
        assert_eq!(entry_for(&table, b'b'), CodeEntry { byte: b'b', code: 0b10, width: 2 });
        assert_eq!(entry_for(&table, b'd'), CodeEntry { byte: b'd', code: 0b110, width: 3 });
        assert_eq!(entry_for(&table, b'c'), CodeEntry { byte: b'c', code: 0b111, width: 3 });
        assert_eq!(table.max_code_width(), 3);
        assert_eq!(table.width_field_bits(), 2);
        assert_eq!(table.mode(), CodeWidthMode::B8);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = CodeTable::from_data(b"AAAAAAAA").unwrap();
        assert_eq!(table.entries(), &[CodeEntry { byte: b'A', code: 0, width: 1 }]);
        assert_eq!(table.codeword(b'A'), Some((0, 1)));
        assert_eq!(table.width_field_bits(), 1);
    }

    #[test]
    fn test_absent_byte_has_no_codeword() {
        let table = CodeTable::from_data(b"xyz").unwrap();
        assert_eq!(table.codeword(b'q'), None);
    }

    #[test]
    fn test_empty_data_has_no_table() {
        assert!(CodeTable::from_data(b"").is_none());
    }

    #[test]
    fn test_full_alphabet_is_eight_bits() {
        let data: Vec<u8> = (0..=255).collect();
        let table = CodeTable::from_data(&data).unwrap();
        assert_eq!(table.len(), 256);
        assert!(table.entries().iter().all(|e| e.width == 8));
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_fibonacci_frequencies_grow_deep_codes() {
        // Fibonacci weights produce a maximally unbalanced tree
        let mut data = Vec::new();
        let (mut a, mut b) = (1usize, 1usize);
        for symbol in 0..20u8 {
            data.extend(std::iter::repeat(symbol).take(a));
            (a, b) = (b, a + b);
        }
        let table = CodeTable::from_data(&data).unwrap();
        assert_eq!(table.max_code_width(), 19);
        assert_eq!(table.mode(), CodeWidthMode::B32);
        assert!(table.is_prefix_free());
    }

    #[test]
    fn test_mode_boundaries() {
        assert_eq!(CodeWidthMode::for_width(1), CodeWidthMode::B8);
        assert_eq!(CodeWidthMode::for_width(8), CodeWidthMode::B8);
        assert_eq!(CodeWidthMode::for_width(9), CodeWidthMode::B16);
        assert_eq!(CodeWidthMode::for_width(16), CodeWidthMode::B16);
        assert_eq!(CodeWidthMode::for_width(17), CodeWidthMode::B32);
        assert_eq!(CodeWidthMode::for_width(32), CodeWidthMode::B32);
        assert_eq!(CodeWidthMode::for_width(33), CodeWidthMode::B64);
        assert_eq!(CodeWidthMode::B16.bits(), 16);
    }

    #[test]
    fn test_significant_bits() {
        assert_eq!(significant_bits(0), 0);
        assert_eq!(significant_bits(1), 1);
        assert_eq!(significant_bits(3), 2);
        assert_eq!(significant_bits(4), 3);
        assert_eq!(significant_bits(8), 4);
        assert_eq!(significant_bits(64), 7);
    }

    #[test]
    fn test_prefix_relation() {
        let short = CodeEntry { byte: 0, code: 0b1, width: 1 };
        let long = CodeEntry { byte: 1, code: 0b10, width: 2 };
        let other = CodeEntry { byte: 2, code: 0b01, width: 2 };
        assert!(short.is_prefix_of(&long));
        assert!(!short.is_prefix_of(&other));
        assert!(!long.is_prefix_of(&short));
    }

    #[test]
    fn test_prefix_relation_at_full_width() {
        let empty = CodeEntry { byte: 0, code: 0, width: 0 };
        let top = CodeEntry { byte: 1, code: 1, width: 1 };
        let full = CodeEntry { byte: 2, code: 1 << 63, width: 64 };
        assert!(!empty.is_prefix_of(&full));
        assert!(top.is_prefix_of(&full));
        assert!(!full.is_prefix_of(&top));
    }

    #[test]
    fn test_records_read_back() {
        let table = CodeTable::from_data(b"hello, huffman world").unwrap();
        let mut writer = BitWriter::new();
        table.write_records(&mut writer).unwrap();
        assert_eq!(writer.bit_len(), table.len() * table.record_bits());
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let parsed = CodeTable::read_records(
            &mut reader,
            table.len() as u16,
            table.max_code_width(),
            table.width_field_bits(),
        )
        .unwrap();
        assert_eq!(parsed.entries(), table.entries());
    }

    #[test]
    fn test_truncated_records() {
        let table = CodeTable::from_data(b"abcdefgh").unwrap();
        let mut writer = BitWriter::new();
        table.write_records(&mut writer).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes[..2]);
        let result = CodeTable::read_records(&mut reader, 8, table.max_code_width(), table.width_field_bits());
        assert!(matches!(result, Err(CorruptData::TruncatedHeader(_))));
    }

    #[test]
    fn test_width_exceeding_max_is_rejected() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b01, 2).unwrap(); // code
        writer.write_bits(3, 2).unwrap(); // width 3 > max 2
        writer.write_bits(b'z' as u64, 8).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let result = CodeTable::read_records(&mut reader, 1, 2, 2);
        assert_eq!(
            result.unwrap_err(),
            CorruptData::WidthExceedsMax { byte: b'z', width: 3, max: 2 }
        );
    }

    #[test]
    fn test_code_overflowing_width_is_rejected() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b11, 2).unwrap();
        writer.write_bits(1, 2).unwrap();
        writer.write_bits(b'q' as u64, 8).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let result = CodeTable::read_records(&mut reader, 1, 2, 2);
        assert!(matches!(result, Err(CorruptData::CodeOverflow { width: 1, .. })));
    }

    #[test]
    fn test_zero_width_is_rejected() {
        let mut writer = BitWriter::new();
        writer.write_bits(0, 2).unwrap();
        writer.write_bits(0, 2).unwrap();
        writer.write_bits(7, 8).unwrap();
        let bytes = writer.finish();

        let mut reader = BitReader::new(&bytes);
        let result = CodeTable::read_records(&mut reader, 1, 2, 2);
        assert_eq!(result.unwrap_err(), CorruptData::ZeroWidth { byte: 7 });
    }

    #[test]
    fn test_header_limits_are_enforced() {
        let mut reader = BitReader::new(&[]);
        assert_eq!(
            CodeTable::read_records(&mut reader, 257, 8, 4).unwrap_err(),
            CorruptData::TooManyEntries { count: 257 }
        );
        assert_eq!(
            CodeTable::read_records(&mut reader, 1, 65, 7).unwrap_err(),
            CorruptData::MaxCodeWidthTooLarge { width: 65 }
        );
        assert_eq!(
            CodeTable::read_records(&mut reader, 1, 8, 9).unwrap_err(),
            CorruptData::WidthFieldTooLarge { bits: 9 }
        );
    }

    #[test]
    fn test_lookup_maps_width_and_code() {
        let table = CodeTable::from_data(b"aaaabbbccd").unwrap();
        let lookup = table.decode_lookup().unwrap();
        assert_eq!(lookup.max_width(), 3);
        assert_eq!(lookup.get(1, 0b0), Some(b'a'));
        assert_eq!(lookup.get(2, 0b10), Some(b'b'));
        assert_eq!(lookup.get(3, 0b111), Some(b'c'));
        assert_eq!(lookup.get(2, 0b11), None);
        assert_eq!(lookup.get(9, 0), None);
    }

    #[test]
    fn test_lookup_rejects_duplicate_codes() {
        let table = CodeTable::from_entries(vec![
            CodeEntry { byte: 1, code: 0b1, width: 1 },
            CodeEntry { byte: 2, code: 0b1, width: 1 },
        ]);
        assert_eq!(
            table.decode_lookup().unwrap_err(),
            CorruptData::DuplicateCode { code: 1, width: 1 }
        );
    }

    #[test]
    fn test_lookup_rejects_width_beyond_buckets() {
        let mut table = CodeTable::from_entries(vec![CodeEntry { byte: 1, code: 0b101, width: 3 }]);
        table.max_code_width = 2;
        assert_eq!(
            table.decode_lookup().unwrap_err(),
            CorruptData::WidthOutOfLookup { width: 3, buckets: 3 }
        );
    }
}
