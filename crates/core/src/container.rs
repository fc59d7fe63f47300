//! Checked container frame for blobs stored on disk.
//!
//! The blob format itself carries no integrity check: a flipped payload bit can
//! still decode to the right length. Files written by the CLI therefore wrap
//! each blob in a small frame with a CRC.
//!
//! # Frame Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x55 0x46 0x42 ("HUFB")
//! +------------------+
//! | blob_len (8)     |  u64 little-endian
//! +------------------+
//! | crc32 (4)        |  u32 checksum of blob_len and blob
//! +------------------+
//! | blob             |  compressed blob (blob_len bytes)
//! | (variable)       |
//! +------------------+
//! ```

use crate::codec::{decompress, try_compress};
use crate::error::{ContainerError, Error, Result};

/// Magic number for container frames: "HUFB"
pub const MAGIC: [u8; 4] = [0x48, 0x55, 0x46, 0x42];

/// Size of the container header in bytes
pub const CONTAINER_HEADER_SIZE: usize = 16;

/// Wrap `blob` in a container frame.
pub fn serialize_container(blob: &[u8]) -> Vec<u8> {
    let blob_len = blob.len() as u64;
    let crc32 = compute_crc(blob_len, blob);

    let mut frame = Vec::with_capacity(CONTAINER_HEADER_SIZE + blob.len());
    frame.extend_from_slice(&MAGIC);
    frame.extend_from_slice(&blob_len.to_le_bytes());
    frame.extend_from_slice(&crc32.to_le_bytes());
    frame.extend_from_slice(blob);
    frame
}

/// Validate a container frame and return the blob inside it.
///
/// # Errors
/// - `ContainerError::TooShort` if the header is incomplete
/// - `ContainerError::InvalidMagic` if the magic number doesn't match
/// - `ContainerError::LengthMismatch` if the blob length disagrees with the header
/// - `Error::Crc` if the checksum fails
pub fn parse_container(bytes: &[u8]) -> Result<&[u8]> {
    if bytes.len() < CONTAINER_HEADER_SIZE {
        return Err(ContainerError::TooShort {
            required: CONTAINER_HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    }

    let (header, blob) = bytes.split_at(CONTAINER_HEADER_SIZE);
    let (magic, rest) = header.split_at(4);
    let (len_bytes, crc_bytes) = rest.split_at(8);

    if magic != MAGIC.as_slice() {
        let mut actual = [0u8; 4];
        actual.copy_from_slice(magic);
        return Err(ContainerError::InvalidMagic {
            expected: MAGIC,
            actual,
        }
        .into());
    }

    let blob_len = u64::from_le_bytes(fixed(len_bytes));
    let crc32 = u32::from_le_bytes(fixed(crc_bytes));

    if blob.len() as u64 != blob_len {
        return Err(ContainerError::LengthMismatch {
            expected: blob_len,
            actual: blob.len(),
        }
        .into());
    }

    let computed = compute_crc(blob_len, blob);
    if computed != crc32 {
        return Err(Error::Crc {
            expected: crc32,
            actual: computed,
        });
    }

    Ok(blob)
}

/// Compress `data` and wrap the blob in a container frame.
pub fn compress_to_container(data: &[u8]) -> Result<Vec<u8>> {
    let blob = try_compress(data)?;
    Ok(serialize_container(&blob))
}

/// Validate a container frame and decompress its blob.
pub fn decompress_container(bytes: &[u8]) -> Result<Vec<u8>> {
    let blob = parse_container(bytes)?;
    Ok(decompress(blob)?)
}

fn fixed<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

/// CRC32 over the length field and the blob.
fn compute_crc(blob_len: u64, blob: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&blob_len.to_le_bytes());
    hasher.update(blob);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_round_trip() {
        let data = b"hello world! this is a container test.";
        let frame = compress_to_container(data).unwrap();
        assert_eq!(&frame[..4], &MAGIC);
        assert_eq!(decompress_container(&frame).unwrap(), data);
    }

    #[test]
    fn test_empty_data() {
        let frame = compress_to_container(b"").unwrap();
        assert_eq!(frame.len(), CONTAINER_HEADER_SIZE);
        assert!(decompress_container(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_magic() {
        let mut frame = serialize_container(b"blob");
        frame[0] = 0xFF;
        assert!(matches!(
            parse_container(&frame),
            Err(Error::Container(ContainerError::InvalidMagic { .. }))
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(
            parse_container(&[0u8; 10]),
            Err(Error::Container(ContainerError::TooShort { required: 16, actual: 10 }))
        ));
    }

    #[test]
    fn test_length_mismatch() {
        let mut frame = serialize_container(b"blob");
        frame.pop();
        assert!(matches!(
            parse_container(&frame),
            Err(Error::Container(ContainerError::LengthMismatch { expected: 4, actual: 3 }))
        ));
    }

    #[test]
    fn test_crc_mismatch() {
        let mut frame = compress_to_container(b"test data").unwrap();
        let len = frame.len();
        frame[len - 1] ^= 0x01;
        assert!(matches!(parse_container(&frame), Err(Error::Crc { .. })));
    }
}
