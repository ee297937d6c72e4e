//! Compression utilities

use crate::error::Result;

pub mod lz;

/// Decompress an LZ-compressed HQR entry body
///
/// # Errors
/// Returns an error if the stream is truncated or malformed.
pub fn decompress(data: &[u8], decompressed_size: usize, compression_type: u16) -> Result<Vec<u8>> {
    lz::decompress(data, decompressed_size, compression_type)
}
