//! LZ77-style decompression for HQR entries
//!
//! The stream is a sequence of control bytes, each followed by up to eight
//! items. Bits are consumed low to high: a set bit is a literal byte, a clear
//! bit is a 16-bit back-reference header. The entry's compression type is
//! added to every back-reference length.

use crate::error::{Error, Result};
use crate::formats::reader::EntryReader;

/// Decompress an HQR entry body to exactly `size_full` bytes.
///
/// Decoding stops as soon as `size_full` bytes have been produced, which can
/// happen in the middle of a control byte or a back-reference run.
///
/// # Errors
/// Returns [`Error::Truncated`] if the compressed stream ends early and
/// [`Error::InvalidBackReference`] if a back-reference points before the start
/// of the output.
pub fn decompress(compressed: &[u8], size_full: usize, compression_type: u16) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(size_full);
    if size_full == 0 {
        return Ok(output);
    }

    let mut input = EntryReader::new(compressed);
    let length_bias = 1 + usize::from(compression_type);

    loop {
        let flags = input.u8()?;
        for bit in 0..8 {
            if (flags >> bit) & 1 == 1 {
                output.push(input.u8()?);
                if output.len() == size_full {
                    return Ok(output);
                }
            } else {
                let header = input.u16()?;
                let back_offset = 1 + usize::from(header >> 4);
                let length = length_bias + usize::from(header & 0x0F);

                if back_offset > output.len() {
                    return Err(Error::InvalidBackReference {
                        back_offset,
                        available: output.len(),
                    });
                }

                // Byte-by-byte so the window slides over bytes appended by this run
                for _ in 0..length {
                    let byte = output[output.len() - back_offset];
                    output.push(byte);
                }

                if output.len() >= size_full {
                    output.truncate(size_full);
                    return Ok(output);
                }
            }
        }
    }
}
