//! Sequential little-endian reader over a decoded archive entry
//!
//! Every LBA2 sub-format is read front to back: sections are reached by
//! consuming bytes up to their offset, never by seeking backwards.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::{Error, Result};

/// Byte cursor over one decompressed entry.
#[derive(Debug, Clone)]
pub struct EntryReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> EntryReader<'a> {
    /// Create a reader positioned at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current read position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Total length of the underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    /// Whether the underlying data is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursor.get_ref().is_empty()
    }

    /// Bytes left after the current position.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.position())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.remaining() < needed {
            return Err(Error::Truncated {
                offset: self.position(),
                needed,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Read a `u8` and advance past it.
    pub fn u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    /// Read an `i8` and advance past it.
    pub fn i8(&mut self) -> Result<i8> {
        self.ensure(1)?;
        Ok(self.cursor.read_i8()?)
    }

    /// Read a little-endian `u16` and advance past it.
    pub fn u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    /// Read a little-endian `i16` and advance past it.
    pub fn i16(&mut self) -> Result<i16> {
        self.ensure(2)?;
        Ok(self.cursor.read_i16::<LittleEndian>()?)
    }

    /// Read a little-endian `u32` and advance past it.
    pub fn u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    /// Read a little-endian `i32` and advance past it.
    pub fn i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    /// Read a `u16` that must be a multiple of `n`, returning the quotient.
    pub fn u16_div_exact(&mut self, n: u16) -> Result<u16> {
        let value = self.u16()?;
        if n == 0 || value % n != 0 {
            return Err(Error::NotDivisible {
                value: i64::from(value),
                divisor: u32::from(n),
            });
        }
        Ok(value / n)
    }

    /// Read an `i16` that must be a multiple of `n`, returning the quotient.
    ///
    /// `-1` is a "none" sentinel and is returned unchanged. A zero divisor or
    /// a quotient that does not fit in `i16` is reported as not divisible.
    pub fn i16_div_exact(&mut self, n: i16) -> Result<i16> {
        let value = self.i16()?;
        if value == -1 {
            return Ok(value);
        }
        match (value.checked_rem(n), value.checked_div(n)) {
            (Some(0), Some(quotient)) => Ok(quotient),
            _ => Err(Error::NotDivisible {
                value: i64::from(value),
                divisor: u32::from(n.unsigned_abs()),
            }),
        }
    }

    /// Consume `n` bytes without returning them.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.cursor.set_position((self.position() + n) as u64);
        Ok(())
    }

    /// Consume bytes up to the absolute `offset`.
    ///
    /// An offset behind the current position is ignored.
    pub fn seek_forward(&mut self, offset: usize) -> Result<()> {
        let position = self.position();
        if offset <= position {
            if offset < position {
                tracing::trace!("ignoring backward seek from {} to {}", position, offset);
            }
            return Ok(());
        }
        self.skip(offset - position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_advance_position() {
        let data = [0x01, 0x34, 0x12, 0xFF, 0xFF, 0x78, 0x56, 0x34, 0x12];
        let mut r = EntryReader::new(&data);
        assert_eq!(r.u8().unwrap(), 1);
        assert_eq!(r.u16().unwrap(), 0x1234);
        assert_eq!(r.position(), 3);
        assert_eq!(r.i16().unwrap(), -1);
        assert_eq!(r.u32().unwrap(), 0x12345678);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_is_truncated() {
        let mut r = EntryReader::new(&[0x01]);
        match r.u16() {
            Err(Error::Truncated { offset, needed, len }) => {
                assert_eq!((offset, needed, len), (0, 2, 1));
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
        // A failed read leaves the position alone
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_seek_forward_never_goes_back() {
        let data = [0u8; 16];
        let mut r = EntryReader::new(&data);
        r.seek_forward(10).unwrap();
        assert_eq!(r.position(), 10);
        r.seek_forward(4).unwrap();
        assert_eq!(r.position(), 10);
        assert!(r.seek_forward(17).is_err());
    }

    #[test]
    fn test_u16_div_exact() {
        let data = 12u16.to_le_bytes();
        assert_eq!(EntryReader::new(&data).u16_div_exact(4).unwrap(), 3);

        let data = 13u16.to_le_bytes();
        let err = EntryReader::new(&data).u16_div_exact(4).unwrap_err();
        assert!(matches!(err, Error::NotDivisible { value: 13, divisor: 4 }));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_i16_div_exact_keeps_sentinel() {
        let data = (-1i16).to_le_bytes();
        assert_eq!(EntryReader::new(&data).i16_div_exact(6).unwrap(), -1);
        assert_eq!(EntryReader::new(&data).i16_div_exact(2).unwrap(), -1);

        let data = (-12i16).to_le_bytes();
        assert_eq!(EntryReader::new(&data).i16_div_exact(6).unwrap(), -2);

        let data = 7i16.to_le_bytes();
        assert!(EntryReader::new(&data).i16_div_exact(6).is_err());
    }

    #[test]
    fn test_i16_div_exact_rejects_overflowing_quotient() {
        let data = i16::MIN.to_le_bytes();
        let err = EntryReader::new(&data).i16_div_exact(-1).unwrap_err();
        assert!(matches!(err, Error::NotDivisible { value: -32768, divisor: 1 }));

        let data = 4i16.to_le_bytes();
        assert!(EntryReader::new(&data).i16_div_exact(0).is_err());
    }
}
