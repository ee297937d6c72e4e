//! HQR archive reader
//!
//! An archive starts with a table of u32 offsets, one per entry. Each offset
//! points at a 10-byte header (`size_full`, `size_compressed`,
//! `compression_type`) followed by the stored data.

use std::io::{BufReader, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

use super::{Compression, ENTRY_HEADER_SIZE, EntryHeader, OFFSET_SIZE};
use crate::compression;
use crate::error::{Error, Result};

/// HQR reader over any `Read + Seek` source
pub struct HqrReader<R: Read + Seek> {
    reader: BufReader<R>,
    len: u64,
}

impl<R: Read + Seek> HqrReader<R> {
    /// Create a new reader from a Read + Seek source
    ///
    /// # Errors
    /// Returns an error if the source length cannot be determined.
    pub fn new(reader: R) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let len = reader.seek(SeekFrom::End(0))?;
        Ok(Self { reader, len })
    }

    /// Length of the underlying source in bytes
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Position the source at `offset`, checking that `needed` bytes follow
    fn seek_checked(&mut self, offset: u64, needed: usize) -> Result<()> {
        if offset.saturating_add(needed as u64) > self.len {
            return Err(Error::Truncated {
                offset: offset as usize,
                needed,
                len: self.len as usize,
            });
        }
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Number of slots in the offset table
    ///
    /// The table is not sized explicitly; it ends where the first entry
    /// begins.
    pub fn slot_count(&mut self) -> Result<usize> {
        Ok(self.entry_offset(0)? as usize / OFFSET_SIZE)
    }

    /// Number of entries in the archive
    ///
    /// The last table slot normally holds the end of the data rather than an
    /// entry. A final slot with no room for an entry header after it is not
    /// counted.
    pub fn entry_count(&mut self) -> Result<usize> {
        let slots = self.slot_count()?;
        let Some(last) = slots.checked_sub(1) else {
            return Ok(0);
        };
        let end = u64::from(self.entry_offset(last)?) + ENTRY_HEADER_SIZE as u64;
        if end > self.len {
            tracing::trace!("Slot {} is the end-of-data marker", last);
            return Ok(last);
        }
        Ok(slots)
    }

    /// Read the offset table slot for `index`
    pub fn entry_offset(&mut self, index: usize) -> Result<u32> {
        self.seek_checked((index * OFFSET_SIZE) as u64, OFFSET_SIZE)?;
        Ok(self.reader.read_u32::<LittleEndian>()?)
    }

    /// Read the header of entry `index`
    pub fn read_header(&mut self, index: usize) -> Result<EntryHeader> {
        let offset = self.entry_offset(index)?;
        self.seek_checked(u64::from(offset), ENTRY_HEADER_SIZE)?;

        let size_full = self.reader.read_u32::<LittleEndian>()?;
        let size_compressed = self.reader.read_u32::<LittleEndian>()?;
        let compression_type = self.reader.read_u16::<LittleEndian>()?;

        Ok(EntryHeader {
            offset,
            size_full,
            size_compressed,
            compression_type,
        })
    }

    /// Read and decode entry `index`
    ///
    /// Stored entries are returned verbatim (`size_compressed` bytes);
    /// compressed entries are decoded to exactly `size_full` bytes.
    pub fn read_entry(&mut self, index: usize) -> Result<Vec<u8>> {
        let header = self.read_header(index)?;
        tracing::debug!(
            "HQR entry {}: offset={} full={} stored={} type={}",
            index,
            header.offset,
            header.size_full,
            header.size_compressed,
            header.compression_type
        );

        let stored_len = header.size_compressed as usize;
        self.seek_checked(header.data_offset(), stored_len)?;
        let mut stored = vec![0u8; stored_len];
        self.reader.read_exact(&mut stored)?;

        match header.compression() {
            Compression::Stored => Ok(stored),
            Compression::Lz { length_bias } => {
                compression::decompress(&stored, header.size_full as usize, length_bias)
            }
        }
    }
}
