//! Types for HQR archive handling

use serde::Serialize;

/// Size of the header in front of every entry blob
pub const ENTRY_HEADER_SIZE: usize = 10;

/// Size of one offset table slot
pub const OFFSET_SIZE: usize = 4;

/// How an entry's data is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Compression {
    /// Raw bytes, `size_compressed` long.
    Stored,
    /// LZ stream; the value is added to every back-reference length.
    Lz { length_bias: u16 },
}

impl Compression {
    /// Parse the compression type field of an entry header
    #[must_use]
    pub fn from_type(compression_type: u16) -> Self {
        match compression_type {
            0 => Compression::Stored,
            bias => Compression::Lz { length_bias: bias },
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Stored => "stored",
            Compression::Lz { .. } => "lz",
        }
    }
}

/// Header stored at the start of an entry blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryHeader {
    /// Absolute offset of the header in the archive
    pub offset: u32,
    /// Size of the decoded entry
    pub size_full: u32,
    /// Size of the stored (possibly compressed) data following the header
    pub size_compressed: u32,
    /// Raw compression type field
    pub compression_type: u16,
}

impl EntryHeader {
    #[must_use]
    pub fn compression(&self) -> Compression {
        Compression::from_type(self.compression_type)
    }

    /// Absolute offset of the stored data
    #[must_use]
    pub fn data_offset(&self) -> u64 {
        u64::from(self.offset) + ENTRY_HEADER_SIZE as u64
    }

    /// Decoded size divided by stored size, when the entry is compressed
    #[must_use]
    pub fn compression_ratio(&self) -> Option<f64> {
        match self.compression() {
            Compression::Stored => None,
            Compression::Lz { .. } if self.size_compressed == 0 => None,
            Compression::Lz { .. } => {
                Some(f64::from(self.size_full) / f64::from(self.size_compressed))
            }
        }
    }
}

/// Summary of one offset table slot, as listed by [`super::Hqr::list`]
#[derive(Debug, Clone, Serialize)]
pub struct EntryInfo {
    /// Slot index in the offset table
    pub index: usize,
    /// Parsed header, or the error message if the slot could not be read
    pub header: Result<EntryHeader, String>,
}
