//! HQR archive operations module
//!
//! Entries have no names; they are addressed by their index in the offset
//! table at the start of the file.

mod batch;
mod reader;
mod types;

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub use batch::{BatchExtractResult, entry_file_name, extract_all};
pub use reader::HqrReader;
pub use types::*;

/// Handle to an HQR archive on disk
///
/// Only the path is kept; every read opens the file again, so a handle can be
/// shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hqr {
    path: PathBuf,
}

impl Hqr {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<HqrReader<File>> {
        HqrReader::new(File::open(&self.path)?)
    }

    /// Read and decode entry `index`
    ///
    /// # Errors
    /// Returns an error if the archive cannot be opened or the entry is
    /// truncated or malformed.
    pub fn read_entry(&self, index: usize) -> Result<Vec<u8>> {
        self.open()?.read_entry(index)
    }

    /// Read the header of entry `index` without decoding its data
    ///
    /// # Errors
    /// Returns an error if the archive cannot be opened or the slot is out of range.
    pub fn entry_header(&self, index: usize) -> Result<EntryHeader> {
        self.open()?.read_header(index)
    }

    /// Number of slots in the offset table
    ///
    /// # Errors
    /// Returns an error if the archive cannot be opened or is empty.
    pub fn slot_count(&self) -> Result<usize> {
        self.open()?.slot_count()
    }

    /// Number of entries, excluding the trailing end-of-data slot
    ///
    /// # Errors
    /// Returns an error if the archive cannot be opened or is empty.
    pub fn entry_count(&self) -> Result<usize> {
        self.open()?.entry_count()
    }

    /// List every entry with its header
    ///
    /// Slots whose header cannot be read are reported, not skipped.
    ///
    /// # Errors
    /// Returns an error if the offset table itself cannot be read.
    pub fn list(&self) -> Result<Vec<EntryInfo>> {
        let mut reader = self.open()?;
        let count = reader.entry_count()?;
        Ok((0..count)
            .map(|index| EntryInfo {
                index,
                header: reader.read_header(index).map_err(|e| e.to_string()),
            })
            .collect())
    }
}

/// Read and decode one entry of the archive at `path`
///
/// # Errors
/// Returns an error if the archive cannot be opened or the entry is malformed.
pub fn read_entry<P: AsRef<Path>>(path: P, index: usize) -> Result<Vec<u8>> {
    Hqr::new(path.as_ref()).read_entry(index)
}
