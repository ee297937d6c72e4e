//! Error types for `LbaHqr`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `LbaHqr` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A read ran past the end of the byte source.
    #[error("truncated data: needed {needed} bytes at offset {offset}, source has {len}")]
    Truncated {
        /// Offset the read started at.
        offset: usize,
        /// Number of bytes the read needed.
        needed: usize,
        /// Total length of the source.
        len: usize,
    },

    // ==================== HQR Archive Errors ====================
    /// An archive file could not be located for a session.
    #[error("archive {name} not found under {root}")]
    ArchiveNotFound {
        /// File name that was searched for (e.g. `BODY.HQR`).
        name: String,
        /// Directory that was searched.
        root: PathBuf,
    },

    /// Reserved for compression types that do not follow the LZ scheme.
    #[error("unsupported compression type: {compression_type}")]
    UnsupportedCompression {
        /// The compression type stored in the entry header.
        compression_type: u16,
    },

    /// A back-reference pointed before the start of the decompressed output.
    #[error("back-reference of {back_offset} bytes with only {available} bytes decoded")]
    InvalidBackReference {
        /// Distance of the back-reference.
        back_offset: usize,
        /// Bytes decoded so far.
        available: usize,
    },

    // ==================== Format Errors ====================
    /// A value that must be a multiple of `divisor` was not.
    #[error("{value} is not divisible by {divisor}")]
    NotDivisible {
        /// The value read from the source.
        value: i64,
        /// The required divisor.
        divisor: u32,
    },

    /// A referenced index is outside of the list it points into.
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// What kind of record was referenced (`vertex`, `bone`, ...).
        kind: &'static str,
        /// The offending index.
        index: usize,
        /// Length of the referenced list.
        len: usize,
    },

    /// A bone parent chain never reached a root bone.
    #[error("bone chain starting at bone {bone} never reaches a root")]
    BoneChainCycle {
        /// First bone of the walk.
        bone: usize,
    },

    /// A polygon block size does not split into equal records.
    #[error("polygon block at offset {offset}: {size} bytes cannot hold {count} equal records")]
    InvalidPolygonBlock {
        /// Offset of the block header in the entry.
        offset: usize,
        /// Declared block size, header included.
        size: u16,
        /// Declared number of polygons in the block.
        count: u16,
    },

    /// The resource offset table ran past the end of the entry.
    #[error("resource offset table is not terminated within {len} bytes")]
    UnterminatedResourceTable {
        /// Length of the directory entry.
        len: usize,
    },

    /// A resource descriptor record is malformed.
    #[error("invalid resource descriptor at offset {offset}: {message}")]
    InvalidDescriptor {
        /// Offset of the descriptor in the entry.
        offset: usize,
        /// Description of what is invalid.
        message: String,
    },

    /// The loop frame of an animation does not name one of its keyframes.
    #[error("loop frame {loop_frame} out of range ({num_keyframes} keyframes)")]
    InvalidLoopFrame {
        /// The stored loop frame.
        loop_frame: u16,
        /// Number of keyframes in the animation.
        num_keyframes: u16,
    },
}

impl Error {
    /// Whether this error reports a violation of a binary layout rule
    /// (as opposed to missing data or an IO failure).
    #[must_use]
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::NotDivisible { .. }
                | Error::IndexOutOfRange { .. }
                | Error::BoneChainCycle { .. }
                | Error::InvalidPolygonBlock { .. }
                | Error::InvalidBackReference { .. }
                | Error::UnterminatedResourceTable { .. }
                | Error::InvalidDescriptor { .. }
                | Error::InvalidLoopFrame { .. }
        )
    }
}

/// A specialized Result type for `LbaHqr` operations.
pub type Result<T> = std::result::Result<T, Error>;
