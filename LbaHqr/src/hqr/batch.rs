//! Batch HQR extraction
//!
//! Decodes every entry of an archive in parallel. Each task opens its own
//! file handle, and a failing entry does not stop the others.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use super::Hqr;
use crate::error::Result;

/// Result of a batch extraction
#[derive(Debug, Clone, Default)]
pub struct BatchExtractResult {
    /// Files written, in slot order
    pub written: Vec<PathBuf>,
    /// Slots that failed to decode or write (index, error message)
    pub errors: Vec<(usize, String)>,
}

impl BatchExtractResult {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.written.len()
    }

    #[must_use]
    pub fn fail_count(&self) -> usize {
        self.errors.len()
    }
}

/// File name used for an extracted slot (`0044.bin`)
#[must_use]
pub fn entry_file_name(index: usize) -> String {
    format!("{index:04}.bin")
}

/// Extract every entry of `hqr` into `dest`
///
/// `progress` is called with `(done, total)` after each entry.
///
/// # Errors
/// Returns an error if the offset table cannot be read or `dest` cannot be
/// created. Per-entry failures are collected in the result instead.
pub fn extract_all<F>(hqr: &Hqr, dest: &Path, progress: F) -> Result<BatchExtractResult>
where
    F: Fn(usize, usize) + Send + Sync,
{
    let total = hqr.entry_count()?;
    std::fs::create_dir_all(dest)?;
    tracing::info!("Extracting {} entries from {}", total, hqr.path().display());

    let processed = AtomicUsize::new(0);
    let outcomes: Vec<(usize, Result<PathBuf>)> = (0..total)
        .into_par_iter()
        .map(|index| {
            let outcome = hqr.read_entry(index).and_then(|data| {
                let path = dest.join(entry_file_name(index));
                std::fs::write(&path, data)?;
                Ok(path)
            });
            let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
            progress(done, total);
            (index, outcome)
        })
        .collect();

    let mut result = BatchExtractResult::default();
    for (index, outcome) in outcomes {
        match outcome {
            Ok(path) => result.written.push(path),
            Err(e) => {
                tracing::warn!("Entry {} failed: {}", index, e);
                result.errors.push((index, e.to_string()));
            }
        }
    }
    Ok(result)
}
