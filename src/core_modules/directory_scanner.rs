// THEORY:
// The `DirectoryScanner` is the first stage of dataset construction. It answers a
// single question: "what lives directly inside this directory?" The builder asks
// it twice per class, once at the root to discover class folders and once inside
// each class folder to discover the image files.
//
// Key architectural principles:
// 1.  **Shallow Listing**: Only immediate children are returned, each as a full
//     path (the scanned directory joined with the entry name). Descending further
//     is the caller's decision.
// 2.  **Partial Success**: A directory that cannot be opened, or an entry that
//     cannot be read, does not stop the scan. The outcome carries the best-effort
//     listing together with every error met on the way, and the caller chooses
//     whether those errors are fatal. An unreadable directory therefore produces
//     an empty listing and exactly one error.
// 3.  **Order**: Filesystem enumeration order is not stable across platforms.
//     Callers that derive labels from position must request `sorted`.

use crate::error::ScanError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options controlling a single directory listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Sort entries by file name instead of keeping filesystem order.
    pub sorted: bool,
}

/// A single child of a scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    /// The scanned directory joined with the entry name.
    pub path: PathBuf,
    pub is_dir: bool,
}

impl ScanEntry {
    /// The final component of the entry path, lossily converted.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The best-effort listing of a directory plus whatever went wrong producing it.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub entries: Vec<ScanEntry>,
    pub errors: Vec<ScanError>,
}

impl ScanOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn dirs(&self) -> impl Iterator<Item = &ScanEntry> {
        self.entries.iter().filter(|e| e.is_dir)
    }

    pub fn files(&self) -> impl Iterator<Item = &ScanEntry> {
        self.entries.iter().filter(|e| !e.is_dir)
    }
}

/// Lists the immediate children of `dir`.
pub fn scan_dir(dir: &Path, options: ScanOptions) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) => {
            let err = ScanError::new(dir, e.to_string());
            warn!("{}", err);
            outcome.errors.push(err);
            return outcome;
        }
    };

    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let err = ScanError::new(dir, e.to_string());
                warn!("{}", err);
                outcome.errors.push(err);
                continue;
            }
        };

        // `metadata` follows symlinks, so a link to a folder counts as a folder.
        let path = dir.join(entry.file_name());
        let is_dir = match fs::metadata(&path) {
            Ok(meta) => meta.is_dir(),
            Err(e) => {
                let err = ScanError::new(&path, e.to_string());
                warn!("{}", err);
                outcome.errors.push(err);
                continue;
            }
        };

        outcome.entries.push(ScanEntry { path, is_dir });
    }

    if options.sorted {
        outcome.entries.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    }

    outcome
}
