//! Error types for location resolution and content access.
//!
//! Every fallible operation in this crate returns [`Result<T>`]. Nothing is
//! retried on the caller's behalf except short reads while copying a plain
//! file, which are expected and not reported.

use std::io;
use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Opening a plain file, or the backing file of an archive, failed.
    #[error("failed to open {}: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing bytes could not be parsed as a zip archive.
    #[error("invalid zip archive: {0}")]
    InvalidArchive(String),

    /// The entry path is not present in the archive.
    #[error("entry not found in archive: {path}")]
    EntryNotFound { path: String },

    /// The resource is larger than `u32::MAX` bytes.
    #[error("resource too large: {size} bytes exceeds the 4 GiB limit")]
    SizeOverflow { size: u64 },

    /// Decompressed data disagrees with what the archive recorded.
    #[error("corrupted entry {path}: {reason}")]
    Corrupted { path: String, reason: String },

    #[error("unsupported compression method: {method}")]
    UnsupportedCompression { method: u16 },

    /// The accessor holds neither an open file nor an archive entry.
    #[error("content accessor is not initialized")]
    Uninitialized,

    /// A plain file stopped producing bytes before the buffer was filled.
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn open_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OpenFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupted(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by damaged archive contents.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corrupted { .. } | Self::InvalidArchive(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corruption_classification() {
        assert!(Error::corrupted("a.txt", "length mismatch").is_corruption());
        assert!(Error::InvalidArchive("no EOCD".into()).is_corruption());
        assert!(!Error::Uninitialized.is_corruption());
        assert!(!Error::EntryNotFound { path: "x".into() }.is_corruption());
    }

    #[test]
    fn open_failed_mentions_path() {
        let err = Error::open_failed(
            "/nonexistent/file.zip",
            io::Error::from(io::ErrorKind::NotFound),
        );
        assert!(err.to_string().contains("/nonexistent/file.zip"));
    }
}
