//! Short-lived accessors for the bytes behind a [`Location`](crate::Location).

use std::fs::File;
use std::io::{self, Read};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::zip::{ZipArchive, ZipCursor, ZipFileEntry};

/// Consecutive zero-byte reads tolerated before a plain-file copy gives up.
const MAX_STALLED_READS: u32 = 3;

/// Resolved content of a location
///
/// Holds either an open file or an archive entry together with a shared
/// reference to its archive. The form is fixed when the accessor is
/// created. A default accessor holds nothing and fails every call with
/// [`Error::Uninitialized`].
#[derive(Debug, Default)]
pub struct Data {
    source: Source,
}

#[derive(Debug, Default)]
enum Source {
    #[default]
    Empty,
    File(File),
    Entry {
        archive: Arc<ZipArchive>,
        entry: ZipFileEntry,
    },
}

impl Data {
    pub(crate) fn from_file(file: File) -> Self {
        Self {
            source: Source::File(file),
        }
    }

    pub(crate) fn from_entry(archive: Arc<ZipArchive>, path: &str) -> Result<Self> {
        let entry = archive
            .entry(path)
            .cloned()
            .ok_or_else(|| Error::EntryNotFound { path: path.into() })?;
        Ok(Self {
            source: Source::Entry { archive, entry },
        })
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.source, Source::Empty)
    }

    /// Release the file or archive reference
    pub fn close(&mut self) {
        self.source = Source::Empty;
    }

    /// Size of the resource in bytes
    ///
    /// Fails with [`Error::SizeOverflow`] past `u32::MAX`.
    pub fn size(&self) -> Result<u32> {
        match &self.source {
            Source::File(file) => {
                let size = file.metadata()?.len();
                u32::try_from(size).map_err(|_| Error::SizeOverflow { size })
            }
            Source::Entry { entry, .. } => entry.real_size(),
            Source::Empty => Err(Error::Uninitialized),
        }
    }

    /// Fill all of `buf` with resource bytes
    ///
    /// File reads continue from the current position. On error the buffer
    /// contents are unspecified.
    pub fn copy(&mut self, buf: &mut [u8]) -> Result<()> {
        match &mut self.source {
            Source::File(file) => read_fully(file, buf),
            Source::Entry { archive, entry } => {
                let produced = ZipCursor::new(entry, archive, true).copy(buf)?;
                if produced != buf.len() {
                    return Err(Error::corrupted(
                        &entry.file_name,
                        format!("expected {} bytes, stream produced {produced}", buf.len()),
                    ));
                }
                Ok(())
            }
            Source::Empty => Err(Error::Uninitialized),
        }
    }

    /// Read the whole resource
    ///
    /// Archive entries are collected as they decompress, so an entry whose
    /// recorded size is inflated fails with [`Error::Corrupted`] without
    /// reserving that much memory first.
    pub fn read_to_vec(&mut self) -> Result<Vec<u8>> {
        if let Source::Entry { archive, entry } = &self.source {
            return ZipCursor::new(entry, archive, true).read_to_vec();
        }
        let mut buf = vec![0u8; self.size()? as usize];
        self.copy(&mut buf)?;
        Ok(buf)
    }
}

/// Read until `buf` is full, retrying short reads
fn read_fully(mut reader: impl Read, buf: &mut [u8]) -> Result<()> {
    let mut total = 0;
    let mut stalled = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => {
                stalled += 1;
                log::trace!("zero-byte read at {total}/{} ({stalled})", buf.len());
                if stalled >= MAX_STALLED_READS {
                    return Err(Error::ShortRead {
                        expected: buf.len(),
                        actual: total,
                    });
                }
            }
            Ok(n) => {
                total += n;
                stalled = 0;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
