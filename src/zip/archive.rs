use flate2::read::DeflateDecoder;
use std::collections::HashMap;
use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::file::FileHandle;
use crate::io::{LocalFileReader, MemoryReader, RangeReader, ReadAt};
use crate::location::Location;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// An open ZIP archive with its central directory indexed by name
///
/// Share it as `Arc<ZipArchive>`: locations and accessors clone the `Arc`,
/// and the backing file is closed when the last clone is dropped.
pub struct ZipArchive {
    parser: ZipParser<dyn ReadAt>,
    entries: Vec<ZipFileEntry>,
    index: HashMap<String, usize>,
    location: Location,
}

impl ZipArchive {
    /// Open the archive stored in a plain file
    pub fn open(file: &FileHandle) -> Result<Self> {
        let reader = LocalFileReader::new(file.path())?;
        Self::from_reader(Arc::new(reader), Location::from_handle(file.clone()))
    }

    /// Open the archive stored at `location`
    ///
    /// A location inside another archive is inflated into memory first,
    /// which is how jars nested in jars are read.
    pub fn open_location(location: Location) -> Result<Self> {
        if let Some(file) = location.as_file() {
            return Self::open(file);
        }
        let bytes = location.data()?.read_to_vec()?;
        Self::from_reader(Arc::new(MemoryReader::new(bytes)), location)
    }

    fn from_reader(reader: Arc<dyn ReadAt>, location: Location) -> Result<Self> {
        let parser = ZipParser::new(reader);
        let entries = parser.list_files()?;

        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            index.entry(entry.file_name.clone()).or_insert(i);
        }

        log::debug!("opened archive {} with {} entries", location, entries.len());

        Ok(Self {
            parser,
            entries,
            index,
            location,
        })
    }

    /// Look up an entry by its exact name inside the archive
    pub fn entry(&self, name: &str) -> Option<&ZipFileEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// All entries in central directory order
    pub fn entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Where the archive's own bytes live
    pub fn location(&self) -> &Location {
        &self.location
    }
}

impl fmt::Debug for ZipArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZipArchive")
            .field("location", &self.location)
            .field("entries", &self.entries.len())
            .finish()
    }
}

/// Upper bound on the buffer reserved before an entry's data is read.
const INITIAL_CAPACITY: u64 = 64 * 1024;

/// Decompresses one archive entry straight into a caller buffer
pub struct ZipCursor<'a> {
    entry: &'a ZipFileEntry,
    archive: &'a ZipArchive,
    verify_checksum: bool,
}

impl<'a> ZipCursor<'a> {
    pub fn new(entry: &'a ZipFileEntry, archive: &'a ZipArchive, verify_checksum: bool) -> Self {
        Self {
            entry,
            archive,
            verify_checksum,
        }
    }

    /// Fill `buf` with the entry's uncompressed bytes
    ///
    /// Returns how many bytes the stream produced, which is less than
    /// `buf.len()` when the entry is shorter. The CRC-32 is checked only
    /// when the whole entry was produced.
    pub fn copy(&self, buf: &mut [u8]) -> Result<usize> {
        let produced = fill(self.stream()?, buf).map_err(|e| self.read_error(e))?;
        self.verify(&buf[..produced])?;
        Ok(produced)
    }

    /// Read the whole entry into a buffer that grows with the stream
    ///
    /// Unlike sizing a buffer from the central directory up front, a
    /// header that lies about the size costs no more memory than the data
    /// actually produced.
    pub fn read_to_vec(&self) -> Result<Vec<u8>> {
        let expected = self.entry.real_size()? as u64;
        let mut out = Vec::with_capacity(expected.min(INITIAL_CAPACITY) as usize);
        self.stream()?
            .take(expected + 1)
            .read_to_end(&mut out)
            .map_err(|e| self.read_error(e))?;

        if out.len() as u64 != expected {
            return Err(Error::corrupted(
                &self.entry.file_name,
                format!("expected {expected} bytes, stream produced {}", out.len()),
            ));
        }
        self.verify(&out)?;
        Ok(out)
    }

    fn stream(&self) -> Result<Box<dyn Read + 'a>> {
        let offset = self.archive.parser.get_data_offset(self.entry)?;
        let source = RangeReader::new(
            self.archive.parser.reader().as_ref(),
            offset,
            self.entry.compressed_size,
        );

        match self.entry.compression_method {
            CompressionMethod::Stored => Ok(Box::new(source)),
            CompressionMethod::Deflate => Ok(Box::new(DeflateDecoder::new(source))),
            CompressionMethod::Unknown(method) => Err(Error::UnsupportedCompression { method }),
        }
    }

    fn read_error(&self, e: io::Error) -> Error {
        match e.kind() {
            io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput => {
                Error::corrupted(&self.entry.file_name, e.to_string())
            }
            _ => Error::Io(e),
        }
    }

    fn verify(&self, produced: &[u8]) -> Result<()> {
        if !self.verify_checksum || produced.len() as u64 != self.entry.uncompressed_size {
            return Ok(());
        }
        let actual = crc32fast::hash(produced);
        if actual != self.entry.crc32 {
            let name = &self.entry.file_name;
            log::warn!(
                "CRC mismatch in {name}: expected {:08x}, got {actual:08x}",
                self.entry.crc32
            );
            return Err(Error::corrupted(name, "CRC-32 mismatch"));
        }
        Ok(())
    }
}

/// Read until `buf` is full or the stream ends
fn fill(mut reader: impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
