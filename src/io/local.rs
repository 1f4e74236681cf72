use super::ReadAt;
use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

/// Local file reader with random access support
pub struct LocalFileReader {
    #[cfg(any(unix, windows))]
    file: File,
    #[cfg(not(any(unix, windows)))]
    file: parking_lot::Mutex<File>,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::open_failed(path, e))?;
        Self::from_file(file)
    }

    pub fn from_file(file: File) -> Result<Self> {
        let size = file.metadata()?.len();

        #[cfg(not(any(unix, windows)))]
        let file = parking_lot::Mutex::new(file);

        Ok(Self { file, size })
    }
}

impl ReadAt for LocalFileReader {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_at(buf, offset)
        }

        #[cfg(windows)]
        {
            // seek_read moves the shared cursor, but every caller passes an
            // explicit offset so nothing depends on it
            use std::os::windows::fs::FileExt;
            self.file.seek_read(buf, offset)
        }

        #[cfg(not(any(unix, windows)))]
        {
            use std::io::{Read, Seek, SeekFrom};
            // Seek and read must not interleave with another accessor
            let mut file = self.file.lock();
            file.seek(SeekFrom::Start(offset))?;
            file.read(buf)
        }
    }

    fn size(&self) -> u64 {
        self.size
    }
}
