//! Plain filesystem handle used as the base of every location.

use std::borrow::Cow;
use std::fs::File;
use std::path::{Path, PathBuf, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

use url::Url;

use crate::error::{Error, Result};

/// An absolute path on the local filesystem
///
/// Creating or modifying a handle never touches the disk; I/O happens in
/// [`open_read_only`](Self::open_read_only), [`same_file`](Self::same_file)
/// and [`uri_spec`](Self::uri_spec).
#[derive(Debug, Clone)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    /// Wrap `path`, resolving it against the current directory if relative
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory containing this file; the root is its own parent
    pub fn parent(&self) -> FileHandle {
        let path = self.path.parent().unwrap_or(&self.path).to_path_buf();
        Self { path }
    }

    /// Append a relative path already in native separator form
    ///
    /// Leading separators are dropped so the result stays below `self`.
    pub fn append_relative_native_path(&mut self, relative: &str) {
        let relative = relative.trim_start_matches(MAIN_SEPARATOR);
        if !relative.is_empty() {
            self.path.push(relative);
        }
    }

    /// Whether both handles name the same file
    ///
    /// Identical paths match without I/O; otherwise both sides are
    /// canonicalized, and a side that cannot be resolved matches nothing.
    pub fn same_file(&self, other: &FileHandle) -> bool {
        if self.path == other.path {
            return true;
        }
        match (self.path.canonicalize(), other.path.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    pub fn open_read_only(&self) -> Result<File> {
        File::open(&self.path).map_err(|e| Error::open_failed(&self.path, e))
    }

    /// `file://` URL for this path; directories end with `/`
    pub fn uri_spec(&self) -> String {
        let url = if self.path.is_dir() {
            Url::from_directory_path(&self.path)
        } else {
            Url::from_file_path(&self.path)
        };
        match url {
            Ok(url) => url.into(),
            // Only reachable for paths `absolute` could not resolve
            Err(()) => format!("file://{}", self.path.display()),
        }
    }
}

/// Translate a `/`-separated relative path into native separators
pub fn native_relative_path(relative: &str) -> Cow<'_, str> {
    if MAIN_SEPARATOR == '/' {
        Cow::Borrowed(relative)
    } else {
        Cow::Owned(relative.replace('/', MAIN_SEPARATOR_STR))
    }
}
