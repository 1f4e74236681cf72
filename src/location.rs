//! Locations of resources that live in plain files or inside zip archives.
//!
//! A [`Location`] only names a resource; it holds no open file. Call
//! [`Location::data`] to get a [`Data`] accessor that can report the size
//! and copy out the bytes.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::data::Data;
use crate::error::Result;
use crate::file::{FileHandle, native_relative_path};
use crate::zip::ZipArchive;

/// The archive an entry location points into
#[derive(Debug, Clone)]
enum ArchiveRef {
    /// Archive stored in this file, opened on every resolve
    File(FileHandle),
    /// Archive that is already open and shared
    Open(Arc<ZipArchive>),
}

/// A plain file, or a `/`-separated entry path inside a zip archive
///
/// An entry location always has a non-empty path or an open archive; an
/// empty path over an archive file collapses to that plain file.
#[derive(Debug, Clone)]
pub struct Location {
    kind: Kind,
}

#[derive(Debug, Clone)]
enum Kind {
    File(FileHandle),
    Entry { archive: ArchiveRef, path: String },
}

impl Location {
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::from_handle(FileHandle::new(path))
    }

    pub fn from_handle(file: FileHandle) -> Self {
        Self {
            kind: Kind::File(file),
        }
    }

    /// Entry `entry` of the archive stored at `archive_path`
    ///
    /// An empty entry path denotes the archive file itself.
    pub fn in_archive_file(archive_path: impl AsRef<Path>, entry: impl Into<String>) -> Self {
        Self::from_parts(ArchiveRef::File(FileHandle::new(archive_path)), entry.into())
    }

    /// Entry `entry` of an archive that is already open
    pub fn in_archive(archive: Arc<ZipArchive>, entry: impl Into<String>) -> Self {
        Self {
            kind: Kind::Entry {
                archive: ArchiveRef::Open(archive),
                path: entry.into(),
            },
        }
    }

    fn from_parts(archive: ArchiveRef, path: String) -> Self {
        match archive {
            ArchiveRef::File(file) if path.is_empty() => Self::from_handle(file),
            archive => Self {
                kind: Kind::Entry { archive, path },
            },
        }
    }

    /// Derive a location from this one
    ///
    /// With no relative path the result names the same resource. Otherwise
    /// `relative` is resolved against the directory holding this resource:
    /// the entry's directory inside an archive, or the parent directory of
    /// a plain file.
    pub fn compose(&self, relative: Option<&str>) -> Self {
        match &self.kind {
            Kind::Entry { archive, path } => {
                let path = match relative {
                    None => path.clone(),
                    Some(relative) => {
                        let dir = path.rfind('/').map_or("", |i| &path[..=i]);
                        format!("{dir}{relative}")
                    }
                };
                Self::from_parts(archive.clone(), path)
            }
            Kind::File(file) => match relative {
                None => Self::from_handle(file.clone()),
                Some(relative) => {
                    let mut sibling = file.parent();
                    sibling.append_relative_native_path(&native_relative_path(relative));
                    Self::from_handle(sibling)
                }
            },
        }
    }

    /// Shorthand for `compose(Some(relative))`
    pub fn join(&self, relative: &str) -> Self {
        self.compose(Some(relative))
    }

    pub fn is_archive(&self) -> bool {
        matches!(self.kind, Kind::Entry { .. })
    }

    /// The file for a plain-file location, `None` for archive entries
    pub fn as_file(&self) -> Option<&FileHandle> {
        match &self.kind {
            Kind::File(file) => Some(file),
            Kind::Entry { .. } => None,
        }
    }

    /// Path inside the archive, empty for plain files
    pub fn entry_path(&self) -> &str {
        match &self.kind {
            Kind::File(_) => "",
            Kind::Entry { path, .. } => path,
        }
    }

    /// The on-disk file holding this resource, through any nesting
    pub fn base_file(&self) -> &FileHandle {
        match &self.kind {
            Kind::File(file)
            | Kind::Entry {
                archive: ArchiveRef::File(file),
                ..
            } => file,
            Kind::Entry {
                archive: ArchiveRef::Open(archive),
                ..
            } => archive.location().base_file(),
        }
    }

    /// Canonical URI: a `file:` URL, or `jar:<archive-uri>!/<entry>`
    pub fn uri(&self) -> String {
        match &self.kind {
            Kind::File(file) => file.uri_spec(),
            Kind::Entry { archive, path } => {
                let base = match archive {
                    ArchiveRef::File(file) => file.uri_spec(),
                    ArchiveRef::Open(archive) => archive.location().uri(),
                };
                format!("jar:{base}!/{path}")
            }
        }
    }

    /// Whether both locations name the same resource
    ///
    /// Entry paths must match exactly. The containers are then compared:
    /// plain files by [`FileHandle::same_file`], and an open archive by the
    /// location it was read from.
    pub fn equals(&self, other: &Location) -> bool {
        if self.entry_path() != other.entry_path() {
            return false;
        }
        match (self.container(), other.container()) {
            (Container::File(a), Container::File(b)) => a.same_file(b),
            (Container::Nested(a), Container::Nested(b)) => a.equals(b),
            _ => false,
        }
    }

    fn container(&self) -> Container<'_> {
        match &self.kind {
            Kind::File(file)
            | Kind::Entry {
                archive: ArchiveRef::File(file),
                ..
            } => Container::File(file),
            Kind::Entry {
                archive: ArchiveRef::Open(archive),
                ..
            } => {
                let backing = archive.location();
                match backing.as_file() {
                    Some(file) => Container::File(file),
                    None => Container::Nested(backing),
                }
            }
        }
    }

    /// Open the resource for reading
    ///
    /// Plain files are opened read-only. For entries, a shared open archive
    /// is reused; otherwise the archive file is opened for this accessor
    /// alone.
    pub fn data(&self) -> Result<Data> {
        match &self.kind {
            Kind::File(file) => {
                log::debug!("resolving plain file {}", file.path().display());
                Ok(Data::from_file(file.open_read_only()?))
            }
            Kind::Entry { archive, path } => {
                log::debug!("resolving entry {path}");
                let archive = match archive {
                    ArchiveRef::Open(archive) => Arc::clone(archive),
                    ArchiveRef::File(file) => Arc::new(ZipArchive::open(file)?),
                };
                Data::from_entry(archive, path)
            }
        }
    }
}

/// What physically holds a location's bytes
enum Container<'a> {
    File(&'a FileHandle),
    Nested(&'a Location),
}

impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> Location {
        Location::in_archive_file("/opt/app/omni.ja", path)
    }

    #[test]
    fn compose_resolves_against_entry_directory() {
        let base = entry("dir/entry.txt");
        assert_eq!(base.join("other.txt").entry_path(), "dir/other.txt");
        assert_eq!(base.join("sub/x.js").entry_path(), "dir/sub/x.js");
    }

    #[test]
    fn compose_from_top_level_entry() {
        assert_eq!(entry("entry.txt").join("other.txt").entry_path(), "other.txt");
    }

    #[test]
    fn compose_without_relative_keeps_path() {
        let composed = entry("a/b/c.txt").compose(None);
        assert!(composed.is_archive());
        assert_eq!(composed.entry_path(), "a/b/c.txt");
    }

    #[test]
    fn compose_against_directory_entry() {
        assert_eq!(entry("dir/").join("x").entry_path(), "dir/x");
    }

    #[test]
    fn compose_never_translates_archive_separators() {
        assert_eq!(entry("a/b").join("c/d").entry_path(), "a/c/d");
    }

    #[test]
    fn empty_entry_path_is_plain_file() {
        let location = Location::in_archive_file("/opt/app/omni.ja", "");
        assert!(!location.is_archive());
        assert_eq!(location.entry_path(), "");
        assert!(location.as_file().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn empty_path_over_archive_file_is_never_archive_backed() {
        let plain = Location::from_file("/opt/app/omni.ja");
        let built = Location::in_archive_file("/opt/app/omni.ja", "");
        let composed = entry("top.txt").join("");

        for location in [&built, &composed] {
            assert!(!location.is_archive());
            assert_eq!(location.uri(), plain.uri());
            assert_eq!(location, &plain);
        }
        assert_eq!(entry("dir/top.txt").join("").entry_path(), "dir/");
    }

    #[cfg(unix)]
    #[test]
    fn compose_plain_file_uses_parent_directory() {
        let base = Location::from_file("/opt/app/omni.ja");
        let composed = base.join("defaults/prefs.js");
        assert!(!composed.is_archive());
        assert_eq!(
            composed.base_file().path(),
            Path::new("/opt/app/defaults/prefs.js")
        );
        assert_eq!(base.compose(None).base_file().path(), Path::new("/opt/app/omni.ja"));
    }

    #[cfg(unix)]
    #[test]
    fn uri_of_entry_wraps_file_url() {
        assert_eq!(
            entry("chrome/app.js").uri(),
            "jar:file:///opt/app/omni.ja!/chrome/app.js"
        );
        assert_eq!(
            Location::from_file("/opt/app/omni.ja").to_string(),
            "file:///opt/app/omni.ja"
        );
    }

    #[cfg(unix)]
    #[test]
    fn equality_without_io() {
        assert_eq!(entry("a.txt"), entry("a.txt"));
        assert_ne!(entry("a.txt"), entry("b.txt"));
        assert_ne!(entry("a.txt"), Location::in_archive_file("/opt/other.ja", "a.txt"));
        assert_ne!(entry("a.txt"), Location::from_file("/opt/app/omni.ja"));
    }
}
