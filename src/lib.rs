//! # fileloc
//!
//! Uniform read-only access to resources that live either in plain files
//! or as entries inside zip archives (jars).
//!
//! A [`Location`] names a resource without opening anything. It can be
//! composed with relative paths, rendered as a canonical `file:` or `jar:`
//! URI, and compared with other locations. Resolving it with
//! [`Location::data`] yields a [`Data`] accessor that reports the size and
//! copies the bytes, decompressing archive entries on the fly.
//!
//! ## Features
//!
//! - Plain files and entries of zip archives behind one API
//! - Archives nested inside archives (`jar:jar:file:///a.zip!/b.jar!/c`)
//! - Shared open archives via `Arc<ZipArchive>`
//! - STORED and DEFLATE entries with length and CRC-32 verification
//! - ZIP64 central directories
//!
//! ## Example
//!
//! ```no_run
//! use fileloc::Location;
//!
//! fn main() -> fileloc::Result<()> {
//!     let manifest = Location::in_archive_file("omni.ja", "chrome/chrome.manifest");
//!     let sibling = manifest.join("browser.manifest");
//!     println!("{sibling}");
//!
//!     let bytes = sibling.data()?.read_to_vec()?;
//!     println!("{} bytes", bytes.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod data;
pub mod error;
pub mod file;
pub mod io;
pub mod location;
pub mod zip;

pub use cli::Cli;
pub use data::Data;
pub use error::{Error, Result};
pub use file::FileHandle;
pub use io::{LocalFileReader, MemoryReader, ReadAt};
pub use location::Location;
pub use zip::{ZipArchive, ZipCursor, ZipFileEntry};
