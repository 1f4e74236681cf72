//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 1980-01-01 in DOS date format
const DOS_EPOCH_DATE: u16 = (1 << 5) | 1;

struct TestEntry {
    name: String,
    data: Vec<u8>,
    method: u16,
    recorded_size: Option<u32>,
    crc: Option<u32>,
}

/// Writes small zip archives with optional lies in the central directory.
#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<TestEntry>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.raw(name, data, 0)
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.raw(name, data, 8)
    }

    /// Entry with an arbitrary method id; non-deflate payloads are stored as-is
    pub fn raw(mut self, name: &str, data: &[u8], method: u16) -> Self {
        self.entries.push(TestEntry {
            name: name.to_string(),
            data: data.to_vec(),
            method,
            recorded_size: None,
            crc: None,
        });
        self
    }

    /// Override the uncompressed size recorded for the last entry
    pub fn recorded_size(mut self, size: u32) -> Self {
        self.entries.last_mut().expect("no entry").recorded_size = Some(size);
        self
    }

    /// Override the CRC-32 recorded for the last entry
    pub fn crc(mut self, crc: u32) -> Self {
        self.entries.last_mut().expect("no entry").crc = Some(crc);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for entry in &self.entries {
            let payload = if entry.method == 8 {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&entry.data).unwrap();
                encoder.finish().unwrap()
            } else {
                entry.data.clone()
            };
            let crc = entry.crc.unwrap_or_else(|| crc32fast::hash(&entry.data));
            let size = entry.recorded_size.unwrap_or(entry.data.len() as u32);
            let offset = out.len() as u32;
            let name = entry.name.as_bytes();

            out.write_all(b"PK\x03\x04").unwrap();
            out.write_u16::<LittleEndian>(20).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(entry.method).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_u16::<LittleEndian>(DOS_EPOCH_DATE).unwrap();
            out.write_u32::<LittleEndian>(crc).unwrap();
            out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(size).unwrap();
            out.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_all(name).unwrap();
            out.write_all(&payload).unwrap();

            central.write_all(b"PK\x01\x02").unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(entry.method).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(DOS_EPOCH_DATE).unwrap();
            central.write_u32::<LittleEndian>(crc).unwrap();
            central.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            central.write_u32::<LittleEndian>(size).unwrap();
            central.write_u16::<LittleEndian>(name.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(0).unwrap();
            central.write_u32::<LittleEndian>(offset).unwrap();
            central.write_all(name).unwrap();
        }

        let cd_offset = out.len() as u32;
        out.write_all(&central).unwrap();

        out.write_all(b"PK\x05\x06").unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out
    }

    /// Write the archive to `dir/name` and return its path
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        write_file(dir, name, &self.build())
    }
}

pub fn write_file(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, data).unwrap();
    path
}

/// Text long enough for deflate to actually compress
pub fn sample_text() -> Vec<u8> {
    "the quick brown fox jumps over the lazy dog\n"
        .repeat(50)
        .into_bytes()
}
