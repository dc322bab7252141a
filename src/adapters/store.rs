//! Blob store adapters.
//!
//! Implements [`StoragePort`] twice:
//!
//! - [`MemStore`] — `HashMap` of byte vectors with a write counter, for
//!   tests and simulation.
//! - [`FileStore`] — one file per blob under a data directory, used by the
//!   daemon on the SD card.
//!
//! Both share the port's semantics: reads past the end of a blob are
//! zero-filled, writes past the end extend it, and comparing against a
//! missing blob is `false`.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::app::ports::StoragePort;
use crate::error::StorageError;

// ── In-memory store ───────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct MemStore {
    blobs: HashMap<String, Vec<u8>>,
    writes: usize,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `write_block` calls so far (wear accounting in tests).
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Raw contents of a blob.
    pub fn blob(&self, name: &str) -> Option<&[u8]> {
        self.blobs.get(name).map(Vec::as_slice)
    }
}

fn copy_out(blob: &[u8], offset: usize, buf: &mut [u8]) {
    buf.fill(0);
    if let Some(src) = blob.get(offset..) {
        let n = src.len().min(buf.len());
        buf[..n].copy_from_slice(&src[..n]);
    }
}

impl StoragePort for MemStore {
    fn read_block(&self, name: &str, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        let blob = self.blobs.get(name).ok_or(StorageError::NotFound)?;
        copy_out(blob, offset as usize, buf);
        Ok(())
    }

    fn write_block(&mut self, name: &str, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        let blob = self.blobs.entry(name.to_string()).or_default();
        let start = offset as usize;
        let end = start + data.len();
        if blob.len() < end {
            blob.resize(end, 0);
        }
        blob[start..end].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }

    fn compare_block(&self, name: &str, offset: u32, data: &[u8]) -> Result<bool, StorageError> {
        let Some(blob) = self.blobs.get(name) else {
            return Ok(false);
        };
        let mut current = vec![0u8; data.len()];
        copy_out(blob, offset as usize, &mut current);
        Ok(current == data)
    }

    fn exists(&self, name: &str) -> bool {
        self.blobs.contains_key(name)
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        self.blobs.remove(name);
        Ok(())
    }
}

// ── Directory-backed store ────────────────────────────────────

/// One file per blob in `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) the data directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!("FileStore: data directory {}", dir.display());
        Ok(Self { dir })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read_at(&self, name: &str, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        let mut file = File::open(self.path(name))?;
        file.seek(SeekFrom::Start(u64::from(offset)))?;
        buf.fill(0);
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..])? {
                0 => break,
                n => filled += n,
            }
        }
        Ok(())
    }
}

impl StoragePort for FileStore {
    fn read_block(&self, name: &str, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        self.read_at(name, offset, buf)
    }

    fn write_block(&mut self, name: &str, offset: u32, data: &[u8]) -> Result<(), StorageError> {
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.path(name))?;
        // Seeking past EOF and writing leaves a zero-filled gap.
        file.seek(SeekFrom::Start(u64::from(offset)))?;
        file.write_all(data)?;
        file.flush()?;
        debug!("FileStore: {} bytes -> {}@{}", data.len(), name, offset);
        Ok(())
    }

    fn compare_block(&self, name: &str, offset: u32, data: &[u8]) -> Result<bool, StorageError> {
        let mut current = vec![0u8; data.len()];
        match self.read_at(name, offset, &mut current) {
            Ok(()) => Ok(current == data),
            Err(StorageError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    fn remove(&mut self, name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(name)) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
