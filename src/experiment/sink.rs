//! Storage sinks: the only place experiment outputs touch storage.
//!
//! Statistics are computed in memory. Directories are created and files
//! written only when the orchestrator or the report publisher calls into
//! a [`StorageSink`].

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Destination of saved experiment outputs.
pub trait StorageSink: Send + Sync {
    /// Makes sure `dir` exists (creating parents as needed).
    fn prepare_dir(&self, dir: &Path) -> io::Result<()>;

    /// Writes `contents` to `path`, replacing any previous contents.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Reads back the contents of `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Sink backed by the local file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl StorageSink for FsSink {
    fn prepare_dir(&self, dir: &Path) -> io::Result<()> {
        std::fs::create_dir_all(dir)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// In-memory sink, for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    dirs: Mutex<BTreeSet<PathBuf>>,
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directories prepared so far.
    pub fn dirs(&self) -> Vec<PathBuf> {
        lock(&self.dirs).iter().cloned().collect()
    }

    /// Paths written so far, sorted.
    pub fn paths(&self) -> Vec<PathBuf> {
        lock(&self.files).keys().cloned().collect()
    }

    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        lock(&self.files).get(path).cloned()
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StorageSink for MemorySink {
    fn prepare_dir(&self, dir: &Path) -> io::Result<()> {
        lock(&self.dirs).insert(dir.to_path_buf());
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        lock(&self.files).insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.contents(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} was never written", path.display()),
            )
        })
    }
}
