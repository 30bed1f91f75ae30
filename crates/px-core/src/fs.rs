//! File system capability used by slot resolution and writing.
//!
//! The extractor needs exactly three operations: existence check, full read
//! and write. [`LocalFileSystem`] performs them on disk, [`MemoryFileSystem`]
//! keeps everything in memory, and [`DryRunFileSystem`] reads through to a
//! base file system while capturing writes.

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Storage operations the extractor depends on.
pub trait FileSystem {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> CoreResult<bool>;

    /// Read the full contents of the file at `path`.
    fn read_to_string(&self, path: &Path) -> CoreResult<String>;

    /// Create or replace the file at `path`, creating parent directories.
    fn write(&self, path: &Path, contents: &str) -> CoreResult<()>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn exists(&self, path: &Path) -> CoreResult<bool> {
        (**self).exists(path)
    }

    fn read_to_string(&self, path: &Path) -> CoreResult<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> CoreResult<()> {
        (**self).write(path, contents)
    }
}

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> CoreResult<bool> {
        // permission errors must not read as "absent"
        path.try_exists().map_err(|e| CoreError::io(path, e))
    }

    fn read_to_string(&self, path: &Path) -> CoreResult<String> {
        std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
        }
        std::fs::write(path, contents).map_err(|e| CoreError::io(path, e))
    }
}

/// In-memory file system keyed by path.
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    /// Create an empty in-memory file system.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CoreResult<MutexGuard<'_, BTreeMap<PathBuf, String>>> {
        self.files
            .lock()
            .map_err(|e| CoreError::StatePoisoned(e.to_string()))
    }

    /// Snapshot of every stored file, ordered by path.
    pub fn files(&self) -> CoreResult<Vec<(PathBuf, String)>> {
        Ok(self
            .lock()?
            .iter()
            .map(|(p, c)| (p.clone(), c.clone()))
            .collect())
    }

    /// Number of stored files.
    pub fn len(&self) -> CoreResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether no file is stored.
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.lock()?.is_empty())
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &Path) -> CoreResult<bool> {
        Ok(self.lock()?.contains_key(path))
    }

    fn read_to_string(&self, path: &Path) -> CoreResult<String> {
        self.lock()?.get(path).cloned().ok_or_else(|| {
            CoreError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> CoreResult<()> {
        self.lock()?.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Reads from a base file system, captures writes in memory.
///
/// Captured files are visible to later reads, so a dry run resolves slots
/// exactly as a real run would without touching the base.
#[derive(Debug)]
pub struct DryRunFileSystem<F> {
    base: F,
    planned: MemoryFileSystem,
}

impl<F: FileSystem> DryRunFileSystem<F> {
    /// Wrap `base`.
    pub fn new(base: F) -> Self {
        Self {
            base,
            planned: MemoryFileSystem::new(),
        }
    }

    /// Files that would have been written, ordered by path.
    pub fn planned(&self) -> CoreResult<Vec<(PathBuf, String)>> {
        self.planned.files()
    }
}

impl<F: FileSystem> FileSystem for DryRunFileSystem<F> {
    fn exists(&self, path: &Path) -> CoreResult<bool> {
        if self.planned.exists(path)? {
            return Ok(true);
        }
        self.base.exists(path)
    }

    fn read_to_string(&self, path: &Path) -> CoreResult<String> {
        if self.planned.exists(path)? {
            return self.planned.read_to_string(path);
        }
        self.base.read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> CoreResult<()> {
        self.planned.write(path, contents)
    }
}

#[cfg(test)]
#[path = "fs_test.rs"]
mod tests;
