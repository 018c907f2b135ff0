//! Size-rotated log file writer.
//!
//! Cloning a [`FileWriter`] yields another handle to the same file, which is
//! what `tracing-subscriber` needs from a `MakeWriter`. When the file grows
//! past the size limit it is shifted to `<name>.1`, older backups move up one
//! slot, and the backup beyond the retention limit is deleted.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

#[derive(Clone)]
pub struct FileWriter {
    inner: Arc<WriterInner>,
}

struct WriterInner {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Opened on first write.
    file: Mutex<Option<File>>,
}

impl FileWriter {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub fn with_limits(path: impl Into<PathBuf>, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            inner: Arc::new(WriterInner {
                path: path.into(),
                max_bytes,
                max_backups,
                file: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Path of the `n`th backup, `<name>.<n>`.
    #[must_use]
    pub fn backup_path(&self, n: usize) -> PathBuf {
        let mut name = OsString::from(self.inner.path.as_os_str());
        name.push(format!(".{n}"));
        PathBuf::from(name)
    }

    fn write_record(&self, buf: &[u8]) -> io::Result<usize> {
        let mut slot = self.inner.file.lock().unwrap_or_else(PoisonError::into_inner);

        if self.needs_rotation() {
            *slot = None;
            self.rotate()?;
        }

        let file = match slot.take() {
            Some(file) => file,
            None => OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.inner.path)?,
        };
        let file = slot.insert(file);

        file.write_all(buf)?;
        file.flush()?;
        Ok(buf.len())
    }

    fn needs_rotation(&self) -> bool {
        fs::metadata(&self.inner.path).is_ok_and(|meta| meta.len() >= self.inner.max_bytes)
    }

    fn rotate(&self) -> io::Result<()> {
        if self.inner.max_backups == 0 {
            return fs::remove_file(&self.inner.path);
        }

        let oldest = self.backup_path(self.inner.max_backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.inner.max_backups).rev() {
            let from = self.backup_path(n);
            if from.exists() {
                fs::rename(&from, self.backup_path(n + 1))?;
            }
        }
        fs::rename(&self.inner.path, self.backup_path(1))
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_record(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut slot = self.inner.file.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_mut().map_or(Ok(()), Write::flush)
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.inner.path)
            .field("max_bytes", &self.inner.max_bytes)
            .field("max_backups", &self.inner.max_backups)
            .finish_non_exhaustive()
    }
}
