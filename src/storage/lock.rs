//! Advisory writer lock shared by the file backends
//!
//! The lock lives on a `<file>.lock` sibling so it survives the rename that
//! replaces the policy document. `flock`-style locks conflict between
//! separate opens, so two storage instances on one path exclude each other
//! just like two processes do.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// `path` with `suffix` appended to its file name
pub(crate) fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Exclusive lock released when dropped
#[derive(Debug)]
pub(crate) struct WriterLock {
    file: File,
}

impl WriterLock {
    /// Block until the lock on `lock_path` is held
    pub(crate) fn acquire(lock_path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(lock_path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }

    /// Acquire on the blocking pool so the async caller only suspends
    #[cfg(feature = "async-storage")]
    pub(crate) async fn acquire_async(lock_path: PathBuf) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::acquire(&lock_path))
            .await
            .map_err(io::Error::other)?
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        // UFCS: std's inherent `File::unlock` would shadow the fs2 method
        let _ = FileExt::unlock(&self.file);
    }
}
