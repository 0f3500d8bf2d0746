//! File-backed policy storage
//!
//! Policies are kept as one JSON object on disk. Saves write a sibling
//! `.tmp` file, fsync it and rename it over the target, so readers only ever
//! see the old or the new document. Writers serialise on an advisory
//! exclusive lock held on a sibling `.lock` file.

use super::lock::{sibling, WriterLock};
use super::{
    classify_io_error, decode_policies, validate_policies, PolicyMap, PolicyStorage,
};
use crate::core::{LogHandler, LogLevel, OutputOptions, StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const BACKEND: &str = "file";

/// Policy storage in a single JSON file
///
/// # Example
///
/// ```no_run
/// use policy_engine_logger::prelude::*;
/// use serde_json::json;
///
/// # fn main() -> StorageResult<()> {
/// let storage = FilePolicyStorage::new("/var/lib/app/policies.json")
///     .with_logger(LogHandler::global().clone());
///
/// let mut policies = PolicyMap::new();
/// policies.insert("session.timeout".to_string(), json!({"minutes": 30}));
/// storage.save_policies(&policies)?;
///
/// assert_eq!(storage.load_policies()?, policies);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FilePolicyStorage {
    path: PathBuf,
    logger: Option<LogHandler>,
}

impl FilePolicyStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            logger: None,
        }
    }

    /// Report timings and failures of each operation to `handler`
    #[must_use]
    pub fn with_logger(mut self, handler: LogHandler) -> Self {
        self.logger = Some(handler);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        sibling(&self.path, ".tmp")
    }

    fn lock_path(&self) -> PathBuf {
        sibling(&self.path, ".lock")
    }

    fn lock(&self) -> std::io::Result<WriterLock> {
        WriterLock::acquire(&self.lock_path())
    }

    fn instrumented<T>(
        &self,
        operation: &str,
        body: impl FnOnce() -> StorageResult<T>,
    ) -> StorageResult<T> {
        let Some(logger) = &self.logger else {
            return body();
        };

        let result = logger.time(operation, body);
        if let Err(ref e) = result {
            logger.output(
                format!("{} failed", operation),
                OutputOptions::new(LogLevel::Error)
                    .error(e)
                    .operation(operation)
                    .field("path", self.path.display().to_string()),
            );
        }
        result
    }

    fn read_policies(&self) -> StorageResult<PolicyMap> {
        match fs::read(&self.path) {
            Ok(bytes) => decode_policies(BACKEND, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PolicyMap::new()),
            Err(e) => Err(classify_io_error(BACKEND, "reading policies", e)),
        }
    }

    fn write_policies(&self, policies: &PolicyMap) -> StorageResult<()> {
        validate_policies(policies)?;
        let bytes = serde_json::to_vec_pretty(policies)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| classify_io_error(BACKEND, "creating storage directory", e))?;
        }

        let _lock = self
            .lock()
            .map_err(|e| classify_io_error(BACKEND, "locking policy file", e))?;

        let temp_path = self.temp_path();
        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(classify_io_error(BACKEND, "writing policies", e));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            classify_io_error(BACKEND, "replacing policy file", e)
        })
    }

    fn remove_policies(&self) -> StorageResult<()> {
        let _lock = match self.lock() {
            Ok(lock) => lock,
            // No directory means nothing was ever stored
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(classify_io_error(BACKEND, "locking policy file", e)),
        };

        for path in [self.temp_path(), self.path.clone()] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StorageError::not_writable(
                        BACKEND,
                        format!("removing {} failed: {}", path.display(), e),
                    ))
                }
            }
        }
        Ok(())
    }
}

impl PolicyStorage for FilePolicyStorage {
    fn load_policies(&self) -> StorageResult<PolicyMap> {
        self.instrumented("load_policies", || self.read_policies())
    }

    fn save_policies(&self, policies: &PolicyMap) -> StorageResult<()> {
        self.instrumented("save_policies", || self.write_policies(policies))
    }

    fn clear_policies(&self) -> StorageResult<()> {
        self.instrumented("clear_policies", || self.remove_policies())
    }

    fn name(&self) -> &str {
        BACKEND
    }
}
