//! Async file-backed policy storage
//!
//! Same on-disk format, atomic replace strategy and `<file>.lock` writer
//! lock as [`FilePolicyStorage`](super::FilePolicyStorage), using
//! `tokio::fs` so the calling task suspends instead of blocking its thread.
//! Tasks sharing one instance queue on an async mutex first, so only one of
//! them parks a blocking-pool thread on the file lock.

use super::lock::{sibling, WriterLock};
use super::{
    classify_io_error, decode_policies, validate_policies, AsyncPolicyStorage, PolicyMap,
};
use crate::core::{LogHandler, LogLevel, OutputOptions, StorageError, StorageResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const BACKEND: &str = "async_file";

/// Async policy storage in a single JSON file
///
/// # Example
///
/// ```no_run
/// use policy_engine_logger::storage::{AsyncFilePolicyStorage, AsyncPolicyStorage, PolicyMap};
///
/// # async fn example() -> policy_engine_logger::StorageResult<()> {
/// let storage = AsyncFilePolicyStorage::new("policies.json");
/// let policies = storage.load_policies().await?;
/// storage.save_policies(&policies).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AsyncFilePolicyStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
    logger: Option<LogHandler>,
}

impl AsyncFilePolicyStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            logger: None,
        }
    }

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

    async fn lock(&self) -> std::io::Result<WriterLock> {
        WriterLock::acquire_async(sibling(&self.path, ".lock")).await
    }

    fn report_failure(&self, operation: &str, error: &StorageError) {
        if let Some(logger) = &self.logger {
            logger.output(
                format!("{} failed", operation),
                OutputOptions::new(LogLevel::Error)
                    .error(error)
                    .operation(operation)
                    .field("path", self.path.display().to_string()),
            );
        }
    }

    async fn instrumented<T, F>(&self, operation: &str, body: F) -> StorageResult<T>
    where
        F: std::future::Future<Output = StorageResult<T>>,
    {
        let result = match &self.logger {
            Some(logger) => logger.time_async(operation, body).await,
            None => body.await,
        };
        if let Err(ref e) = result {
            self.report_failure(operation, e);
        }
        result
    }

    async fn read_policies(&self) -> StorageResult<PolicyMap> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => decode_policies(BACKEND, &bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PolicyMap::new()),
            Err(e) => Err(classify_io_error(BACKEND, "reading policies", e)),
        }
    }

    async fn write_policies(&self, policies: &PolicyMap) -> StorageResult<()> {
        validate_policies(policies)?;
        let bytes = serde_json::to_vec_pretty(policies)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| classify_io_error(BACKEND, "creating storage directory", e))?;
        }

        let _guard = self.write_lock.lock().await;
        let _lock = self
            .lock()
            .await
            .map_err(|e| classify_io_error(BACKEND, "locking policy file", e))?;
        let temp_path = self.temp_path();

        let written = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await
        }
        .await;
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(classify_io_error(BACKEND, "writing policies", e));
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(classify_io_error(BACKEND, "replacing policy file", e));
        }
        Ok(())
    }

    async fn remove_policies(&self) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let _lock = match self.lock().await {
            Ok(lock) => lock,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(classify_io_error(BACKEND, "locking policy file", e)),
        };

        for path in [self.temp_path(), self.path.clone()] {
            match tokio::fs::remove_file(&path).await {
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

#[async_trait]
impl AsyncPolicyStorage for AsyncFilePolicyStorage {
    async fn load_policies(&self) -> StorageResult<PolicyMap> {
        self.instrumented("load_policies", self.read_policies()).await
    }

    async fn save_policies(&self, policies: &PolicyMap) -> StorageResult<()> {
        self.instrumented("save_policies", self.write_policies(policies))
            .await
    }

    async fn clear_policies(&self) -> StorageResult<()> {
        self.instrumented("clear_policies", self.remove_policies())
            .await
    }

    fn name(&self) -> &str {
        BACKEND
    }
}
