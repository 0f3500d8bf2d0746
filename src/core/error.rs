//! Error types for logging and policy storage

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Result type returned by policy storage backends
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Failures raised by appenders while writing a record
///
/// These never reach application code: the handler reports and counts them.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("cannot open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failure reported by a custom appender
    #[error("appender '{appender}' failed: {message}")]
    Appender { appender: String, message: String },
}

impl LoggerError {
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoggerError::Open {
            path: path.into(),
            source,
        }
    }

    pub fn appender(appender: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Appender {
            appender: appender.into(),
            message: message.into(),
        }
    }
}

/// Failures surfaced by a [`PolicyStorage`](crate::storage::PolicyStorage) backend
///
/// Storage errors are always returned to the caller.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Backend cannot be reached or opened
    #[error("Policy storage '{backend}' is unavailable: {message}")]
    Unavailable { backend: String, message: String },

    /// Stored data exists but cannot be parsed
    #[error("Policy storage '{backend}' is corrupted: {message}")]
    Corrupted { backend: String, message: String },

    /// Backend refused the write
    #[error("Policy storage '{backend}' is not writable: {message}")]
    NotWritable { backend: String, message: String },

    /// Payload rejected before anything was written
    #[error("Invalid policy '{policy_id}': {message}")]
    Validation { policy_id: String, message: String },

    /// IO error with context
    #[error("IO error while {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn unavailable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Unavailable {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn corrupted(backend: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Corrupted {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn not_writable(backend: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::NotWritable {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub fn validation(policy_id: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Validation {
            policy_id: policy_id.into(),
            message: message.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        StorageError::Io {
            operation: operation.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appender_error_display() {
        let err = LoggerError::appender("remote", "socket closed");
        assert_eq!(err.to_string(), "appender 'remote' failed: socket closed");
    }

    #[test]
    fn test_open_error_names_path() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::open("/var/log/policy.log", io_err);

        assert!(err.to_string().starts_with("cannot open log file /var/log/policy.log"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::corrupted("file", "expected object");
        assert_eq!(
            err.to_string(),
            "Policy storage 'file' is corrupted: expected object"
        );

        let err = StorageError::validation("", "identifier must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid policy '': identifier must not be empty"
        );
    }

    #[test]
    fn test_storage_io_error_keeps_source() {
        use std::error::Error as _;

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = StorageError::io("reading policies", io_err);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("reading policies"));
    }

    #[test]
    fn test_errors_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LoggerError>();
        assert_send_sync::<StorageError>();
    }
}
