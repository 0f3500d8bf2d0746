//! Policy storage contract
//!
//! Callers depend on [`PolicyStorage`] (or [`AsyncPolicyStorage`]) only; the
//! backend decides where policies live. A [`PolicyMap`] maps a policy
//! identifier to an opaque JSON configuration value that backends store and
//! return unmodified.
//!
//! Contract shared by every backend:
//!
//! - `load_policies` returns an empty map when nothing is stored
//! - `save_policies` replaces the whole stored set (no merge)
//! - `clear_policies` is safe to call on an empty store
//! - failures are always returned as [`StorageError`], never swallowed

use crate::core::{StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

pub mod memory;

#[cfg(feature = "file")]
pub mod file;

#[cfg(feature = "async-storage")]
pub mod async_file;

#[cfg(any(feature = "file", feature = "async-storage"))]
mod lock;

pub use memory::InMemoryPolicyStorage;

#[cfg(feature = "file")]
pub use file::FilePolicyStorage;

#[cfg(feature = "async-storage")]
pub use async_file::AsyncFilePolicyStorage;

/// Policy identifier to policy configuration
pub type PolicyMap = BTreeMap<String, serde_json::Value>;

pub trait PolicyStorage: Send + Sync {
    /// Load every stored policy
    fn load_policies(&self) -> StorageResult<PolicyMap>;

    /// Replace the stored policy set with `policies`
    fn save_policies(&self, policies: &PolicyMap) -> StorageResult<()>;

    /// Delete all stored policy data
    fn clear_policies(&self) -> StorageResult<()>;

    fn name(&self) -> &str;
}

impl<T: PolicyStorage + ?Sized> PolicyStorage for Arc<T> {
    fn load_policies(&self) -> StorageResult<PolicyMap> {
        (**self).load_policies()
    }

    fn save_policies(&self, policies: &PolicyMap) -> StorageResult<()> {
        (**self).save_policies(policies)
    }

    fn clear_policies(&self) -> StorageResult<()> {
        (**self).clear_policies()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: PolicyStorage + ?Sized> PolicyStorage for Box<T> {
    fn load_policies(&self) -> StorageResult<PolicyMap> {
        (**self).load_policies()
    }

    fn save_policies(&self, policies: &PolicyMap) -> StorageResult<()> {
        (**self).save_policies(policies)
    }

    fn clear_policies(&self) -> StorageResult<()> {
        (**self).clear_policies()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Asynchronous form of [`PolicyStorage`]
///
/// # Example
///
/// ```no_run
/// use policy_engine_logger::storage::{AsyncPolicyStorage, PolicyMap};
/// use policy_engine_logger::StorageResult;
/// use async_trait::async_trait;
///
/// struct RemoteStorage;
///
/// #[async_trait]
/// impl AsyncPolicyStorage for RemoteStorage {
///     async fn load_policies(&self) -> StorageResult<PolicyMap> {
///         Ok(PolicyMap::new())
///     }
///
///     async fn save_policies(&self, _policies: &PolicyMap) -> StorageResult<()> {
///         Ok(())
///     }
///
///     async fn clear_policies(&self) -> StorageResult<()> {
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "remote"
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncPolicyStorage: Send + Sync {
    async fn load_policies(&self) -> StorageResult<PolicyMap>;

    async fn save_policies(&self, policies: &PolicyMap) -> StorageResult<()>;

    async fn clear_policies(&self) -> StorageResult<()>;

    fn name(&self) -> &str;
}

/// Reject identifiers that are empty or contain control characters
///
/// Runs before anything is written so a rejected save leaves the store as
/// it was.
pub fn validate_policies(policies: &PolicyMap) -> StorageResult<()> {
    for policy_id in policies.keys() {
        if policy_id.trim().is_empty() {
            return Err(StorageError::validation(
                policy_id.clone(),
                "identifier must not be empty",
            ));
        }
        if policy_id.chars().any(char::is_control) {
            return Err(StorageError::validation(
                policy_id.clone(),
                "identifier must not contain control characters",
            ));
        }
    }
    Ok(())
}

/// Map an I/O failure onto the storage taxonomy
#[cfg_attr(
    not(any(feature = "file", feature = "async-storage")),
    allow(dead_code)
)]
pub(crate) fn classify_io_error(
    backend: &str,
    operation: &str,
    error: std::io::Error,
) -> StorageError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::PermissionDenied => StorageError::not_writable(
            backend,
            format!("{} failed: {}", operation, error),
        ),
        ErrorKind::NotFound => StorageError::unavailable(
            backend,
            format!("{} failed: {}", operation, error),
        ),
        _ => StorageError::io(operation, error),
    }
}

/// Decode an on-disk document, mapping parse failures to `Corrupted`
#[cfg_attr(
    not(any(feature = "file", feature = "async-storage")),
    allow(dead_code)
)]
pub(crate) fn decode_policies(backend: &str, bytes: &[u8]) -> StorageResult<PolicyMap> {
    serde_json::from_slice(bytes).map_err(|e| StorageError::corrupted(backend, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_accepts_regular_ids() {
        let mut policies = PolicyMap::new();
        policies.insert("session.timeout".to_string(), json!({"minutes": 30}));
        assert!(validate_policies(&policies).is_ok());
    }

    #[test]
    fn test_validation_rejects_blank_id() {
        let mut policies = PolicyMap::new();
        policies.insert("  ".to_string(), json!(true));
        assert!(matches!(
            validate_policies(&policies),
            Err(StorageError::Validation { .. })
        ));
    }

    #[test]
    fn test_validation_rejects_control_chars() {
        let mut policies = PolicyMap::new();
        policies.insert("bad\nid".to_string(), json!(1));
        assert!(validate_policies(&policies).is_err());
    }

    #[test]
    fn test_decode_reports_corruption() {
        assert!(matches!(
            decode_policies("file", b"{not json"),
            Err(StorageError::Corrupted { .. })
        ));
        assert!(matches!(
            decode_policies("file", b"[1, 2]"),
            Err(StorageError::Corrupted { .. })
        ));
    }

    #[test]
    fn test_classify_permission_denied() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(
            classify_io_error("file", "writing", err),
            StorageError::NotWritable { .. }
        ));
    }

    #[test]
    fn test_shared_storage_through_arc() {
        let storage: Arc<dyn PolicyStorage> = Arc::new(InMemoryPolicyStorage::new());
        let mut policies = PolicyMap::new();
        policies.insert("a".to_string(), json!(1));

        storage.save_policies(&policies).unwrap();
        assert_eq!(storage.load_policies().unwrap(), policies);
    }
}
