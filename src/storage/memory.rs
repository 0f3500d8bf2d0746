//! In-memory policy storage
//!
//! Nothing survives the process. Useful for tests and for sessions where
//! policies are fetched fresh on every launch.

use super::{validate_policies, AsyncPolicyStorage, PolicyMap, PolicyStorage};
use crate::core::StorageResult;
use async_trait::async_trait;
use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryPolicyStorage {
    policies: RwLock<PolicyMap>,
}

impl InMemoryPolicyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `policies` already stored
    pub fn with_policies(policies: PolicyMap) -> StorageResult<Self> {
        validate_policies(&policies)?;
        Ok(Self {
            policies: RwLock::new(policies),
        })
    }
}

impl PolicyStorage for InMemoryPolicyStorage {
    fn load_policies(&self) -> StorageResult<PolicyMap> {
        Ok(self.policies.read().clone())
    }

    fn save_policies(&self, policies: &PolicyMap) -> StorageResult<()> {
        validate_policies(policies)?;
        *self.policies.write() = policies.clone();
        Ok(())
    }

    fn clear_policies(&self) -> StorageResult<()> {
        self.policies.write().clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl AsyncPolicyStorage for InMemoryPolicyStorage {
    async fn load_policies(&self) -> StorageResult<PolicyMap> {
        PolicyStorage::load_policies(self)
    }

    async fn save_policies(&self, policies: &PolicyMap) -> StorageResult<()> {
        PolicyStorage::save_policies(self, policies)
    }

    async fn clear_policies(&self) -> StorageResult<()> {
        PolicyStorage::clear_policies(self)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StorageError;
    use serde_json::json;

    fn sample() -> PolicyMap {
        let mut policies = PolicyMap::new();
        policies.insert("password.min_length".to_string(), json!(12));
        policies.insert(
            "feature.flags".to_string(),
            json!({"beta": true, "regions": ["eu", "us"]}),
        );
        policies
    }

    #[test]
    fn test_empty_store_loads_empty_map() {
        let storage = InMemoryPolicyStorage::new();
        assert!(PolicyStorage::load_policies(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_save_overwrites_instead_of_merging() {
        let storage = InMemoryPolicyStorage::with_policies(sample()).unwrap();

        let mut replacement = PolicyMap::new();
        replacement.insert("only".to_string(), json!("one"));
        PolicyStorage::save_policies(&storage, &replacement).unwrap();

        assert_eq!(PolicyStorage::load_policies(&storage).unwrap(), replacement);
    }

    #[test]
    fn test_rejected_save_keeps_previous_state() {
        let storage = InMemoryPolicyStorage::with_policies(sample()).unwrap();

        let mut bad = PolicyMap::new();
        bad.insert(String::new(), json!(null));
        let err = PolicyStorage::save_policies(&storage, &bad).unwrap_err();

        assert!(matches!(err, StorageError::Validation { .. }));
        assert_eq!(PolicyStorage::load_policies(&storage).unwrap(), sample());
    }

    #[test]
    fn test_clear_twice() {
        let storage = InMemoryPolicyStorage::with_policies(sample()).unwrap();
        PolicyStorage::clear_policies(&storage).unwrap();
        PolicyStorage::clear_policies(&storage).unwrap();
        assert!(PolicyStorage::load_policies(&storage).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_contract() {
        let storage = InMemoryPolicyStorage::new();
        AsyncPolicyStorage::save_policies(&storage, &sample()).await.unwrap();
        assert_eq!(AsyncPolicyStorage::load_policies(&storage).await.unwrap(), sample());

        AsyncPolicyStorage::clear_policies(&storage).await.unwrap();
        assert!(AsyncPolicyStorage::load_policies(&storage).await.unwrap().is_empty());
    }
}
