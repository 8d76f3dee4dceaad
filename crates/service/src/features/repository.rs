use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::features::domain::{Feature, FeatureMap};
use crate::storage::json_file_store::JsonFileStore;

/// Storage seam for role → feature grants.
///
/// Each mutating call is a single critical section: implementations must not
/// let two writers interleave on the same map.
#[async_trait]
pub trait FeatureRepository: Send + Sync {
    async fn features_for_role(&self, role: &str) -> Result<Vec<Feature>, ServiceError>;
    async fn categories(&self) -> Result<Vec<String>, ServiceError>;
    async fn features_by_category(&self, category: &str) -> Result<Vec<Feature>, ServiceError>;
    async fn insert_feature(&self, role: &str, feature: Feature) -> Result<bool, ServiceError>;
    async fn add_feature_ids(&self, role: &str, ids: &[String]) -> Result<usize, ServiceError>;
    async fn remove_feature_ids(&self, role: &str, ids: &[String]) -> Result<usize, ServiceError>;
    async fn snapshot(&self) -> Result<FeatureMap, ServiceError>;
    /// Install `seed` only if no role has been written yet.
    async fn seed_if_empty(&self, seed: FeatureMap) -> Result<bool, ServiceError>;
}

/// Process-memory repository; state resets on restart.
#[derive(Default)]
pub struct InMemoryFeatureRepository {
    inner: RwLock<FeatureMap>,
}

impl InMemoryFeatureRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl FeatureRepository for InMemoryFeatureRepository {
    async fn features_for_role(&self, role: &str) -> Result<Vec<Feature>, ServiceError> {
        Ok(self.inner.read().await.features_for(role).to_vec())
    }

    async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.inner.read().await.categories())
    }

    async fn features_by_category(&self, category: &str) -> Result<Vec<Feature>, ServiceError> {
        Ok(self.inner.read().await.features_by_category(category))
    }

    async fn insert_feature(&self, role: &str, feature: Feature) -> Result<bool, ServiceError> {
        Ok(self.inner.write().await.insert_feature(role, feature))
    }

    async fn add_feature_ids(&self, role: &str, ids: &[String]) -> Result<usize, ServiceError> {
        Ok(self.inner.write().await.add_feature_ids(role, ids))
    }

    async fn remove_feature_ids(&self, role: &str, ids: &[String]) -> Result<usize, ServiceError> {
        Ok(self.inner.write().await.remove_feature_ids(role, ids))
    }

    async fn snapshot(&self) -> Result<FeatureMap, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn seed_if_empty(&self, seed: FeatureMap) -> Result<bool, ServiceError> {
        let mut map = self.inner.write().await;
        if !map.is_empty() {
            return Ok(false);
        }
        *map = seed;
        Ok(true)
    }
}

/// Repository persisted as a JSON role array, rewritten after every mutation.
pub struct JsonFileFeatureRepository {
    store: JsonFileStore<FeatureMap>,
}

impl JsonFileFeatureRepository {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, ServiceError> {
        Ok(Self { store: JsonFileStore::open(path).await? })
    }
}

#[async_trait]
impl FeatureRepository for JsonFileFeatureRepository {
    async fn features_for_role(&self, role: &str) -> Result<Vec<Feature>, ServiceError> {
        Ok(self.store.read(|m| m.features_for(role).to_vec()).await)
    }

    async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.store.read(FeatureMap::categories).await)
    }

    async fn features_by_category(&self, category: &str) -> Result<Vec<Feature>, ServiceError> {
        Ok(self.store.read(|m| m.features_by_category(category)).await)
    }

    async fn insert_feature(&self, role: &str, feature: Feature) -> Result<bool, ServiceError> {
        self.store.update(|m| m.insert_feature(role, feature)).await
    }

    async fn add_feature_ids(&self, role: &str, ids: &[String]) -> Result<usize, ServiceError> {
        self.store.update(|m| m.add_feature_ids(role, ids)).await
    }

    async fn remove_feature_ids(&self, role: &str, ids: &[String]) -> Result<usize, ServiceError> {
        self.store.update(|m| m.remove_feature_ids(role, ids)).await
    }

    async fn snapshot(&self) -> Result<FeatureMap, ServiceError> {
        Ok(self.store.read(FeatureMap::clone).await)
    }

    async fn seed_if_empty(&self, seed: FeatureMap) -> Result<bool, ServiceError> {
        self.store
            .update(|m| {
                if m.is_empty() {
                    *m = seed;
                    true
                } else {
                    false
                }
            })
            .await
    }
}
