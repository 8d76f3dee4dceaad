//! Runtime wiring
//!
//! Builds the feature service selected by `configs::StoreConfig` so binaries
//! and tests start from the same code path.

use std::sync::Arc;

use configs::{StoreBackend, StoreConfig};
use tracing::info;

use crate::errors::ServiceError;
use crate::features::{
    FeatureMap, FeatureRepository, FeatureService, InMemoryFeatureRepository, JsonFileFeatureRepository,
};

/// Open the configured repository.
pub async fn build_repository(cfg: &StoreConfig) -> Result<Arc<dyn FeatureRepository>, ServiceError> {
    let repo: Arc<dyn FeatureRepository> = match cfg.backend {
        StoreBackend::Memory => Arc::new(InMemoryFeatureRepository::new()),
        StoreBackend::File => Arc::new(JsonFileFeatureRepository::open(&cfg.path).await?),
    };
    info!(backend = ?cfg.backend, path = %cfg.path, "feature repository ready");
    Ok(repo)
}

/// Read a seed document (`[{role, features}]`).
pub async fn load_seed(path: &str) -> Result<FeatureMap, ServiceError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ServiceError::Storage(format!("cannot read seed {path}: {e}")))?;
    let entries = serde_json::from_slice(&bytes)
        .map_err(|e| ServiceError::Storage(format!("invalid seed {path}: {e}")))?;
    Ok(FeatureMap::from_roles(entries))
}

/// Repository plus optional seed, wrapped in the service handlers use.
pub async fn build_feature_service(cfg: &StoreConfig) -> Result<FeatureService, ServiceError> {
    let service = FeatureService::new(build_repository(cfg).await?);
    if let Some(seed_path) = cfg.seed_path.as_deref() {
        let seed = load_seed(seed_path).await?;
        service.seed(seed).await?;
    }
    Ok(service)
}
