use std::sync::Arc;

use tracing::{info, instrument};

use crate::errors::ServiceError;
use crate::features::domain::{Feature, FeatureDraft, FeatureMap};
use crate::features::repository::FeatureRepository;

pub const MISSING_ROLE: &str = "Missing role parameter";
pub const MISSING_CATEGORY: &str = "Missing category";
pub const MISSING_FEATURE_DATA: &str = "Missing role or feature data";
pub const MISSING_FEATURE_IDS: &str = "Missing role or featureIds";
pub const NO_CATEGORIES: &str = "No categories found";

/// Result of a create call. `feature` is always the submitted descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateOutcome {
    pub feature: Feature,
    pub inserted: bool,
}

/// Application service for role → feature grants.
/// Owns request validation and the empty-result policies; storage is delegated.
#[derive(Clone)]
pub struct FeatureService {
    repo: Arc<dyn FeatureRepository>,
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ServiceError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(message.to_string())),
    }
}

impl FeatureService {
    pub fn new(repo: Arc<dyn FeatureRepository>) -> Self { Self { repo } }

    pub async fn features_for_role(&self, role: Option<&str>) -> Result<Vec<Feature>, ServiceError> {
        let role = required(role, MISSING_ROLE)?;
        self.repo.features_for_role(role).await
    }

    /// Distinct categories; an empty store of categories is `NotFound`.
    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        let categories = self.repo.categories().await?;
        if categories.is_empty() {
            return Err(ServiceError::NotFound(NO_CATEGORIES.to_string()));
        }
        Ok(categories)
    }

    /// Features in `category`; an empty result is a success.
    pub async fn features_by_category(&self, category: Option<&str>) -> Result<Vec<Feature>, ServiceError> {
        let category = required(category, MISSING_CATEGORY)?;
        self.repo.features_by_category(category).await
    }

    #[instrument(skip(self, draft))]
    pub async fn create_feature(
        &self,
        role: Option<&str>,
        draft: Option<FeatureDraft>,
    ) -> Result<CreateOutcome, ServiceError> {
        let role = required(role, MISSING_FEATURE_DATA)?;
        let feature = draft
            .and_then(FeatureDraft::into_feature)
            .ok_or_else(|| ServiceError::Validation(MISSING_FEATURE_DATA.to_string()))?;
        let inserted = self.repo.insert_feature(role, feature.clone()).await?;
        info!(feature_id = %feature.id, inserted, "create feature");
        Ok(CreateOutcome { feature, inserted })
    }

    #[instrument(skip(self, ids))]
    pub async fn add_feature_ids(&self, role: Option<&str>, ids: Option<&[String]>) -> Result<usize, ServiceError> {
        let (role, ids) = Self::bulk_args(role, ids)?;
        let added = self.repo.add_feature_ids(role, ids).await?;
        info!(requested = ids.len(), added, "bulk add features");
        Ok(added)
    }

    #[instrument(skip(self, ids))]
    pub async fn remove_feature_ids(&self, role: Option<&str>, ids: Option<&[String]>) -> Result<usize, ServiceError> {
        let (role, ids) = Self::bulk_args(role, ids)?;
        let removed = self.repo.remove_feature_ids(role, ids).await?;
        info!(requested = ids.len(), removed, "bulk remove features");
        Ok(removed)
    }

    pub async fn snapshot(&self) -> Result<FeatureMap, ServiceError> {
        self.repo.snapshot().await
    }

    pub async fn seed(&self, seed: FeatureMap) -> Result<bool, ServiceError> {
        let roles = seed.roles().len();
        let applied = self.repo.seed_if_empty(seed).await?;
        info!(roles, applied, "seed feature grants");
        Ok(applied)
    }

    fn bulk_args<'a>(
        role: Option<&'a str>,
        ids: Option<&'a [String]>,
    ) -> Result<(&'a str, &'a [String]), ServiceError> {
        let role = required(role, MISSING_FEATURE_IDS)?;
        let ids = ids.ok_or_else(|| ServiceError::Validation(MISSING_FEATURE_IDS.to_string()))?;
        Ok((role, ids))
    }
}
