//! Role → feature grants: domain model, storage seam and business rules.

pub mod domain;
pub mod repository;
pub mod service;

pub use domain::{Feature, FeatureDraft, FeatureMap, RoleFeatures};
pub use repository::{FeatureRepository, InMemoryFeatureRepository, JsonFileFeatureRepository};
pub use service::FeatureService;
