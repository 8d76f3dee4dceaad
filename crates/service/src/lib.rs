//! Service layer for role-based feature grants.
//! - `features` holds the domain model, the repository seam and `FeatureService`.
//! - `storage` provides the reusable JSON file store behind the file backend.
//! - `runtime` wires a repository from configuration at startup.

pub mod errors;
pub mod features;
pub mod runtime;
pub mod storage;
