use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use common::metrics::record_request;
use serde::{Deserialize, Serialize};
use service::features::{Feature, FeatureDraft, RoleFeatures};
use tracing::debug;
use utoipa::IntoParams;

use crate::errors::ApiError;
use crate::state::ServerState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoleQuery {
    /// Role whose grants to list
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CategoryQuery {
    /// Exact, case-sensitive category name
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateFeatureRequest {
    pub role: Option<String>,
    pub feature: Option<FeatureDraft>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureIdsRequest {
    pub role: Option<String>,
    pub feature_ids: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CreateFeatureResponse {
    pub success: bool,
    pub feature: Feature,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Count the request and pass the result through.
fn recorded<T, E>(op: &str, result: Result<T, E>) -> Result<T, E> {
    record_request(op, result.is_ok());
    result
}

// A body or query that fails to parse is treated as one with every field missing,
// so clients get the endpoint's validation message instead of a bare rejection.
fn body_or_default<T: Default>(op: &str, payload: Result<Json<T>, JsonRejection>) -> T {
    payload.map(|Json(p)| p).unwrap_or_else(|rejection| {
        debug!(op = op, %rejection, "unreadable request body");
        T::default()
    })
}

#[utoipa::path(
    get, path = "/api/features", tag = "features",
    params(RoleQuery),
    responses(
        (status = 200, description = "Features granted to the role", body = [crate::openapi::FeatureDoc]),
        (status = 400, description = "Missing role parameter", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_by_role(
    State(state): State<ServerState>,
    query: Result<Query<RoleQuery>, QueryRejection>,
) -> Result<Json<Vec<Feature>>, ApiError> {
    let role = query.ok().and_then(|Query(q)| q.role);
    let features = recorded("list_by_role", state.features.features_for_role(role.as_deref()).await)?;
    Ok(Json(features))
}

#[utoipa::path(
    get, path = "/api/features/categories", tag = "features",
    responses(
        (status = 200, description = "Distinct categories", body = [String]),
        (status = 404, description = "No categories found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_categories(State(state): State<ServerState>) -> Result<Json<Vec<String>>, ApiError> {
    let categories = recorded("list_categories", state.features.categories().await)?;
    Ok(Json(categories))
}

#[utoipa::path(
    get, path = "/api/features/category", tag = "features",
    params(CategoryQuery),
    responses(
        (status = 200, description = "Features in the category, possibly empty", body = [crate::openapi::FeatureDoc]),
        (status = 400, description = "Missing category", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list_by_category(
    State(state): State<ServerState>,
    query: Result<Query<CategoryQuery>, QueryRejection>,
) -> Result<Json<Vec<Feature>>, ApiError> {
    let name = query.ok().and_then(|Query(q)| q.name);
    let features = recorded("list_by_category", state.features.features_by_category(name.as_deref()).await)?;
    Ok(Json(features))
}

#[utoipa::path(
    post, path = "/api/features", tag = "features",
    request_body = crate::openapi::CreateFeatureRequestDoc,
    responses(
        (status = 200, description = "Feature granted, or already present", body = crate::openapi::CreateFeatureResponseDoc),
        (status = 400, description = "Missing role or feature data", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateFeatureRequest>, JsonRejection>,
) -> Result<Json<CreateFeatureResponse>, ApiError> {
    let req = body_or_default("create", payload);
    let outcome = recorded("create", state.features.create_feature(req.role.as_deref(), req.feature).await)?;
    Ok(Json(CreateFeatureResponse { success: true, feature: outcome.feature }))
}

#[utoipa::path(
    post, path = "/api/features/bulk-add", tag = "features",
    request_body = crate::openapi::FeatureIdsRequestDoc,
    responses(
        (status = 200, description = "Missing ids granted", body = crate::openapi::SuccessDoc),
        (status = 400, description = "Missing role or featureIds", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn bulk_add(
    State(state): State<ServerState>,
    payload: Result<Json<FeatureIdsRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let req = body_or_default("bulk_add", payload);
    recorded(
        "bulk_add",
        state.features.add_feature_ids(req.role.as_deref(), req.feature_ids.as_deref()).await,
    )?;
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    delete, path = "/api/features/bulk-remove", tag = "features",
    request_body = crate::openapi::FeatureIdsRequestDoc,
    responses(
        (status = 200, description = "Listed ids revoked", body = crate::openapi::SuccessDoc),
        (status = 400, description = "Missing role or featureIds", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn bulk_remove(
    State(state): State<ServerState>,
    payload: Result<Json<FeatureIdsRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let req = body_or_default("bulk_remove", payload);
    recorded(
        "bulk_remove",
        state.features.remove_feature_ids(req.role.as_deref(), req.feature_ids.as_deref()).await,
    )?;
    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    get, path = "/api/roles", tag = "features",
    responses((status = 200, description = "Every role with its grants, in first-write order", body = [crate::openapi::RoleFeaturesDoc]))
)]
pub async fn list_roles(State(state): State<ServerState>) -> Result<Json<Vec<RoleFeatures>>, ApiError> {
    let snapshot = recorded("list_roles", state.features.snapshot().await)?;
    Ok(Json(snapshot.roles().to_vec()))
}
