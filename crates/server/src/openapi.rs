use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc { pub error: String }

#[derive(ToSchema)]
pub struct SuccessDoc { pub success: bool }

#[derive(ToSchema)]
pub struct FeatureDoc {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
}

#[derive(ToSchema)]
pub struct RoleFeaturesDoc {
    pub role: String,
    pub features: Vec<FeatureDoc>,
}

#[derive(ToSchema)]
pub struct CreateFeatureRequestDoc {
    pub role: String,
    pub feature: FeatureDoc,
}

#[derive(ToSchema)]
pub struct CreateFeatureResponseDoc {
    pub success: bool,
    pub feature: FeatureDoc,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct FeatureIdsRequestDoc {
    pub role: String,
    pub feature_ids: Vec<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::features::list_by_role,
        crate::routes::features::list_categories,
        crate::routes::features::list_by_category,
        crate::routes::features::create,
        crate::routes::features::bulk_add,
        crate::routes::features::bulk_remove,
        crate::routes::features::list_roles,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            SuccessDoc,
            FeatureDoc,
            RoleFeaturesDoc,
            CreateFeatureRequestDoc,
            CreateFeatureResponseDoc,
            FeatureIdsRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "features")
    )
)]
pub struct ApiDoc;
