//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use super::dto::{
    FamilyTreeNode, FamilyTreeQuery, HealthResponse, HorseCreate, HorseDetail, HorseId,
    HorseListResponse, HorseSearch, HorseUpdateRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// Extractors are taken as `Result<_, Rejection>` so malformed requests get the
// JSON error body through `AppError`.
type JsonBody<T> = Result<Json<T>, JsonRejection>;
type IdPath = Result<Path<i64>, PathRejection>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Horse CRUD
// =============================================================================

/// GET /v1/horses?name=&description=&dateOfBirth=&sex=&ownerName=&excludeId=&limit=
///
/// Without query parameters every horse is listed.
pub async fn list_horses(
    State(state): State<AppState>,
    query: Result<Query<HorseSearch>, QueryRejection>,
) -> HandlerResult<HorseListResponse> {
    let Query(search) = query?;
    let horses = services::search_horses(state.repository.as_ref(), &search).await?;
    let total = horses.len();
    Ok(Json(HorseListResponse { horses, total }))
}

/// POST /v1/horses
pub async fn create_horse(
    State(state): State<AppState>,
    body: JsonBody<HorseCreate>,
) -> Result<(StatusCode, Json<HorseDetail>), AppError> {
    let Json(candidate) = body?;
    let detail = services::create_horse(state.repository.as_ref(), candidate).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /v1/horses/{id}
pub async fn get_horse(
    State(state): State<AppState>,
    id: IdPath,
) -> HandlerResult<HorseDetail> {
    let Path(id) = id?;
    let detail = services::get_horse_detail(state.repository.as_ref(), HorseId(id)).await?;
    Ok(Json(detail))
}

/// PUT /v1/horses/{id}
///
/// Replace a horse wholesale. The id in the path wins over any id in the body.
pub async fn update_horse(
    State(state): State<AppState>,
    id: IdPath,
    body: JsonBody<HorseUpdateRequest>,
) -> HandlerResult<HorseDetail> {
    let Path(id) = id?;
    let Json(request) = body?;
    let update = request.into_update(HorseId(id));
    let detail = services::update_horse(state.repository.as_ref(), update).await?;
    Ok(Json(detail))
}

/// DELETE /v1/horses/{id}
pub async fn delete_horse(
    State(state): State<AppState>,
    id: IdPath,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    services::delete_horse(state.repository.as_ref(), HorseId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Pedigree
// =============================================================================

/// GET /v1/horses/{id}/familytree?generations=N
///
/// Ancestry tree rooted at the horse. `generations` defaults to 1 (root only).
pub async fn get_family_tree(
    State(state): State<AppState>,
    id: IdPath,
    query: Result<Query<FamilyTreeQuery>, QueryRejection>,
) -> HandlerResult<FamilyTreeNode> {
    let Path(id) = id?;
    let Query(query) = query?;
    let tree = services::get_family_tree(
        state.repository.as_ref(),
        state.pedigree,
        HorseId(id),
        query.generations,
    )
    .await?;
    Ok(Json(tree))
}
