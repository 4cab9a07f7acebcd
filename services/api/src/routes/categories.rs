//! Category handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    models::category::{Category, CreateCategoryRequest, UpdateCategoryRequest},
    state::AppState,
};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.list().await?))
}

pub async fn find(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<Category>> {
    state
        .categories
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category"))
}

pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateCategoryRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let category = payload.validate()?;
    let id = state.categories.create(category).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Category created successfully",
            "categoryId": id,
        })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateCategoryRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let changes = payload.validate()?;

    if !state.categories.update(id, changes).await? {
        return Err(ApiError::not_found("Category"));
    }

    Ok(Json(json!({ "message": "Category updated successfully" })))
}

/// Delete a category; its photos become uncategorized
pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    if !state.categories.delete(id).await? {
        return Err(ApiError::not_found("Category"));
    }

    Ok(Json(json!({ "message": "Category deleted successfully" })))
}
