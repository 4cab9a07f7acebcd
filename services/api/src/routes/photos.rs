//! Photo handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::{
    error::{ApiError, ApiResult},
    models::photo::{CreatePhotoRequest, Photo, PhotoQuery, UpdatePhotoRequest},
    state::AppState,
};

/// Get all photos, optionally restricted to one category
pub async fn list(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<PhotoQuery>, ApiError>,
) -> ApiResult<Json<Vec<Photo>>> {
    Ok(Json(state.photos.list(query.category_id).await?))
}

/// Get a photo by ID
pub async fn find(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<Photo>> {
    state
        .photos
        .find(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Photo"))
}

pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreatePhotoRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let photo = payload.validate()?;
    let id = state.photos.create(photo).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Photo created successfully",
            "photoId": id,
        })),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdatePhotoRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let changes = payload.validate()?;

    if !state.photos.update(id, changes).await? {
        return Err(ApiError::not_found("Photo"));
    }

    Ok(Json(json!({ "message": "Photo updated successfully" })))
}

pub async fn delete(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    if !state.photos.delete(id).await? {
        return Err(ApiError::not_found("Photo"));
    }

    Ok(Json(json!({ "message": "Photo deleted successfully" })))
}
