//! User management handlers (admin only)

use auth::models::{BOOTSTRAP_ADMIN_ID, PublicUser, Role};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
    models::user::{CreateUserRequest, UpdateUserRequest},
    state::AppState,
};

/// Get all users
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicUser>>> {
    Ok(Json(state.users.list().await?))
}

/// Get a user by ID
pub async fn find(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<Json<PublicUser>> {
    state
        .auth
        .get_user_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User"))
}

/// Create a new user
pub async fn create(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUserRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let new_user = payload.validate()?;
    let user = state.auth.register(new_user).await?;
    info!("Created user {} with id {}", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "userId": user.id,
        })),
    ))
}

/// Update a user; the main admin keeps its role
pub async fn update(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
    WithRejection(Json(payload), _): WithRejection<Json<UpdateUserRequest>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    let changes = payload.validate()?;

    if id == BOOTSTRAP_ADMIN_ID && changes.role.is_some_and(|role| role != Role::Admin) {
        return Err(ApiError::Forbidden(
            "Cannot change the role of the main admin user".to_string(),
        ));
    }

    state
        .users
        .update(id, changes)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))?;

    Ok(Json(json!({ "message": "User updated successfully" })))
}

/// Delete a user; the main admin can never be deleted
pub async fn delete(
    State(state): State<AppState>,
    Extension(CurrentUser(actor)): Extension<CurrentUser>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> ApiResult<impl IntoResponse> {
    if id == BOOTSTRAP_ADMIN_ID {
        return Err(ApiError::Forbidden(
            "Cannot delete the main admin user".to_string(),
        ));
    }

    if !state.users.delete(id).await? {
        return Err(ApiError::not_found("User"));
    }
    info!("User {} deleted by {}", id, actor.username);

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
