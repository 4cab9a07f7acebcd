//! Login, logout and current-user handlers

use auth::models::{AuthSession, PublicUser};
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::{WithRejection, cookie::CookieJar};
use serde_json::json;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    middleware::CurrentUser,
    models::user::LoginRequest,
    session::{removal_cookie, session_cookie},
    state::AppState,
};

/// Exchange credentials for a token, also set as the session cookie
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> ApiResult<(CookieJar, Json<AuthSession>)> {
    let (username, password) = payload.validate()?;

    let session = state
        .auth
        .authenticate(&username, &password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid username or password".to_string()))?;
    info!("User {} logged in", session.user.username);

    let jar = jar.add(session_cookie(session.token.clone()));
    Ok((jar, Json(session)))
}

/// Expire the session cookie; tokens are stateless, so nothing else is revoked
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(removal_cookie()),
        Json(json!({ "message": "Logged out successfully" })),
    )
}

pub async fn me(
    State(state): State<AppState>,
    CurrentUser(claims): CurrentUser,
) -> ApiResult<Json<PublicUser>> {
    state
        .auth
        .get_user_by_id(claims.sub)
        .await?
        .map(Json)
        .ok_or_else(ApiError::unauthorized)
}
