//! Authentication middleware for JWT token validation

use async_trait::async_trait;
use auth::Claims;
use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    extract::cookie::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use tracing::warn;

use crate::{error::ApiError, session::SESSION_COOKIE, state::AppState};

/// Claims of the caller, taken from the bearer header or the session cookie
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string());

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(SESSION_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(ApiError::unauthorized)?,
        };

        let claims = state.jwt_service.validate_token(&token).map_err(|e| {
            warn!("Rejected token: {}", e);
            ApiError::unauthorized()
        })?;

        Ok(CurrentUser(claims))
    }
}

/// Admin middleware: 401 without a valid token, 403 for non-admin callers
pub async fn require_admin(
    CurrentUser(claims): CurrentUser,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !claims.role.is_admin() {
        warn!("User {} denied admin access", claims.username);
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    req.extensions_mut().insert(CurrentUser(claims));

    Ok(next.run(req).await)
}
