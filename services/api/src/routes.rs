//! API service routes
//!
//! Reads of photos and categories are public. Every user route and every
//! photo or category mutation sits behind [`require_admin`].

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;

use crate::{middleware::require_admin, state::AppState};

mod account;
mod categories;
mod photos;
mod users;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let admin = middleware::from_fn_with_state(state.clone(), require_admin);

    let user_routes = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:id",
            get(users::find).put(users::update).delete(users::delete),
        )
        .route_layer(admin.clone());

    let api = Router::new()
        .route("/auth/login", post(account::login))
        .route("/auth/logout", post(account::logout))
        .route("/auth/me", get(account::me))
        .route(
            "/photos",
            get(photos::list).merge(post(photos::create).route_layer(admin.clone())),
        )
        .route(
            "/photos/:id",
            get(photos::find).merge(
                put(photos::update)
                    .delete(photos::delete)
                    .route_layer(admin.clone()),
            ),
        )
        .route(
            "/categories",
            get(categories::list).merge(post(categories::create).route_layer(admin.clone())),
        )
        .route(
            "/categories/:id",
            get(categories::find).merge(
                put(categories::update)
                    .delete(categories::delete)
                    .route_layer(admin),
            ),
        )
        .merge(user_routes);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let connected = state.database.check_connection().await;
    let (status, label, database) = if connected {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "photofolio-api",
            "database": database,
        })),
    )
}
