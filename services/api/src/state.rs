//! Application state shared across handlers

use std::sync::Arc;

use auth::{AuthService, JwtService};
use common::sql::HealthCheck;

use crate::repositories::{CategoryStore, PhotoStore, UserStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UserStore>,
    pub photos: Arc<dyn PhotoStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub jwt_service: JwtService,
    pub database: Arc<dyn HealthCheck>,
}
