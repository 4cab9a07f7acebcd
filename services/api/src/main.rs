use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod models;
mod repositories;
mod routes;
mod session;
mod state;

use auth::{Authenticator, JwtConfig, JwtService, UserRepository};
use common::database::{self, DatabaseConfig, init_pool, run_migrations};
use tokio::net::TcpListener;

use crate::{
    config::{AdminBootstrap, ServerConfig},
    repositories::{SqlCategoryStore, SqlPhotoStore},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;
    run_migrations(&pool).await?;

    let client = database::client(pool);
    if client.check_connection().await {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;
    let users = UserRepository::new(client.clone());
    let authenticator = Authenticator::new(users.clone(), jwt_service.clone());

    if let Some(admin) = AdminBootstrap::from_env() {
        authenticator
            .ensure_admin(&admin.username, &admin.email, &admin.password)
            .await?;
    } else {
        warn!("Skipping admin bootstrap");
    }

    let app_state = AppState {
        auth: Arc::new(authenticator),
        users: Arc::new(users),
        photos: Arc::new(SqlPhotoStore::new(client.clone())),
        categories: Arc::new(SqlCategoryStore::new(client.clone())),
        jwt_service,
        database: Arc::new(client),
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let server_config = ServerConfig::from_env()?;
    let address = server_config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
