//! Common library for the Photofolio application
//!
//! This crate provides the database plumbing shared by the services: the
//! pooled SQL client adapter, its PostgreSQL backend, configuration and
//! migrations.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, client, init_pool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env()?;
//!     let db = client(init_pool(&config).await?);
//!     println!("Database reachable: {}", db.check_connection().await);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
pub mod postgres;
pub mod sql;
