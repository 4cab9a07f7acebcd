//! Server configuration

use std::env;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use tracing::warn;

/// HTTP listener settings, read from `SERVER_HOST` and `SERVER_PORT`
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .add_source(Environment::with_prefix("SERVER").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Credentials for the account created on first start
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AdminBootstrap {
    /// Returns `None` when `ADMIN_PASSWORD` is not set
    pub fn from_env() -> Option<Self> {
        let Ok(password) = env::var("ADMIN_PASSWORD") else {
            warn!("ADMIN_PASSWORD not set, admin bootstrap disabled");
            return None;
        };

        Some(Self {
            username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            email: env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string()),
            password,
        })
    }
}
