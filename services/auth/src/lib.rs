//! Authentication library for the Photofolio services
//!
//! Provides the user model, password hashing, token issuance and the
//! [`AuthService`] capability consumed by the HTTP layer.

pub mod error;
pub mod jwt;
pub mod models;
pub mod password;
pub mod repositories;
pub mod service;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use jwt::{Claims, JwtConfig, JwtService};
pub use repositories::UserRepository;
pub use service::{AuthService, Authenticator};
