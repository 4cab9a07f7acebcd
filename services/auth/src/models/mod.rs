//! Authentication service models

pub mod role;
pub mod user;

// Re-export for convenience
pub use role::Role;
pub use user::{AuthSession, BOOTSTRAP_ADMIN_ID, LoginCredentials, NewUser, PublicUser, User, UserChanges};
