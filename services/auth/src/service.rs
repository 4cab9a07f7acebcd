//! Authentication service
//!
//! The [`AuthService`] trait is the capability handed to HTTP handlers;
//! [`Authenticator`] is its SQL-backed implementation.

use async_trait::async_trait;
use common::sql::ConnectionPool;
use tracing::{info, warn};

use crate::{
    error::AuthResult,
    jwt::JwtService,
    models::{AuthSession, BOOTSTRAP_ADMIN_ID, NewUser, PublicUser, Role},
    password::{hash_password, verify_dummy, verify_password},
    repositories::UserRepository,
};

/// Authentication capability
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials and issue a token
    ///
    /// Unknown usernames and wrong passwords both yield `None`, so callers
    /// cannot tell which one failed.
    async fn authenticate(&self, username: &str, password: &str)
    -> AuthResult<Option<AuthSession>>;

    /// Look a user up by id
    async fn get_user_by_id(&self, id: i64) -> AuthResult<Option<PublicUser>>;

    /// Register a new user and return it without credentials
    ///
    /// Uniqueness is left to the store's constraints.
    async fn register(&self, new_user: NewUser) -> AuthResult<PublicUser>;
}

/// SQL-backed authentication service
#[derive(Clone)]
pub struct Authenticator<P> {
    users: UserRepository<P>,
    jwt_service: JwtService,
}

impl<P: ConnectionPool> Authenticator<P> {
    pub fn new(users: UserRepository<P>, jwt_service: JwtService) -> Self {
        Self { users, jwt_service }
    }

    /// Create the bootstrap admin account when no user exists yet
    ///
    /// The account always receives [`BOOTSTRAP_ADMIN_ID`], whatever state the
    /// id sequence is in.
    pub async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<PublicUser>> {
        if self.users.count().await? > 0 {
            info!("Users already present, skipping admin bootstrap");
            return Ok(None);
        }

        let password_hash = hash_password(password)?;
        let admin = self
            .users
            .create_with_id(BOOTSTRAP_ADMIN_ID, username, email, &password_hash, Role::Admin)
            .await?;

        info!("Bootstrap admin '{}' created with id {}", admin.username, admin.id);
        Ok(Some(PublicUser::from(admin)))
    }
}

#[async_trait]
impl<P: ConnectionPool> AuthService for Authenticator<P> {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<Option<AuthSession>> {
        info!("Login attempt for user: {}", username);

        let Some(user) = self.users.find_by_username(username).await? else {
            verify_dummy(password);
            warn!("Authentication failed for user: {}", username);
            return Ok(None);
        };

        if !verify_password(&user.password_hash, password)? {
            warn!("Authentication failed for user: {}", username);
            return Ok(None);
        }

        let user = PublicUser::from(user);
        let token = self.jwt_service.generate_token(&user)?;

        Ok(Some(AuthSession { user, token }))
    }

    async fn get_user_by_id(&self, id: i64) -> AuthResult<Option<PublicUser>> {
        Ok(self.users.find_by_id(id).await?.map(PublicUser::from))
    }

    async fn register(&self, new_user: NewUser) -> AuthResult<PublicUser> {
        let password_hash = hash_password(&new_user.password)?;
        let user = self
            .users
            .create(
                &new_user.username,
                &new_user.email,
                &password_hash,
                new_user.role,
            )
            .await?;

        Ok(PublicUser::from(user))
    }
}
