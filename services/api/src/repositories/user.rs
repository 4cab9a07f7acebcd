//! User store backed by the authentication library's repository

use async_trait::async_trait;
use auth::{
    AuthResult, UserRepository,
    models::{PublicUser, UserChanges},
};
use common::sql::ConnectionPool;

use super::UserStore;

#[async_trait]
impl<P: ConnectionPool> UserStore for UserRepository<P> {
    async fn list(&self) -> AuthResult<Vec<PublicUser>> {
        let users = UserRepository::list(self).await?;
        Ok(users.into_iter().map(PublicUser::from).collect())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> AuthResult<Option<PublicUser>> {
        if changes.is_empty() {
            let user = self.find_by_id(id).await?;
            return Ok(user.map(PublicUser::from));
        }

        let user = UserRepository::update(
            self,
            id,
            changes.username.as_deref(),
            changes.email.as_deref(),
            changes.password.as_deref(),
            changes.role,
        )
        .await?;

        Ok(user.map(PublicUser::from))
    }

    async fn delete(&self, id: i64) -> AuthResult<bool> {
        UserRepository::delete(self, id).await
    }
}
