//! Stores for database operations
//!
//! Handlers only see these traits; the SQL implementations live in the
//! submodules and test doubles in `memory`.

use async_trait::async_trait;
use auth::{
    AuthResult,
    models::{PublicUser, UserChanges},
};
use common::error::DatabaseResult;

use crate::models::{
    category::{Category, CategoryChanges, NewCategory},
    photo::{NewPhoto, Photo, PhotoChanges},
};

pub mod category;
pub mod photo;
pub mod user;

#[cfg(test)]
pub mod memory;
#[cfg(test)]
pub mod scripted;

pub use category::SqlCategoryStore;
pub use photo::SqlPhotoStore;

/// User persistence beyond what the authentication service covers
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> AuthResult<Vec<PublicUser>>;

    /// Returns `None` when no user has the given id
    async fn update(&self, id: i64, changes: UserChanges) -> AuthResult<Option<PublicUser>>;

    /// Returns whether a user was removed
    async fn delete(&self, id: i64) -> AuthResult<bool>;
}

/// Photo persistence
#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn list(&self, category_id: Option<i64>) -> DatabaseResult<Vec<Photo>>;

    async fn find(&self, id: i64) -> DatabaseResult<Option<Photo>>;

    /// Insert a photo with its tags and return the new id
    async fn create(&self, photo: NewPhoto) -> DatabaseResult<i64>;

    /// Returns whether a photo with the given id existed
    async fn update(&self, id: i64, changes: PhotoChanges) -> DatabaseResult<bool>;

    async fn delete(&self, id: i64) -> DatabaseResult<bool>;
}

/// Category persistence
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> DatabaseResult<Vec<Category>>;

    async fn find(&self, id: i64) -> DatabaseResult<Option<Category>>;

    async fn create(&self, category: NewCategory) -> DatabaseResult<i64>;

    async fn update(&self, id: i64, changes: CategoryChanges) -> DatabaseResult<bool>;

    async fn delete(&self, id: i64) -> DatabaseResult<bool>;
}
