//! In-memory store doubles for handler tests

use std::collections::BTreeMap;

use async_trait::async_trait;
use auth::{
    AuthResult, AuthService, JwtService,
    models::{AuthSession, NewUser, PublicUser, Role, UserChanges},
};
use chrono::{TimeZone, Utc};
use common::error::DatabaseResult;
use tokio::sync::Mutex;

use super::{CategoryStore, PhotoStore, UserStore};
use crate::models::{
    category::{Category, CategoryChanges, NewCategory},
    photo::{NewPhoto, Photo, PhotoChanges},
};

struct StoredUser {
    user: PublicUser,
    password: String,
}

/// Users keyed by id, seeded with an admin (id 1) and a regular user (id 2)
pub struct MemoryUsers {
    users: Mutex<BTreeMap<i64, StoredUser>>,
    jwt_service: JwtService,
}

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

impl MemoryUsers {
    pub fn seeded(jwt_service: JwtService) -> Self {
        let mut users = BTreeMap::new();
        for (id, username, role) in [(1, "admin", Role::Admin), (2, "user", Role::User)] {
            users.insert(
                id,
                StoredUser {
                    user: PublicUser {
                        id,
                        username: username.to_string(),
                        email: format!("{}@example.com", username),
                        role,
                        created_at: fixed_time(),
                        updated_at: fixed_time(),
                    },
                    password: format!("{}-password", username),
                },
            );
        }

        Self {
            users: Mutex::new(users),
            jwt_service,
        }
    }
}

#[async_trait]
impl AuthService for MemoryUsers {
    async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> AuthResult<Option<AuthSession>> {
        let users = self.users.lock().await;
        let Some(stored) = users
            .values()
            .find(|s| s.user.username == username && s.password == password)
        else {
            return Ok(None);
        };

        let token = self.jwt_service.generate_token(&stored.user)?;
        Ok(Some(AuthSession {
            user: stored.user.clone(),
            token,
        }))
    }

    async fn get_user_by_id(&self, id: i64) -> AuthResult<Option<PublicUser>> {
        Ok(self.users.lock().await.get(&id).map(|s| s.user.clone()))
    }

    async fn register(&self, new_user: NewUser) -> AuthResult<PublicUser> {
        let mut users = self.users.lock().await;
        let id = users.keys().next_back().copied().unwrap_or(0) + 1;
        let user = PublicUser {
            id,
            username: new_user.username,
            email: new_user.email,
            role: new_user.role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        users.insert(
            id,
            StoredUser {
                user: user.clone(),
                password: new_user.password,
            },
        );
        Ok(user)
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn list(&self) -> AuthResult<Vec<PublicUser>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .map(|s| s.user.clone())
            .collect())
    }

    async fn update(&self, id: i64, changes: UserChanges) -> AuthResult<Option<PublicUser>> {
        let mut users = self.users.lock().await;
        let Some(stored) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(username) = changes.username {
            stored.user.username = username;
        }
        if let Some(email) = changes.email {
            stored.user.email = email;
        }
        if let Some(password) = changes.password {
            stored.password = password;
        }
        if let Some(role) = changes.role {
            stored.user.role = role;
        }
        stored.user.updated_at = Utc::now();

        Ok(Some(stored.user.clone()))
    }

    async fn delete(&self, id: i64) -> AuthResult<bool> {
        Ok(self.users.lock().await.remove(&id).is_some())
    }
}

/// Categories and photos sharing one lock, so photos can resolve category names
#[derive(Default)]
pub struct MemoryCatalog {
    categories: Mutex<BTreeMap<i64, Category>>,
    photos: Mutex<BTreeMap<i64, Photo>>,
}

impl MemoryCatalog {
    /// A catalog with one category (id 1) holding one photo (id 1)
    pub async fn seeded() -> Self {
        let catalog = Self::default();
        catalog.categories.lock().await.insert(
            1,
            Category {
                id: 1,
                name: "Landscapes".to_string(),
                description: Some("Mountains and coastlines".to_string()),
            },
        );
        catalog.photos.lock().await.insert(
            1,
            Photo {
                id: 1,
                title: "Fjord at dawn".to_string(),
                description: None,
                category_id: Some(1),
                category_name: Some("Landscapes".to_string()),
                file_url: "/uploads/fjord.jpg".to_string(),
                thumbnail_url: Some("/uploads/thumbs/fjord.jpg".to_string()),
                width: Some(6000),
                height: Some(4000),
                upload_date: fixed_time(),
                created_at: fixed_time(),
                updated_at: fixed_time(),
                tags: vec!["norway".to_string()],
            },
        );
        catalog
    }

    async fn category_name(&self, category_id: Option<i64>) -> Option<String> {
        let categories = self.categories.lock().await;
        category_id.and_then(|id| categories.get(&id).map(|c| c.name.clone()))
    }
}

#[async_trait]
impl PhotoStore for MemoryCatalog {
    async fn list(&self, category_id: Option<i64>) -> DatabaseResult<Vec<Photo>> {
        Ok(self
            .photos
            .lock()
            .await
            .values()
            .filter(|p| category_id.is_none() || p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: i64) -> DatabaseResult<Option<Photo>> {
        Ok(self.photos.lock().await.get(&id).cloned())
    }

    async fn create(&self, photo: NewPhoto) -> DatabaseResult<i64> {
        let category_name = self.category_name(photo.category_id).await;
        let mut photos = self.photos.lock().await;
        let id = photos.keys().next_back().copied().unwrap_or(0) + 1;
        let now = Utc::now();
        photos.insert(
            id,
            Photo {
                id,
                title: photo.title,
                description: photo.description,
                category_id: photo.category_id,
                category_name,
                file_url: photo.file_url,
                thumbnail_url: photo.thumbnail_url,
                width: photo.width,
                height: photo.height,
                upload_date: photo.upload_date.unwrap_or(now),
                created_at: now,
                updated_at: now,
                tags: photo.tags,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: i64, changes: PhotoChanges) -> DatabaseResult<bool> {
        let category_name = self.category_name(changes.category_id.flatten()).await;
        let mut photos = self.photos.lock().await;
        let Some(photo) = photos.get_mut(&id) else {
            return Ok(false);
        };

        if let Some(title) = changes.title {
            photo.title = title;
        }
        if let Some(description) = changes.description {
            photo.description = description;
        }
        if let Some(category_id) = changes.category_id {
            photo.category_id = category_id;
            photo.category_name = category_name;
        }
        if let Some(file_url) = changes.file_url {
            photo.file_url = file_url;
        }
        if let Some(thumbnail_url) = changes.thumbnail_url {
            photo.thumbnail_url = thumbnail_url;
        }
        if let Some(width) = changes.width {
            photo.width = width;
        }
        if let Some(height) = changes.height {
            photo.height = height;
        }
        if let Some(tags) = changes.tags {
            photo.tags = tags;
        }
        photo.updated_at = Utc::now();

        Ok(true)
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        Ok(self.photos.lock().await.remove(&id).is_some())
    }
}

#[async_trait]
impl CategoryStore for MemoryCatalog {
    async fn list(&self) -> DatabaseResult<Vec<Category>> {
        Ok(self.categories.lock().await.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> DatabaseResult<Option<Category>> {
        Ok(self.categories.lock().await.get(&id).cloned())
    }

    async fn create(&self, category: NewCategory) -> DatabaseResult<i64> {
        let mut categories = self.categories.lock().await;
        let id = categories.keys().next_back().copied().unwrap_or(0) + 1;
        categories.insert(
            id,
            Category {
                id,
                name: category.name,
                description: category.description,
            },
        );
        Ok(id)
    }

    async fn update(&self, id: i64, changes: CategoryChanges) -> DatabaseResult<bool> {
        let mut categories = self.categories.lock().await;
        let Some(category) = categories.get_mut(&id) else {
            return Ok(false);
        };

        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(description) = changes.description {
            category.description = description;
        }
        Ok(true)
    }

    async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let removed = self.categories.lock().await.remove(&id).is_some();
        if removed {
            for photo in self.photos.lock().await.values_mut() {
                if photo.category_id == Some(id) {
                    photo.category_id = None;
                    photo.category_name = None;
                }
            }
        }
        Ok(removed)
    }
}
