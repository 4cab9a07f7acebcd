//! Photo models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, non_blank_or_clear, nullable};
use crate::error::ApiError;

/// Photo as returned to clients, with its category name and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub upload_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Validated photo creation payload
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub upload_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// Validated photo update payload
///
/// `None` keeps a field and `Some(None)` clears it. `tags: Some` replaces the
/// whole set.
#[derive(Debug, Clone, Default)]
pub struct PhotoChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub category_id: Option<Option<i64>>,
    pub file_url: Option<String>,
    pub thumbnail_url: Option<Option<String>>,
    pub width: Option<Option<i32>>,
    pub height: Option<Option<i32>>,
    pub tags: Option<Vec<String>>,
}

/// Request for photo creation
#[derive(Debug, Default, Deserialize)]
pub struct CreatePhotoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub file_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub upload_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

impl CreatePhotoRequest {
    pub fn validate(self) -> Result<NewPhoto, ApiError> {
        let (Some(title), Some(file_url)) = (non_blank(self.title), non_blank(self.file_url))
        else {
            return Err(ApiError::BadRequest(
                "Title and file URL are required".to_string(),
            ));
        };
        check_dimensions(self.width, self.height)?;

        Ok(NewPhoto {
            title,
            description: non_blank(self.description),
            category_id: self.category_id,
            file_url,
            thumbnail_url: non_blank(self.thumbnail_url),
            width: self.width,
            height: self.height,
            upload_date: self.upload_date,
            tags: normalize_tags(self.tags.unwrap_or_default()),
        })
    }
}

/// Request for photo update; optional columns accept `null` to clear them
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePhotoRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category_id: Option<Option<i64>>,
    pub file_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub thumbnail_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub width: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub height: Option<Option<i32>>,
    pub tags: Option<Vec<String>>,
}

impl UpdatePhotoRequest {
    pub fn validate(self) -> Result<PhotoChanges, ApiError> {
        if matches!(&self.title, Some(title) if title.trim().is_empty())
            || matches!(&self.file_url, Some(url) if url.trim().is_empty())
        {
            return Err(ApiError::BadRequest(
                "Title and file URL cannot be empty".to_string(),
            ));
        }
        check_dimensions(self.width.flatten(), self.height.flatten())?;

        Ok(PhotoChanges {
            title: non_blank(self.title),
            description: non_blank_or_clear(self.description),
            category_id: self.category_id,
            file_url: non_blank(self.file_url),
            thumbnail_url: non_blank_or_clear(self.thumbnail_url),
            width: self.width,
            height: self.height,
            tags: self.tags.map(normalize_tags),
        })
    }
}

/// Query parameters for photo listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotoQuery {
    /// Only photos in this category
    pub category_id: Option<i64>,
}

fn check_dimensions(width: Option<i32>, height: Option<i32>) -> Result<(), ApiError> {
    if width.is_some_and(|w| w <= 0) || height.is_some_and(|h| h <= 0) {
        return Err(ApiError::BadRequest(
            "Width and height must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Trim, drop blanks and deduplicate tag names, keeping first occurrence order
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}
