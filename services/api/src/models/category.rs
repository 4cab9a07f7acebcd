//! Category models

use serde::{Deserialize, Serialize};

use super::{non_blank, non_blank_or_clear, nullable};
use crate::error::ApiError;

/// Category entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Validated category creation payload
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

/// Validated category update payload; `description: Some(None)` clears it
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

/// Request for category creation
#[derive(Debug, Default, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl CreateCategoryRequest {
    pub fn validate(self) -> Result<NewCategory, ApiError> {
        let name = non_blank(self.name)
            .ok_or_else(|| ApiError::BadRequest("Category name is required".to_string()))?;

        Ok(NewCategory {
            name,
            description: non_blank(self.description),
        })
    }
}

/// Request for category update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl UpdateCategoryRequest {
    pub fn validate(self) -> Result<CategoryChanges, ApiError> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ApiError::BadRequest("Category name cannot be empty".to_string()));
        }

        Ok(CategoryChanges {
            name: non_blank(self.name),
            description: non_blank_or_clear(self.description),
        })
    }
}
