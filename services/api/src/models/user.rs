//! User request payloads

use auth::{
    models::{NewUser, Role, UserChanges},
    validation::{validate_email, validate_password, validate_registration, validate_username},
};
use serde::Deserialize;

use super::non_blank;
use crate::error::ApiError;

/// Request for user creation
#[derive(Debug, Default, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl CreateUserRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let (Some(username), Some(email), Some(password)) = (
            non_blank(self.username),
            non_blank(self.email),
            self.password.filter(|p| !p.is_empty()),
        ) else {
            return Err(ApiError::BadRequest(
                "Username, email, and password are required".to_string(),
            ));
        };

        validate_registration(&username, &email, &password).map_err(ApiError::BadRequest)?;

        Ok(NewUser {
            username,
            email,
            password,
            role: parse_role(self.role)?.unwrap_or_default(),
        })
    }
}

/// Request for user update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UpdateUserRequest {
    pub fn validate(self) -> Result<UserChanges, ApiError> {
        let username = non_blank(self.username);
        let email = non_blank(self.email);
        let password = self.password.filter(|p| !p.is_empty());

        if let Some(username) = &username {
            validate_username(username).map_err(ApiError::BadRequest)?;
        }
        if let Some(email) = &email {
            validate_email(email).map_err(ApiError::BadRequest)?;
        }
        if let Some(password) = &password {
            validate_password(password).map_err(ApiError::BadRequest)?;
        }

        Ok(UserChanges {
            username,
            email,
            password,
            role: parse_role(self.role)?,
        })
    }
}

/// Request for user login
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(self) -> Result<(String, String), ApiError> {
        match (non_blank(self.username), self.password.filter(|p| !p.is_empty())) {
            (Some(username), Some(password)) => Ok((username, password)),
            _ => Err(ApiError::BadRequest(
                "Username and password are required".to_string(),
            )),
        }
    }
}

fn parse_role(role: Option<String>) -> Result<Option<Role>, ApiError> {
    non_blank(role)
        .map(|r| r.parse::<Role>())
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}
