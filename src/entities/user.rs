//! User entity type - the signed-in console operator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::core::role::Role;
use crate::core::validation::{required_min_len, Checked};

/// A console user as returned by the login endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Credentials posted to `/api/auth/login`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(custom = "validate_login_email")]
    pub email: String,
    #[validate(custom = "validate_password")]
    pub password: String,
}

impl Checked for LoginRequest {}

fn validate_login_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("Email is required".into());
        return Err(err);
    }
    let well_formed = value
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty()
                && !value.chars().any(char::is_whitespace)
                && domain.split_once('.').map_or(false, |(a, b)| !a.is_empty() && !b.is_empty())
        })
        .unwrap_or(false);
    if !well_formed {
        let mut err = ValidationError::new("email");
        err.message = Some("Enter a valid email address".into());
        return Err(err);
    }
    Ok(())
}

fn validate_password(value: &str) -> Result<(), ValidationError> {
    required_min_len(
        value,
        6,
        "Password is required",
        "Minimum 6 characters required",
    )
}

/// Login payload: the user and their bearer token
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}
