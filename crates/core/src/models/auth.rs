use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::session::Credentials;
use crate::types::UserId;

#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Registration form. Password strength is checked separately by
/// [`crate::validation::password_problems`].
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be between 2 and 50 characters."))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,
    pub password: String,
    /// Canadian province slug, e.g. `ontario`.
    #[validate(length(min = 1, message = "Location is required."))]
    pub location: String,
    #[validate(length(min = 1, message = "Job preference is required."))]
    pub job_preference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
}

/// Response of `/api/auth/login` and `/api/auth/signup`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub user_id: UserId,
    #[serde(default)]
    pub message: String,
}

impl AuthResponse {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            token: self.access_token.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// Response of `/api/auth/verify-token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenVerification {
    pub valid: bool,
    pub user_id: UserId,
}
