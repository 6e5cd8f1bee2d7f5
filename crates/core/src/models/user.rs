use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{lenient_timestamp_opt, Timestamp, UserId};

/// A user profile as returned by `/api/users/profile` and `/api/users/by-id/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub job_preference: String,
    #[serde(default)]
    pub origin_country: Option<String>,
    #[serde(default, with = "lenient_timestamp_opt")]
    pub created_at: Option<Timestamp>,
    #[serde(default, with = "lenient_timestamp_opt")]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub resume_filename: Option<String>,
    #[serde(default)]
    pub resume_structured: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub resume_keywords: Option<Vec<String>>,
    /// Stored qualification path, opaque here; see [`super::qualification`].
    #[serde(default)]
    pub qualification_path: Option<serde_json::Value>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UserProfile {
    pub fn has_resume(&self) -> bool {
        self.resume_text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Partial profile update. Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters."))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_country: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.job_preference.is_none()
            && self.origin_country.is_none()
    }
}
