use serde::{Deserialize, Serialize};

/// Largest resume the backend accepts (10 MB).
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

/// The only accepted upload type.
pub const RESUME_CONTENT_TYPE: &str = "application/pdf";

/// Response of `/api/resumes/content`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeContent {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub resume_filename: Option<String>,
    #[serde(default)]
    pub resume_structured: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub resume_keywords: Option<Vec<String>>,
    #[serde(default)]
    pub has_resume: bool,
}

/// Response of `/api/resumes/upload`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeUploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub text_length: u64,
    #[serde(default)]
    pub sections_found: Vec<String>,
    #[serde(default)]
    pub keywords_extracted: Vec<String>,
}

/// Body for the ATS evaluation and document generation endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct JobDescriptionRequest {
    pub job_description: String,
}
