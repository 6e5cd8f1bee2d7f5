//! `/api/resumes` endpoints: upload, parsed content, downloads and the
//! AI-backed evaluation and document generation.

use std::path::Path;

use bridgeai_core::error::CoreError;
use bridgeai_core::models::resume::{
    JobDescriptionRequest, ResumeContent, ResumeUploadResponse, MAX_RESUME_BYTES,
    RESUME_CONTENT_TYPE,
};
use bridgeai_core::models::Acknowledgement;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::client::BridgeApi;
use crate::error::ApiError;

pub struct ResumesApi<'a> {
    api: &'a BridgeApi,
}

/// Reject uploads the backend would refuse anyway.
pub fn check_upload(file_name: &str, size: usize) -> Result<(), CoreError> {
    if !file_name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(CoreError::Validation("Please select a PDF file.".into()));
    }
    if size == 0 {
        return Err(CoreError::Validation("The selected file is empty.".into()));
    }
    if size > MAX_RESUME_BYTES {
        return Err(CoreError::Validation(
            "File size must be less than 10MB.".into(),
        ));
    }
    Ok(())
}

impl<'a> ResumesApi<'a> {
    pub(crate) fn new(api: &'a BridgeApi) -> Self {
        Self { api }
    }

    /// Upload a PDF resume held in memory.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ResumeUploadResponse, ApiError> {
        check_upload(file_name, bytes.len())?;
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(RESUME_CONTENT_TYPE)?;
        let form = Form::new().part("file", part);

        let request = self
            .api
            .authed(Method::POST, "/api/resumes/upload")
            .await?
            .multipart(form);
        let response: ResumeUploadResponse = self.api.send_json(request).await?;
        tracing::info!(file_name, size, sections = response.sections_found.len(), "Resume uploaded");
        Ok(response)
    }

    /// Read a PDF from disk and upload it.
    pub async fn upload_file(&self, path: &Path) -> Result<ResumeUploadResponse, ApiError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CoreError::Validation("Please select a PDF file.".into()))?
            .to_string();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| CoreError::Validation(format!("Could not read {}: {e}", path.display())))?;
        self.upload(&file_name, bytes).await
    }

    pub async fn content(&self) -> Result<ResumeContent, ApiError> {
        let request = self.api.authed(Method::GET, "/api/resumes/content").await?;
        self.api.send_json(request).await
    }

    pub async fn remove(&self) -> Result<Acknowledgement, ApiError> {
        let request = self.api.authed(Method::DELETE, "/api/resumes/remove").await?;
        self.api.send_json(request).await
    }

    pub async fn download(&self) -> Result<Vec<u8>, ApiError> {
        let request = self.api.authed(Method::GET, "/api/resumes/download").await?;
        self.api.send_bytes(request).await
    }

    pub async fn preview(&self) -> Result<Vec<u8>, ApiError> {
        let request = self.api.authed(Method::GET, "/api/resumes/preview").await?;
        self.api.send_bytes(request).await
    }

    /// Score the stored resume against a job description. The result shape
    /// is owned by the backend and passed through untouched.
    pub async fn ats_evaluate(&self, job_description: &str) -> Result<serde_json::Value, ApiError> {
        self.post_job_description("/api/resumes/ats-evaluate", job_description)
            .await
    }

    /// Generate a tailored resume and cover letter for a job description.
    pub async fn generate_documents(
        &self,
        job_description: &str,
    ) -> Result<serde_json::Value, ApiError> {
        self.post_job_description("/api/resumes/generate-documents", job_description)
            .await
    }

    /// Fetch a generated document. `file_path` is the path the generation
    /// response returned; its `/`-separated parts are encoded one by one.
    pub async fn download_generated(&self, file_path: &str) -> Result<Vec<u8>, ApiError> {
        self.get_generated("/api/resumes/download-generated", file_path)
            .await
    }

    pub async fn preview_generated(&self, file_path: &str) -> Result<Vec<u8>, ApiError> {
        self.get_generated("/api/resumes/preview-generated", file_path)
            .await
    }

    async fn get_generated(&self, prefix: &str, file_path: &str) -> Result<Vec<u8>, ApiError> {
        let segments: Vec<&str> = file_path.split('/').filter(|s| !s.is_empty()).collect();
        let url = self.api.segment_url(prefix, &segments)?;
        let request = self.api.authed_at(Method::GET, url).await?;
        self.api.send_bytes(request).await
    }

    async fn post_job_description(
        &self,
        path: &str,
        job_description: &str,
    ) -> Result<serde_json::Value, ApiError> {
        if job_description.trim().is_empty() {
            return Err(CoreError::Validation("Please enter a job description.".into()).into());
        }
        let body = JobDescriptionRequest {
            job_description: job_description.to_string(),
        };
        let request = self.api.authed(Method::POST, path).await?.json(&body);
        self.api.send_json(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_checks() {
        assert!(check_upload("cv.pdf", 1024).is_ok());
        assert!(check_upload("CV.PDF", 1024).is_ok());
        assert!(check_upload("cv.docx", 1024).is_err());
        assert!(check_upload("cv.pdf", 0).is_err());
        assert!(check_upload("cv.pdf", MAX_RESUME_BYTES).is_ok());
        assert!(check_upload("cv.pdf", MAX_RESUME_BYTES + 1).is_err());
    }
}
