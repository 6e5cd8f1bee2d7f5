//! `/api/qualifications` endpoints.

use bridgeai_core::models::qualification::{ProgressUpdate, QualificationRecord};
use bridgeai_core::models::Acknowledgement;
use reqwest::Method;

use crate::client::BridgeApi;
use crate::error::ApiError;

pub struct QualificationsApi<'a> {
    api: &'a BridgeApi,
}

impl<'a> QualificationsApi<'a> {
    pub(crate) fn new(api: &'a BridgeApi) -> Self {
        Self { api }
    }

    /// Generate (or regenerate) the path for the user's job preference and
    /// province.
    pub async fn generate(&self) -> Result<QualificationRecord, ApiError> {
        let request = self
            .api
            .authed(Method::POST, "/api/qualifications/generate")
            .await?;
        self.api.send_json(request).await
    }

    /// The stored path, or `None` when none has been generated yet.
    pub async fn fetch(&self) -> Result<Option<QualificationRecord>, ApiError> {
        let request = self.api.authed(Method::GET, "/api/qualifications/path").await?;
        match self.api.send_json(request).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn update_progress(
        &self,
        step_number: u32,
        completed: bool,
    ) -> Result<ProgressUpdate, ApiError> {
        let request = self
            .api
            .authed(Method::PUT, "/api/qualifications/progress")
            .await?
            .query(&[
                ("step_number", step_number.to_string()),
                ("completed", completed.to_string()),
            ]);
        self.api.send_json(request).await
    }

    pub async fn delete(&self) -> Result<Acknowledgement, ApiError> {
        let request = self
            .api
            .authed(Method::DELETE, "/api/qualifications/path")
            .await?;
        self.api.send_json(request).await
    }
}
