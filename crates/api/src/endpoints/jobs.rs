//! `/api/jobs` endpoints.

use bridgeai_core::models::jobs::{JobSearchPage, JobSearchQuery};
use reqwest::Method;

use crate::client::BridgeApi;
use crate::error::ApiError;

pub struct JobsApi<'a> {
    api: &'a BridgeApi,
}

impl<'a> JobsApi<'a> {
    pub(crate) fn new(api: &'a BridgeApi) -> Self {
        Self { api }
    }

    /// One page of postings. Sends the token when signed in but does not
    /// require it.
    pub async fn search(&self, query: &JobSearchQuery) -> Result<JobSearchPage, ApiError> {
        let request = self
            .api
            .optionally_authed(Method::GET, "/api/jobs/search")
            .await
            .query(query);
        let page: JobSearchPage = self.api.send_json(request).await?;
        tracing::debug!(
            page = query.page,
            results = page.results.len(),
            total = page.total_results,
            "Job search page fetched",
        );
        Ok(page)
    }

    pub async fn details(&self, job_id: &str) -> Result<serde_json::Value, ApiError> {
        let url = self.api.segment_url("/api/jobs", &[job_id])?;
        let request = self.api.optionally_authed_at(Method::GET, url).await;
        self.api.send_json(request).await
    }

    /// Count an "apply" click locally and return the new total.
    pub async fn mark_applied(&self) -> Result<u32, ApiError> {
        Ok(self.api.session().record_application().await?)
    }
}
