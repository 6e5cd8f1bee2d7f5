//! HTTP plumbing shared by every endpoint group.

use bridgeai_core::config::ClientConfig;
use bridgeai_core::error::CoreError;
use bridgeai_core::session::SessionContext;
use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::endpoints::{
    auth::AuthApi, chat::ChatApi, friends::FriendsApi, jobs::JobsApi,
    qualifications::QualificationsApi, resumes::ResumesApi, users::UsersApi,
};
use crate::error::{extract_detail, ApiError};

/// REST client for one BridgeAI backend.
///
/// Cheap to clone: the underlying [`reqwest::Client`] pools connections and
/// the session is shared.
#[derive(Debug, Clone)]
pub struct BridgeApi {
    client: reqwest::Client,
    api_url: String,
    session: SessionContext,
}

impl BridgeApi {
    /// Build a client with its own connection pool and the configured
    /// request timeout.
    pub fn new(config: &ClientConfig, session: SessionContext) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_url.clone(), session))
    }

    /// Build a client around an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, session: SessionContext) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn resumes(&self) -> ResumesApi<'_> {
        ResumesApi::new(self)
    }

    pub fn jobs(&self) -> JobsApi<'_> {
        JobsApi::new(self)
    }

    pub fn qualifications(&self) -> QualificationsApi<'_> {
        QualificationsApi::new(self)
    }

    pub fn friends(&self) -> FriendsApi<'_> {
        FriendsApi::new(self)
    }

    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi::new(self)
    }

    // ---- crate-internal request builders ----

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// `prefix` followed by `segments`, each percent-encoded as a single
    /// path segment, so ids and file names can carry `/`, `?` or `#`.
    pub(crate) fn segment_url(&self, prefix: &str, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = |reason: String| CoreError::Config(format!("API URL {}: {reason}", self.api_url));
        let mut url = Url::parse(&self.url(prefix)).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".into()))?
            .extend(segments);
        Ok(url)
    }

    /// A request without credentials.
    pub(crate) fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// A request carrying the bearer token.
    ///
    /// Fails with [`ApiError::NotAuthenticated`] before anything is sent
    /// when the session holds no token.
    pub(crate) async fn authed(
        &self,
        method: Method,
        path: &str,
    ) -> Result<RequestBuilder, ApiError> {
        self.authed_at(method, self.url(path)).await
    }

    /// [`Self::authed`] for a URL built with [`Self::segment_url`].
    pub(crate) async fn authed_at<U>(&self, method: Method, url: U) -> Result<RequestBuilder, ApiError>
    where
        U: reqwest::IntoUrl + Send,
    {
        let token = self.session.token().await.ok_or(ApiError::NotAuthenticated)?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    /// A request carrying the bearer token when one is stored.
    pub(crate) async fn optionally_authed(&self, method: Method, path: &str) -> RequestBuilder {
        self.optionally_authed_at(method, self.url(path)).await
    }

    pub(crate) async fn optionally_authed_at<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl + Send,
    {
        let request = self.client.request(method, url);
        match self.session.token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// The signed-in user's id, required by `/by-id/` style routes.
    pub(crate) async fn current_user_id(&self) -> Result<String, ApiError> {
        self.session.user_id().await.ok_or(ApiError::NotAuthenticated)
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    /// Send a request and return the raw body (file downloads).
    pub(crate) async fn send_bytes(&self, request: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let response = self.send(request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Backend request failed");
            ApiError::Request(e)
        })?;
        self.ensure_success(response).await
    }

    /// Classify a non-2xx response.
    ///
    /// A 401 clears the stored credentials before returning, so every
    /// caller observes the sign-out regardless of which endpoint hit it.
    async fn ensure_success(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().path().to_string();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<failed to read body: {e}>"));
        let detail = extract_detail(&body);
        let code = status.as_u16();

        tracing::debug!(status = code, path = %url, detail = ?detail, "Backend returned error status");

        if code == 401 {
            if let Err(e) = self.session.sign_out().await {
                tracing::error!(error = %e, "Failed to clear session after 401");
            }
            return Err(ApiError::Unauthorized(detail));
        }
        if status.is_client_error() {
            return Err(ApiError::Validation { status: code, detail });
        }
        Err(ApiError::Server { status: code, detail })
    }
}
