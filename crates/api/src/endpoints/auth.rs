//! `/api/auth` endpoints.

use bridgeai_core::models::auth::{AuthResponse, LoginRequest, SignupRequest, TokenVerification};
use bridgeai_core::validation::{validate_login, validate_signup};
use reqwest::Method;

use crate::client::BridgeApi;
use crate::error::ApiError;

pub struct AuthApi<'a> {
    api: &'a BridgeApi,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(api: &'a BridgeApi) -> Self {
        Self { api }
    }

    /// Exchange email and password for a token and sign the session in.
    pub async fn login(&self, form: &LoginRequest) -> Result<AuthResponse, ApiError> {
        validate_login(form)?;
        let request = self.api.public(Method::POST, "/api/auth/login").json(form);
        let response: AuthResponse = self.api.send_json(request).await?;
        self.api.session().sign_in(response.credentials()).await?;
        Ok(response)
    }

    /// Create an account and sign the session in.
    pub async fn signup(&self, form: &SignupRequest) -> Result<AuthResponse, ApiError> {
        validate_signup(form)?;
        let request = self.api.public(Method::POST, "/api/auth/signup").json(form);
        let response: AuthResponse = self.api.send_json(request).await?;
        tracing::info!(user_id = %response.user_id, "Account created");
        self.api.session().sign_in(response.credentials()).await?;
        Ok(response)
    }

    pub async fn verify_token(&self) -> Result<TokenVerification, ApiError> {
        let request = self.api.authed(Method::POST, "/api/auth/verify-token").await?;
        self.api.send_json(request).await
    }

    /// Forget the stored credentials. The backend keeps no session state.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api.session().sign_out().await?;
        Ok(())
    }
}
