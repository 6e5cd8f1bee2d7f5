//! `/api/users` endpoints.

use bridgeai_core::models::user::{UserProfile, UserUpdate};
use bridgeai_core::models::Acknowledgement;
use bridgeai_core::validation::validate_profile_update;
use reqwest::Method;

use crate::client::BridgeApi;
use crate::error::ApiError;

pub struct UsersApi<'a> {
    api: &'a BridgeApi,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(api: &'a BridgeApi) -> Self {
        Self { api }
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        let request = self.api.authed(Method::GET, "/api/users/profile").await?;
        self.api.send_json(request).await
    }

    pub async fn by_id(&self, user_id: &str) -> Result<UserProfile, ApiError> {
        let url = self.api.segment_url("/api/users/by-id", &[user_id])?;
        let request = self.api.authed_at(Method::GET, url).await?;
        self.api.send_json(request).await
    }

    /// Profile of the signed-in user, looked up by the stored user id.
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        let user_id = self.api.current_user_id().await?;
        self.by_id(&user_id).await
    }

    pub async fn update_by_id(
        &self,
        user_id: &str,
        update: &UserUpdate,
    ) -> Result<Acknowledgement, ApiError> {
        validate_profile_update(update)?;
        let url = self.api.segment_url("/api/users/by-id", &[user_id])?;
        let request = self.api.authed_at(Method::PUT, url).await?.json(update);
        self.api.send_json(request).await
    }

    pub async fn update_profile(&self, update: &UserUpdate) -> Result<Acknowledgement, ApiError> {
        validate_profile_update(update)?;
        let request = self
            .api
            .authed(Method::PUT, "/api/users/profile")
            .await?
            .json(update);
        self.api.send_json(request).await
    }

    /// Delete the account and everything attached to it, then sign out.
    pub async fn delete_account(&self) -> Result<Acknowledgement, ApiError> {
        let request = self.api.authed(Method::DELETE, "/api/users/account").await?;
        let ack: Acknowledgement = self.api.send_json(request).await?;
        self.api.session().sign_out().await?;
        Ok(ack)
    }
}
