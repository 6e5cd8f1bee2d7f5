//! `/api/friends` endpoints.

use bridgeai_core::models::friends::{FriendRequest, FriendRequestCreate, NetworkUser};
use bridgeai_core::models::Acknowledgement;
use reqwest::Method;

use crate::client::BridgeApi;
use crate::error::ApiError;

pub struct FriendsApi<'a> {
    api: &'a BridgeApi,
}

impl<'a> FriendsApi<'a> {
    pub(crate) fn new(api: &'a BridgeApi) -> Self {
        Self { api }
    }

    /// Users with the same job preference or location.
    pub async fn discover(&self) -> Result<Vec<NetworkUser>, ApiError> {
        let request = self.api.authed(Method::GET, "/api/friends/discover").await?;
        self.api.send_json(request).await
    }

    pub async fn send_request(&self, receiver_id: &str) -> Result<FriendRequest, ApiError> {
        let body = FriendRequestCreate {
            receiver_id: receiver_id.to_string(),
        };
        let request = self
            .api
            .authed(Method::POST, "/api/friends/request")
            .await?
            .json(&body);
        self.api.send_json(request).await
    }

    /// Pending requests addressed to the signed-in user.
    pub async fn requests(&self) -> Result<Vec<FriendRequest>, ApiError> {
        let request = self.api.authed(Method::GET, "/api/friends/requests").await?;
        self.api.send_json(request).await
    }

    pub async fn accept(&self, request_id: &str) -> Result<Acknowledgement, ApiError> {
        self.respond(request_id, "accept").await
    }

    pub async fn reject(&self, request_id: &str) -> Result<Acknowledgement, ApiError> {
        self.respond(request_id, "reject").await
    }

    pub async fn friends(&self) -> Result<Vec<NetworkUser>, ApiError> {
        let request = self.api.authed(Method::GET, "/api/friends/friends").await?;
        self.api.send_json(request).await
    }

    async fn respond(&self, request_id: &str, action: &str) -> Result<Acknowledgement, ApiError> {
        let url = self
            .api
            .segment_url("/api/friends/request", &[request_id, action])?;
        let request = self.api.authed_at(Method::PUT, url).await?;
        self.api.send_json(request).await
    }
}
