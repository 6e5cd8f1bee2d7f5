//! `/api/chat` endpoints: history, conversation list, read receipts.

use bridgeai_core::models::chat::{
    ChatHistory, ChatSessionList, ChatSessionSummary, UnreadCount, DEFAULT_HISTORY_PAGE,
    MAX_HISTORY_PAGE,
};
use bridgeai_core::models::Acknowledgement;
use reqwest::Method;

use crate::client::BridgeApi;
use crate::error::ApiError;

pub struct ChatApi<'a> {
    api: &'a BridgeApi,
}

impl<'a> ChatApi<'a> {
    pub(crate) fn new(api: &'a BridgeApi) -> Self {
        Self { api }
    }

    /// Messages exchanged with `peer_id`, oldest first.
    ///
    /// `limit` is clamped to `1..=100`.
    pub async fn history(
        &self,
        peer_id: &str,
        limit: u32,
        skip: u32,
    ) -> Result<ChatHistory, ApiError> {
        let limit = limit.clamp(1, MAX_HISTORY_PAGE);
        let url = self.api.segment_url("/api/chat/messages", &[peer_id])?;
        let request = self
            .api
            .authed_at(Method::GET, url)
            .await?
            .query(&[("limit", limit), ("skip", skip)]);
        let history: ChatHistory = self.api.send_json(request).await?;
        tracing::debug!(
            peer_id,
            count = history.messages.len(),
            has_more = history.has_more,
            "Chat history fetched",
        );
        Ok(history)
    }

    /// The most recent page of history with `peer_id`.
    pub async fn recent(&self, peer_id: &str) -> Result<ChatHistory, ApiError> {
        self.history(peer_id, DEFAULT_HISTORY_PAGE, 0).await
    }

    pub async fn sessions(&self) -> Result<Vec<ChatSessionSummary>, ApiError> {
        let request = self.api.authed(Method::GET, "/api/chat/sessions").await?;
        let list: ChatSessionList = self.api.send_json(request).await?;
        Ok(list.sessions)
    }

    pub async fn mark_read(&self, peer_id: &str) -> Result<Acknowledgement, ApiError> {
        let url = self.api.segment_url("/api/chat/mark-read", &[peer_id])?;
        let request = self.api.authed_at(Method::POST, url).await?;
        self.api.send_json(request).await
    }

    pub async fn unread_count(&self) -> Result<u32, ApiError> {
        let request = self.api.authed(Method::GET, "/api/chat/unread-count").await?;
        let count: UnreadCount = self.api.send_json(request).await?;
        Ok(count.unread_count)
    }

    /// Delete a message sent by the signed-in user.
    pub async fn delete_message(&self, message_id: &str) -> Result<Acknowledgement, ApiError> {
        let url = self.api.segment_url("/api/chat/messages", &[message_id])?;
        let request = self.api.authed_at(Method::DELETE, url).await?;
        self.api.send_json(request).await
    }
}
