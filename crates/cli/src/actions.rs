//! Conversation actions that need both the REST client and the chat
//! manager.

use bridgeai_api::{ApiError, BridgeApi};
use bridgeai_chat::manager::ChatManager;

/// Replace the manager's message list with the latest REST history.
/// Returns how many messages belong to the conversation.
pub async fn refresh_history(api: &BridgeApi, manager: &ChatManager) -> Result<usize, ApiError> {
    let history = api.chat().recent(&manager.peer().id).await?;
    Ok(manager.load_history(history.messages).await)
}

/// Record the conversation as read on the server, then flag the peer's
/// messages read locally. Local state is untouched if the server call
/// fails.
pub async fn mark_conversation_read(
    api: &BridgeApi,
    manager: &ChatManager,
) -> Result<usize, ApiError> {
    let peer_id = &manager.peer().id;
    api.chat().mark_read(peer_id).await?;
    let marked = manager.mark_peer_messages_read().await;
    tracing::info!(peer_id = %peer_id, marked, "Conversation marked read");
    Ok(marked)
}
