//! WebSocket endpoint addressing and the transport seam.
//!
//! [`ChatEndpoint`] builds the `ws/chat/{user}?token=...` URL from the
//! session credentials. [`Connector`] opens it; the production
//! [`TungsteniteConnector`] uses `tokio-tungstenite`, tests plug in an
//! in-memory transport.

use std::pin::Pin;

use bridgeai_core::session::Credentials;
use futures::{Sink, Stream, StreamExt};
use reqwest::Url;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

/// Outgoing half of an open socket.
pub type FrameSink = Pin<Box<dyn Sink<Message, Error = WsError> + Send>>;

/// Incoming half of an open socket.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Message, WsError>> + Send>>;

/// A live chat socket, split into its two halves.
pub struct ChatConnection {
    pub sink: FrameSink,
    pub stream: FrameStream,
}

/// Address of the chat socket for one signed-in user.
#[derive(Clone)]
pub struct ChatEndpoint {
    ws_url: String,
    user_id: String,
    token: String,
}

impl std::fmt::Debug for ChatEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatEndpoint")
            .field("ws_url", &self.ws_url)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl ChatEndpoint {
    /// * `ws_url` - WebSocket base URL, e.g. `ws://host:8000`.
    pub fn new(ws_url: impl Into<String>, credentials: &Credentials) -> Self {
        Self {
            ws_url: ws_url.into(),
            user_id: credentials.user_id.clone(),
            token: credentials.token.clone(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// `{ws_url}/ws/chat/{user_id}?token={token}` with the user id and
    /// token percent-encoded.
    pub fn url(&self) -> Result<Url, ChatClientError> {
        let mut url = Url::parse(&self.ws_url)
            .map_err(|e| ChatClientError::Url(format!("{}: {e}", self.ws_url)))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ChatClientError::Url(format!(
                "{}: scheme must be ws or wss",
                self.ws_url
            )));
        }
        url.path_segments_mut()
            .map_err(|_| ChatClientError::Url(format!("{}: cannot be a base URL", self.ws_url)))?
            .pop_if_empty()
            .extend(["ws", "chat", self.user_id.as_str()]);
        url.query_pairs_mut()
            .clear()
            .append_pair("token", &self.token);
        Ok(url)
    }
}

/// Opens chat sockets.
#[async_trait::async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &Url) -> Result<ChatConnection, ChatClientError>;
}

/// [`Connector`] backed by `tokio-tungstenite` (plain or TLS).
#[derive(Debug, Default, Clone, Copy)]
pub struct TungsteniteConnector;

#[async_trait::async_trait]
impl Connector for TungsteniteConnector {
    async fn connect(&self, url: &Url) -> Result<ChatConnection, ChatClientError> {
        let (ws_stream, _response) = connect_async(url.as_str()).await.map_err(|e| {
            ChatClientError::Connection(format!(
                "Failed to connect to {}{}: {e}",
                url.origin().ascii_serialization(),
                url.path(),
            ))
        })?;

        tracing::debug!(path = %url.path(), "Chat socket opened");

        let (sink, stream) = ws_stream.split();
        Ok(ChatConnection {
            sink: Box::pin(sink),
            stream: Box::pin(stream),
        })
    }
}

/// Errors that can occur when working with the chat socket.
#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    /// The configured WebSocket URL is unusable.
    #[error("Invalid chat URL: {0}")]
    Url(String),

    /// Failed to establish the WebSocket connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A protocol-level error on an already-established connection.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn creds(token: &str) -> Credentials {
        Credentials {
            token: token.into(),
            user_id: "7".into(),
        }
    }

    #[test]
    fn url_includes_user_and_encoded_token() {
        let endpoint = ChatEndpoint::new("ws://localhost:8000", &creds("a/b=c"));
        let url = endpoint.url().unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8000/ws/chat/7?token=a%2Fb%3Dc");
    }

    #[test]
    fn url_handles_trailing_slash_and_base_path() {
        let endpoint = ChatEndpoint::new("wss://api.example.com/", &creds("t"));
        assert_eq!(
            endpoint.url().unwrap().as_str(),
            "wss://api.example.com/ws/chat/7?token=t"
        );

        let endpoint = ChatEndpoint::new("wss://example.com/bridge", &creds("t"));
        assert_eq!(
            endpoint.url().unwrap().as_str(),
            "wss://example.com/bridge/ws/chat/7?token=t"
        );
    }

    #[test]
    fn url_rejects_http_scheme() {
        let endpoint = ChatEndpoint::new("http://localhost:8000", &creds("t"));
        assert_matches!(endpoint.url(), Err(ChatClientError::Url(_)));
    }

    #[test]
    fn debug_hides_token() {
        let endpoint = ChatEndpoint::new("ws://localhost:8000", &creds("secret"));
        assert!(!format!("{endpoint:?}").contains("secret"));
    }
}
