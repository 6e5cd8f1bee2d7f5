//! In-memory chat transport for driving `ChatManager` without a network.
//!
//! [`FakeConnector`] follows a scripted list of [`Plan`]s, one per connect
//! attempt, and hands the server side of every accepted connection to the
//! test as a [`ServerEnd`].

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bridgeai_chat::client::{ChatClientError, ChatConnection, Connector};
use bridgeai_chat::conversation::Peer;
use bridgeai_chat::events::ChatEvent;
use bridgeai_chat::manager::ChatManager;
use bridgeai_core::config::ChatSettings;
use bridgeai_core::session::{SessionContext, StoredSession};
use futures::channel::mpsc as channel;
use futures::SinkExt;
use reqwest::Url;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

pub const SELF_ID: &str = "7";
pub const PEER_ID: &str = "42";
pub const PEER_NAME: &str = "Grace";

/// What the next connect attempt does.
pub enum Plan {
    Accept,
    Refuse,
    /// Never completes; only the connect timeout ends it.
    Hang,
}

/// The server's view of one accepted connection.
pub struct ServerEnd {
    to_client: channel::UnboundedSender<Result<Message, WsError>>,
    from_client: channel::UnboundedReceiver<Message>,
}

impl ServerEnd {
    pub fn push(&self, frame: Value) {
        self.to_client
            .unbounded_send(Ok(Message::Text(frame.to_string())))
            .unwrap();
    }

    pub fn close_with(&self, code: u16) {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: "".into(),
        };
        self.to_client
            .unbounded_send(Ok(Message::Close(Some(frame))))
            .unwrap();
    }

    /// Every frame the client has written so far.
    pub fn drain(&mut self) -> Vec<Message> {
        let mut frames = Vec::new();
        while let Ok(Some(frame)) = self.from_client.try_next() {
            frames.push(frame);
        }
        frames
    }

    /// The text frames written so far, parsed as JSON.
    pub fn drain_json(&mut self) -> Vec<Value> {
        self.drain()
            .into_iter()
            .filter_map(|frame| match frame {
                Message::Text(text) => Some(serde_json::from_str(&text).unwrap()),
                _ => None,
            })
            .collect()
    }
}

pub struct FakeConnector {
    plans: Mutex<VecDeque<Plan>>,
    attempts: Mutex<Vec<(Instant, String)>>,
    accepted: mpsc::UnboundedSender<ServerEnd>,
}

impl FakeConnector {
    pub fn attempt_times(&self) -> Vec<Instant> {
        self.attempts.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    pub fn attempt_urls(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(_, url)| url.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, url: &Url) -> Result<ChatConnection, ChatClientError> {
        self.attempts
            .lock()
            .unwrap()
            .push((Instant::now(), url.to_string()));
        let plan = self.plans.lock().unwrap().pop_front().unwrap_or(Plan::Hang);

        match plan {
            Plan::Hang => std::future::pending().await,
            Plan::Refuse => Err(ChatClientError::Connection("refused".into())),
            Plan::Accept => {
                let (to_client, client_rx) = channel::unbounded();
                let (client_tx, from_client) = channel::unbounded();
                let _ = self.accepted.send(ServerEnd {
                    to_client,
                    from_client,
                });
                Ok(ChatConnection {
                    sink: Box::pin(client_tx.sink_map_err(|_| WsError::ConnectionClosed)),
                    stream: Box::pin(client_rx),
                })
            }
        }
    }
}

pub struct Harness {
    pub manager: ChatManager,
    pub session: SessionContext,
    pub connector: Arc<FakeConnector>,
    pub accepted: mpsc::UnboundedReceiver<ServerEnd>,
    pub events: broadcast::Receiver<ChatEvent>,
}

impl Harness {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self::with_session(plans, signed_in())
    }

    pub fn with_session(plans: Vec<Plan>, stored: StoredSession) -> Self {
        let session = SessionContext::ephemeral(stored);
        let (accepted_tx, accepted) = mpsc::unbounded_channel();
        let connector = Arc::new(FakeConnector {
            plans: Mutex::new(plans.into()),
            attempts: Mutex::new(Vec::new()),
            accepted: accepted_tx,
        });
        let manager = ChatManager::with_connector(
            "ws://chat.test".into(),
            ChatSettings::default(),
            session.clone(),
            Peer::new(PEER_ID, PEER_NAME),
            connector.clone(),
        );
        let events = manager.subscribe();
        Self {
            manager,
            session,
            connector,
            accepted,
            events,
        }
    }

    /// Wait for the next accepted connection.
    pub async fn next_connection(&mut self) -> ServerEnd {
        tokio::time::timeout(Duration::from_secs(60), self.accepted.recv())
            .await
            .expect("no connection accepted")
            .expect("connector dropped")
    }

    /// Wait for the first event matching `pred`, skipping the rest.
    pub async fn wait_for<F>(&mut self, pred: F) -> ChatEvent
    where
        F: Fn(&ChatEvent) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(60), async {
            loop {
                let event = self.events.recv().await.expect("event channel closed");
                if pred(&event) {
                    return event;
                }
            }
        })
        .await
        .expect("expected event never arrived")
    }
}

pub fn signed_in() -> StoredSession {
    StoredSession {
        token: Some("tok".into()),
        user_id: Some(SELF_ID.into()),
        applied_count: 0,
    }
}
