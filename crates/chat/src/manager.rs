//! Chat connection manager for one open conversation.
//!
//! [`ChatManager`] owns a single background task that holds the WebSocket
//! (connect -> process frames -> wait -> reconnect). Callers talk to the
//! task over an mpsc command channel and observe it through a
//! [`tokio::sync::broadcast`] channel of [`ChatEvent`]s and a
//! [`tokio::sync::watch`] of the [`ConnectionState`].
//!
//! Timers (connect timeout, reconnect delay, typing stop, peer typing
//! clear) all live inside that task, so a paused Tokio clock drives them
//! deterministically.

use std::sync::Arc;
use std::time::Duration;

use bridgeai_core::config::{ChatSettings, ClientConfig};
use bridgeai_core::models::chat::ChatMessage;
use bridgeai_core::session::SessionContext;
use futures::{SinkExt, StreamExt};
use reqwest::Url;
use tokio::sync::{broadcast, mpsc, oneshot, watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use crate::client::{
    ChatClientError, ChatConnection, ChatEndpoint, Connector, FrameSink, TungsteniteConnector,
};
use crate::conversation::{Applied, Conversation, Peer};
use crate::events::{notices, ChatEvent, ConnectionState};
use crate::messages::{parse_message, OutboundEvent};
use crate::reconnect::{CloseReason, ReconnectDecision, ReconnectPolicy};
use crate::typing::{sleep_until, TypingDebouncer};

/// Broadcast channel capacity for chat events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

const COMMAND_CHANNEL_CAPACITY: usize = 32;

/// How long [`ChatManager::close`] waits for the task to say goodbye.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Manages the chat socket for the conversation with one peer.
pub struct ChatManager {
    ws_url: String,
    settings: ChatSettings,
    peer: Peer,
    session: SessionContext,
    connector: Arc<dyn Connector>,
    conversation: Arc<RwLock<Conversation>>,
    draft: Mutex<String>,
    publisher: Publisher,
    running: Mutex<Option<Running>>,
    /// Master cancellation token, cancelled on drop.
    shutdown: CancellationToken,
}

/// Bookkeeping for the live connection task.
struct Running {
    commands: mpsc::Sender<Command>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

enum Command {
    Send {
        content: String,
        reply: oneshot::Sender<Result<(), SendError>>,
    },
    Keystroke,
}

impl ChatManager {
    /// A manager that connects with `tokio-tungstenite`.
    pub fn new(config: &ClientConfig, session: SessionContext, peer: Peer) -> Self {
        Self::with_connector(
            config.ws_url.clone(),
            config.chat.clone(),
            session,
            peer,
            Arc::new(TungsteniteConnector),
        )
    }

    pub fn with_connector(
        ws_url: String,
        settings: ChatSettings,
        session: SessionContext,
        peer: Peer,
        connector: Arc<dyn Connector>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);

        Self {
            ws_url,
            settings,
            conversation: Arc::new(RwLock::new(Conversation::new(peer.clone()))),
            peer,
            session,
            connector,
            draft: Mutex::new(String::new()),
            publisher: Publisher {
                events: event_tx,
                state: Arc::new(state_tx),
            },
            running: Mutex::new(None),
            shutdown: CancellationToken::new(),
        }
    }

    /// Subscribe to chat events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.publisher.events.subscribe()
    }

    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.publisher.state.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        *self.publisher.state.borrow()
    }

    pub fn peer(&self) -> &Peer {
        &self.peer
    }

    /// Start the connection task.
    ///
    /// Fails with [`ChatManagerError::LoginRequired`] (and emits
    /// [`ChatEvent::LoginRequired`]) when the session has no credentials.
    /// Calling it while the task is running is a no-op.
    pub async fn connect(&self) -> Result<(), ChatManagerError> {
        let mut running = self.running.lock().await;
        if running.as_ref().is_some_and(|r| !r.handle.is_finished()) {
            tracing::debug!(peer_id = %self.peer.id, "Chat connection already running");
            return Ok(());
        }

        let Some(credentials) = self.session.credentials().await else {
            tracing::info!(peer_id = %self.peer.id, "Not signed in, chat needs login");
            self.publisher.emit(ChatEvent::LoginRequired);
            return Err(ChatManagerError::LoginRequired);
        };
        ChatEndpoint::new(&self.ws_url, &credentials).url()?;

        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let cancel = self.shutdown.child_token();

        let task = ConnectionTask {
            ws_url: self.ws_url.clone(),
            peer: self.peer.clone(),
            session: self.session.clone(),
            connector: Arc::clone(&self.connector),
            settings: self.settings.clone(),
            policy: ReconnectPolicy::new(self.settings.reconnect_delay),
            conversation: Arc::clone(&self.conversation),
            publisher: self.publisher.clone(),
            commands: command_rx,
            cancel: cancel.clone(),
            typing: TypingDebouncer::new(self.settings.typing_idle),
            peer_typing_until: None,
        };
        let handle = tokio::spawn(task.run());

        *running = Some(Running {
            commands: command_tx,
            cancel,
            handle,
        });
        Ok(())
    }

    /// Replace the draft text. Counts as a keystroke for the typing
    /// indicator.
    pub async fn set_draft(&self, text: impl Into<String>) {
        *self.draft.lock().await = text.into();
        if let Some(commands) = self.command_sender().await {
            let _ = commands.send(Command::Keystroke).await;
        }
    }

    pub async fn draft(&self) -> String {
        self.draft.lock().await.clone()
    }

    /// Send the trimmed draft and clear it.
    ///
    /// Returns `Ok(false)` without sending anything when the draft is
    /// blank. When the socket is not open the draft is kept and no frame
    /// is written.
    pub async fn send_draft(&self) -> Result<bool, SendError> {
        let mut draft = self.draft.lock().await;
        let content = draft.trim();
        if content.is_empty() {
            return Ok(false);
        }
        let content = content.to_string();

        self.request(|reply| Command::Send { content, reply }).await?;
        draft.clear();
        Ok(true)
    }

    /// Flag every message from the peer as read in the local list.
    ///
    /// Call after the server has acknowledged the read (REST
    /// `mark-read`); the socket has no read receipt frame. Returns how
    /// many messages changed.
    pub async fn mark_peer_messages_read(&self) -> usize {
        let marked = self.conversation.write().await.mark_peer_messages_read();
        tracing::debug!(peer_id = %self.peer.id, marked, "Conversation marked read");
        marked
    }

    /// Replace the message list with REST history (oldest first).
    pub async fn load_history(&self, history: Vec<ChatMessage>) -> usize {
        let kept = self.conversation.write().await.load_history(history);
        tracing::debug!(peer_id = %self.peer.id, kept, "Chat history loaded");
        kept
    }

    /// Snapshot of the message list.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.conversation.read().await.messages().to_vec()
    }

    pub async fn is_peer_typing(&self) -> bool {
        self.conversation.read().await.is_peer_typing()
    }

    /// Whether the connection task is alive (connected, connecting or
    /// waiting to reconnect).
    pub async fn is_running(&self) -> bool {
        self.running
            .lock()
            .await
            .as_ref()
            .is_some_and(|r| !r.handle.is_finished())
    }

    /// Stop the connection task from any state.
    ///
    /// An open socket is closed with a normal close frame.
    pub async fn close(&self) {
        let Some(running) = self.running.lock().await.take() else {
            return;
        };
        tracing::info!(peer_id = %self.peer.id, "Closing chat connection");
        running.cancel.cancel();
        if tokio::time::timeout(SHUTDOWN_GRACE, running.handle)
            .await
            .is_err()
        {
            tracing::warn!(peer_id = %self.peer.id, "Chat task did not stop in time");
        }
        self.publisher.set_state(ConnectionState::Disconnected);
    }

    // ---- private helpers ----

    async fn command_sender(&self) -> Option<mpsc::Sender<Command>> {
        self.running
            .lock()
            .await
            .as_ref()
            .filter(|r| !r.handle.is_finished())
            .map(|r| r.commands.clone())
    }

    /// Hand a command to the task and wait for its verdict.
    async fn request<F>(&self, build: F) -> Result<(), SendError>
    where
        F: FnOnce(oneshot::Sender<Result<(), SendError>>) -> Command,
    {
        let Some(commands) = self.command_sender().await else {
            self.publisher.notice(notices::CONNECTION_LOST);
            return Err(SendError::Closed);
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        if commands.send(build(reply_tx)).await.is_err() {
            self.publisher.notice(notices::CONNECTION_LOST);
            return Err(SendError::Closed);
        }
        reply_rx.await.unwrap_or(Err(SendError::Closed))
    }
}

impl Drop for ChatManager {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// Event and state fan-out shared by the manager and its task.
#[derive(Clone)]
struct Publisher {
    events: broadcast::Sender<ChatEvent>,
    state: Arc<watch::Sender<ConnectionState>>,
}

impl Publisher {
    fn emit(&self, event: ChatEvent) {
        let _ = self.events.send(event);
    }

    fn notice(&self, text: &str) {
        tracing::debug!(notice = text, "Chat notice");
        self.emit(ChatEvent::Notice(text.to_string()));
    }

    fn set_state(&self, state: ConnectionState) {
        let changed = self.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
        if changed {
            tracing::info!(state = ?state, "Chat connection state changed");
            self.emit(ChatEvent::StateChanged(state));
        }
    }
}

// ---------------------------------------------------------------------------
// Connection task
// ---------------------------------------------------------------------------

struct ConnectionTask {
    ws_url: String,
    peer: Peer,
    session: SessionContext,
    connector: Arc<dyn Connector>,
    settings: ChatSettings,
    policy: ReconnectPolicy,
    conversation: Arc<RwLock<Conversation>>,
    publisher: Publisher,
    commands: mpsc::Receiver<Command>,
    cancel: CancellationToken,
    typing: TypingDebouncer,
    peer_typing_until: Option<Instant>,
}

impl ConnectionTask {
    /// Core connection loop: connect -> process frames -> reconnect.
    ///
    /// Runs until cancelled, until the server rejects the token, or until
    /// the session no longer holds credentials when a retry is due.
    async fn run(mut self) {
        tracing::info!(peer_id = %self.peer.id, "Chat connection task started");

        loop {
            let Some(credentials) = self.session.credentials().await else {
                tracing::info!(peer_id = %self.peer.id, "Signed out, not reconnecting");
                self.publisher.emit(ChatEvent::LoginRequired);
                break;
            };
            let url = match ChatEndpoint::new(&self.ws_url, &credentials).url() {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!(error = %e, "Cannot build chat URL");
                    break;
                }
            };

            self.publisher.set_state(ConnectionState::Connecting);
            let reason = match self.open(url).await {
                None => break,
                Some(Err(reason)) => reason,
                Some(Ok(connection)) => {
                    self.publisher.set_state(ConnectionState::Connected);
                    match self.run_session(connection).await {
                        Some(reason) => reason,
                        None => break,
                    }
                }
            };

            self.on_disconnect().await;
            tracing::info!(peer_id = %self.peer.id, reason = ?reason, "Chat connection ended");

            match self.policy.decide(&reason) {
                ReconnectDecision::Logout => {
                    tracing::warn!(peer_id = %self.peer.id, "Chat token rejected, signing out");
                    if let Err(e) = self.session.sign_out().await {
                        tracing::error!(error = %e, "Failed to clear session after chat rejection");
                    }
                    self.publisher.notice(notices::SESSION_EXPIRED);
                    self.publisher.emit(ChatEvent::LoginRequired);
                    break;
                }
                ReconnectDecision::Retry(delay) => {
                    let notice = if reason == CloseReason::ConnectTimeout {
                        notices::CONNECT_TIMEOUT
                    } else {
                        notices::DISCONNECTED
                    };
                    self.publisher.notice(notice);
                    if !self.wait(delay).await {
                        break;
                    }
                }
            }
        }

        self.on_disconnect().await;
        tracing::info!(peer_id = %self.peer.id, "Chat connection task exited");
    }

    /// Open the socket, bounded by the connect timeout.
    ///
    /// Returns `None` if cancelled. Commands arriving meanwhile are
    /// rejected.
    async fn open(&mut self, url: Url) -> Option<Result<ChatConnection, CloseReason>> {
        let connector = Arc::clone(&self.connector);
        let attempt = tokio::time::timeout(self.settings.connect_timeout, async move {
            connector.connect(&url).await
        });
        tokio::pin!(attempt);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return None,
                result = &mut attempt => {
                    return Some(match result {
                        Ok(Ok(connection)) => Ok(connection),
                        Ok(Err(e)) => {
                            tracing::warn!(peer_id = %self.peer.id, error = %e, "Chat connect failed");
                            Err(CloseReason::ConnectFailed(e.to_string()))
                        }
                        Err(_) => {
                            tracing::warn!(
                                peer_id = %self.peer.id,
                                timeout_secs = self.settings.connect_timeout.as_secs(),
                                "Chat connect timed out",
                            );
                            Err(CloseReason::ConnectTimeout)
                        }
                    });
                }
                Some(command) = self.commands.recv() => self.reject(command),
            }
        }
    }

    /// Drive one open socket until it ends.
    ///
    /// Returns `None` if cancelled (after sending a normal close frame).
    async fn run_session(&mut self, connection: ChatConnection) -> Option<CloseReason> {
        let ChatConnection {
            mut sink,
            mut stream,
        } = connection;
        tracing::info!(peer_id = %self.peer.id, "Chat connected");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    let close = Message::Close(Some(CloseFrame {
                        code: CloseCode::Normal,
                        reason: "".into(),
                    }));
                    if let Err(e) = sink.send(close).await {
                        tracing::debug!(error = %e, "Close frame not delivered");
                    }
                    return None;
                }
                frame = stream.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.handle_text(&text).await,
                    Some(Ok(Message::Close(frame))) => {
                        tracing::info!(peer_id = %self.peer.id, ?frame, "Server closed chat socket");
                        return Some(CloseReason::from_frame(frame));
                    }
                    Some(Ok(_)) => {
                        // Binary / Ping / Pong / Frame: nothing to do.
                    }
                    Some(Err(e)) => {
                        tracing::warn!(peer_id = %self.peer.id, error = %e, "Chat socket receive error");
                        return Some(CloseReason::Error(e.to_string()));
                    }
                    None => return Some(CloseReason::StreamEnded),
                },
                Some(command) = self.commands.recv() => {
                    if let Err(reason) = self.handle_command(command, &mut sink).await {
                        return Some(reason);
                    }
                }
                _ = sleep_until(self.typing.deadline()) => {
                    if self.typing.fire(Instant::now()) {
                        let stop = OutboundEvent::typing(&self.peer.id, false);
                        if let Err(e) = send_event(&mut sink, &stop).await {
                            return Some(CloseReason::Error(e.to_string()));
                        }
                    }
                }
                _ = sleep_until(self.peer_typing_until) => {
                    self.peer_typing_until = None;
                    self.set_peer_typing(false).await;
                }
            }
        }
    }

    async fn handle_text(&mut self, text: &str) {
        let event = match parse_message(text) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, raw_message = %text, "Failed to parse chat frame");
                return;
            }
        };

        let applied = self.conversation.write().await.apply(event);
        match applied {
            Applied::Appended(message) => {
                tracing::debug!(message_id = %message.id, sender_id = %message.sender_id, "Chat message received");
                self.publisher.emit(ChatEvent::MessageAppended(message));
            }
            Applied::Deleted(message_id) => {
                tracing::debug!(message_id = %message_id, "Chat message deleted");
                self.publisher.emit(ChatEvent::MessageDeleted { message_id });
            }
            Applied::PeerTyping(is_typing) => {
                let ttl = self.settings.peer_typing_ttl;
                self.peer_typing_until = is_typing.then(|| Instant::now() + ttl);
                self.publisher.emit(ChatEvent::PeerTyping { is_typing });
            }
            Applied::Ignored => {
                tracing::trace!("Chat frame not for this conversation");
            }
        }
    }

    /// Execute a caller command against the open socket. A failed write
    /// ends the session with the returned reason.
    async fn handle_command(
        &mut self,
        command: Command,
        sink: &mut FrameSink,
    ) -> Result<(), CloseReason> {
        match command {
            Command::Send { content, reply } => {
                let event = OutboundEvent::chat_message(&self.peer.id, content);
                match send_event(sink, &event).await {
                    Ok(()) => {
                        tracing::debug!(peer_id = %self.peer.id, "Chat message sent");
                        let _ = reply.send(Ok(()));
                        Ok(())
                    }
                    Err(e) => {
                        self.publisher.notice(notices::CONNECTION_LOST);
                        let _ = reply.send(Err(SendError::ConnectionLost));
                        Err(CloseReason::Error(e.to_string()))
                    }
                }
            }
            Command::Keystroke => {
                send_event(sink, &OutboundEvent::typing(&self.peer.id, true))
                    .await
                    .map_err(|e| CloseReason::Error(e.to_string()))?;
                self.typing.keystroke(Instant::now());
                Ok(())
            }
        }
    }

    /// Answer a command that arrived while the socket is not open.
    fn reject(&self, command: Command) {
        match command {
            Command::Send { reply, .. } => {
                tracing::debug!(peer_id = %self.peer.id, "Send rejected, socket not open");
                self.publisher.notice(notices::CONNECTION_LOST);
                let _ = reply.send(Err(SendError::ConnectionLost));
            }
            Command::Keystroke => {}
        }
    }

    /// Sleep out the reconnect delay. Returns `false` if cancelled.
    async fn wait(&mut self, delay: Duration) -> bool {
        tracing::info!(
            peer_id = %self.peer.id,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting to chat after delay",
        );
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => return false,
                _ = &mut sleep => return true,
                Some(command) = self.commands.recv() => self.reject(command),
            }
        }
    }

    async fn set_peer_typing(&mut self, is_typing: bool) {
        let changed = {
            let mut conversation = self.conversation.write().await;
            let changed = conversation.is_peer_typing() != is_typing;
            conversation.set_peer_typing(is_typing);
            changed
        };
        if changed {
            self.publisher.emit(ChatEvent::PeerTyping { is_typing });
        }
    }

    async fn on_disconnect(&mut self) {
        self.typing.cancel();
        self.peer_typing_until = None;
        self.set_peer_typing(false).await;
        self.publisher.set_state(ConnectionState::Disconnected);
    }
}

/// Encode and write one outbound frame.
async fn send_event(sink: &mut FrameSink, event: &OutboundEvent) -> Result<(), ChatClientError> {
    let frame = event
        .to_frame()
        .map_err(|e| ChatClientError::Protocol(e.to_string()))?;
    sink.send(frame)
        .await
        .map_err(|e| ChatClientError::Protocol(e.to_string()))
}

/// Why an outbound frame was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The socket is not open (connecting, waiting to reconnect, or the
    /// write failed).
    #[error("Connection lost")]
    ConnectionLost,

    /// The connection task is not running.
    #[error("Chat connection is closed")]
    Closed,
}

/// Errors from [`ChatManager::connect`].
#[derive(Debug, thiserror::Error)]
pub enum ChatManagerError {
    /// The session holds no credentials.
    #[error("Login required")]
    LoginRequired,

    #[error(transparent)]
    Client(#[from] ChatClientError),
}
