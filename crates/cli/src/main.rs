//! bridgeai-chat: terminal chat with one peer.
//!
//! Environment variables:
//!
//! | Variable                | Required | Default                  | Description                        |
//! |-------------------------|----------|--------------------------|------------------------------------|
//! | `CHAT_PEER_ID`          | yes      |                          | User id of the person to chat with |
//! | `CHAT_PEER_NAME`        | no       | `Friend`                 | Display name shown for the peer    |
//! | `BRIDGEAI_EMAIL`        | no       |                          | Used to log in when signed out     |
//! | `BRIDGEAI_PASSWORD`     | no       |                          | Used to log in when signed out     |
//! | `BRIDGEAI_API_URL`      | no       | `http://localhost:8000`  | REST base URL                      |
//! | `BRIDGEAI_WS_URL`       | no       | derived from the API URL | WebSocket base URL                 |
//! | `BRIDGEAI_SESSION_FILE` | no       | `.bridgeai/session.json` | Where the session record is kept   |
//!
//! Chat timings (`CHAT_RECONNECT_DELAY_MS` and friends) are read by
//! [`ClientConfig::from_env`].

use std::sync::Arc;

use anyhow::{bail, Context};
use tokio::io::AsyncBufReadExt;
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use bridgeai_api::BridgeApi;
use bridgeai_chat::conversation::Peer;
use bridgeai_chat::events::ChatEvent;
use bridgeai_chat::manager::ChatManager;
use bridgeai_cli::actions::{mark_conversation_read, refresh_history};
use bridgeai_cli::input::{parse_line, InputLine, HELP};
use bridgeai_cli::render::{render_event, render_message};
use bridgeai_core::config::ClientConfig;
use bridgeai_core::models::auth::LoginRequest;
use bridgeai_core::session::{FileSessionStore, SessionContext};

const DEFAULT_PEER_NAME: &str = "Friend";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "bridgeai_cli=info,bridgeai_chat=info,bridgeai_api=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run().await
}

async fn run() -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("Invalid configuration")?;
    let peer_id = std::env::var("CHAT_PEER_ID").context("CHAT_PEER_ID must be set")?;
    let peer_name = std::env::var("CHAT_PEER_NAME").unwrap_or_else(|_| DEFAULT_PEER_NAME.into());
    let peer = Peer::new(peer_id, peer_name);

    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let session = SessionContext::load(store)
        .await
        .context("Failed to load session")?;
    let api = BridgeApi::new(&config, session.clone())?;

    if !session.is_authenticated().await {
        sign_in_from_env(&api).await?;
    }

    tracing::info!(
        api_url = %config.api_url,
        ws_url = %config.ws_url,
        peer_id = %peer.id,
        "Starting chat",
    );

    let manager = ChatManager::new(&config, session.clone(), peer.clone());
    let mut events = manager.subscribe();

    load_history(&api, &manager).await;
    manager
        .connect()
        .await
        .context("Could not start the chat connection")?;
    println!("{HELP}");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match parse_line(&line) {
                    InputLine::Blank => {}
                    InputLine::Message(text) => {
                        manager.set_draft(text).await;
                        if let Err(e) = manager.send_draft().await {
                            tracing::debug!(error = %e, "Message not sent");
                        }
                    }
                    InputLine::MarkRead => match mark_conversation_read(&api, &manager).await {
                        Ok(marked) => println!("-- {marked} message(s) marked read --"),
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to mark conversation read");
                            println!("! {}", e.user_message());
                        }
                    },
                    InputLine::History => load_history(&api, &manager).await,
                    InputLine::Logout => {
                        api.auth().logout().await?;
                        println!("Signed out.");
                        break;
                    }
                    InputLine::Quit => break,
                    InputLine::Help => println!("{HELP}"),
                    InputLine::Unknown(command) => println!("! Unknown command {command}. {HELP}"),
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Some(text) = render_event(&event, &peer.name) {
                            println!("{text}");
                        }
                        if matches!(event, ChatEvent::LoginRequired) {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event output fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    manager.close().await;
    Ok(())
}

/// Log in with `BRIDGEAI_EMAIL` / `BRIDGEAI_PASSWORD`.
async fn sign_in_from_env(api: &BridgeApi) -> anyhow::Result<()> {
    let (Ok(email), Ok(password)) = (
        std::env::var("BRIDGEAI_EMAIL"),
        std::env::var("BRIDGEAI_PASSWORD"),
    ) else {
        bail!("Not signed in. Set BRIDGEAI_EMAIL and BRIDGEAI_PASSWORD to log in.");
    };

    match api.auth().login(&LoginRequest { email, password }).await {
        Ok(response) => {
            tracing::info!(user_id = %response.user_id, "Logged in");
            Ok(())
        }
        Err(e) => bail!("Login failed: {}", e.user_message()),
    }
}

/// Fetch recent history over REST and print it. Failures are shown but
/// do not stop the session.
async fn load_history(api: &BridgeApi, manager: &ChatManager) {
    match refresh_history(api, manager).await {
        Ok(count) => {
            tracing::debug!(count, "History loaded");
            for message in manager.messages().await {
                println!("{}", render_message(&message));
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load chat history");
            println!("! {}", e.user_message());
        }
    }
}
