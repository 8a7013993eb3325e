//! Telegram adapter (grammers MTProto user client).
//!
//! This crate implements the `jobbot-core` MessengerPort over a logged-in user
//! account, so the bot can join channels and message arbitrary `@handles`.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use grammers_client::{types::Chat, Client, InputMessage, InvocationError, Update};
use grammers_session::PackedChat;

pub mod login;
pub mod router;

use jobbot_core::{
    domain::{ChannelRef, ChatId, IncomingPost, MessageId, Recipient},
    errors::Error,
    ports::MessengerPort,
    Result,
};

/// RPC errors that mean the peer cannot be addressed at all.
const UNREACHABLE_PEER_ERRORS: &[&str] = &[
    "USERNAME_INVALID",
    "USERNAME_NOT_OCCUPIED",
    "USER_PRIVACY_RESTRICTED",
    "PEER_ID_INVALID",
    "USER_IS_BLOCKED",
    "INPUT_USER_DEACTIVATED",
];

/// RPC errors that carry a wait in seconds.
const WAIT_ERRORS: &[&str] = &["FLOOD_WAIT", "FLOOD_PREMIUM_WAIT", "SLOWMODE_WAIT"];

pub struct TelegramMessenger {
    client: Client,
    session_file: PathBuf,
    // Access hashes of every peer we resolved, keyed by bare id.
    peers: Mutex<HashMap<i64, PackedChat>>,
}

impl TelegramMessenger {
    pub fn new(client: Client, session_file: PathBuf) -> Self {
        Self {
            client,
            session_file,
            peers: Mutex::new(HashMap::new()),
        }
    }

    fn remember(&self, chat: &Chat) {
        if let Ok(mut peers) = self.peers.lock() {
            peers.insert(chat.id(), chat.pack());
        }
    }

    fn packed(&self, to: &Recipient) -> Result<PackedChat> {
        self.peers
            .lock()
            .ok()
            .and_then(|peers| peers.get(&to.id.0).copied())
            .ok_or_else(|| Error::Resolution(format!("recipient {} was never resolved", to.handle)))
    }

    async fn resolve(&self, name: &str) -> Result<Chat> {
        let username = normalize_username(name);
        match self.client.resolve_username(username).await {
            Ok(Some(chat)) => {
                self.remember(&chat);
                Ok(chat)
            }
            Ok(None) => Err(Error::Resolution(format!("not found: {username}"))),
            Err(e) => Err(map_err(e, Error::Resolution)),
        }
    }
}

/// `@name`, `name`, `t.me/name` and `https://t.me/name` all become `name`.
pub fn normalize_username(raw: &str) -> &str {
    let s = raw.trim();
    let s = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"))
        .unwrap_or(s);
    let s = s
        .strip_prefix("t.me/")
        .or_else(|| s.strip_prefix("telegram.me/"))
        .unwrap_or(s);
    let s = s.strip_prefix('@').unwrap_or(s);
    s.trim_end_matches('/')
}

/// Map a grammers error into the core taxonomy.
fn map_err(e: InvocationError, other: fn(String) -> Error) -> Error {
    let detail = format!("telegram error: {e}");
    match &e {
        InvocationError::Rpc(rpc) => classify_rpc(&rpc.name, rpc.value, detail, other),
        _ => other(detail),
    }
}

/// Flood waits become `RateLimited`, unreachable peers `Resolution`, and
/// everything else goes through `other`.
fn classify_rpc(
    name: &str,
    value: Option<u32>,
    detail: String,
    other: fn(String) -> Error,
) -> Error {
    if WAIT_ERRORS.contains(&name) {
        return Error::RateLimited {
            wait: Duration::from_secs(u64::from(value.unwrap_or(0))),
        };
    }
    if UNREACHABLE_PEER_ERRORS.contains(&name) {
        return Error::Resolution(detail);
    }
    other(detail)
}

#[async_trait]
impl MessengerPort for TelegramMessenger {
    async fn join_channel(&self, channel: &str) -> Result<()> {
        let chat = self.resolve(channel).await?;
        self.client
            .join_chat(chat.pack())
            .await
            .map_err(|e| map_err(e, Error::External))?;
        Ok(())
    }

    async fn resolve_channel(&self, channel: &str) -> Result<ChannelRef> {
        let chat = self.resolve(channel).await?;
        Ok(ChannelRef {
            id: ChatId(chat.id()),
            name: channel.to_string(),
        })
    }

    async fn resolve_user(&self, handle: &str) -> Result<Recipient> {
        let chat = self.resolve(handle).await?;
        Ok(Recipient {
            id: ChatId(chat.id()),
            handle: normalize_username(handle).to_string(),
        })
    }

    async fn send_text(&self, to: &Recipient, text: &str) -> Result<()> {
        let peer = self.packed(to)?;
        self.client
            .send_message(peer, text)
            .await
            .map_err(|e| map_err(e, Error::Delivery))?;
        Ok(())
    }

    async fn send_file(&self, to: &Recipient, path: &Path, caption: &str) -> Result<()> {
        let peer = self.packed(to)?;
        let uploaded = self
            .client
            .upload_file(path)
            .await
            .map_err(|e| Error::Delivery(format!("upload of {} failed: {e}", path.display())))?;
        self.client
            .send_message(peer, InputMessage::text(caption).document(uploaded))
            .await
            .map_err(|e| map_err(e, Error::Delivery))?;
        Ok(())
    }

    async fn next_post(&self) -> Result<Option<IncomingPost>> {
        loop {
            let update = self
                .client
                .next_update()
                .await
                .map_err(|e| map_err(e, Error::External))?;

            let Update::NewMessage(message) = update else {
                continue;
            };
            if message.outgoing() {
                continue;
            }

            return Ok(Some(IncomingPost {
                chat_id: ChatId(message.chat().id()),
                message_id: MessageId(message.id()),
                text: message.text().to_string(),
            }));
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.client.session().save_to_file(&self.session_file)?;
        Ok(())
    }
}
