use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::{ChannelRef, IncomingPost, Recipient},
    Result,
};

/// Hexagonal port for the messaging platform.
///
/// The Telegram user-client adapter implements this; tests use in-memory fakes.
/// A transport flood wait must surface as `Error::RateLimited`, an unknown or
/// privacy-restricted recipient as `Error::Resolution`.
#[async_trait]
pub trait MessengerPort: Send + Sync {
    /// Join a public channel by its identifier (`@name`, `name` or a t.me link).
    async fn join_channel(&self, channel: &str) -> Result<()>;

    async fn resolve_channel(&self, channel: &str) -> Result<ChannelRef>;

    /// Resolve a bare handle (no `@`) to a recipient.
    async fn resolve_user(&self, handle: &str) -> Result<Recipient>;

    async fn send_text(&self, to: &Recipient, text: &str) -> Result<()>;

    async fn send_file(&self, to: &Recipient, path: &Path, caption: &str) -> Result<()>;

    /// Next new message from any chat. `Ok(None)` means the update stream ended.
    async fn next_post(&self) -> Result<Option<IncomingPost>>;

    async fn disconnect(&self) -> Result<()>;
}

/// Port for a generative-language completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}
