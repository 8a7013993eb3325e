/// Telegram chat/peer id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric, unique per chat).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// Dedup key for an incoming post.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageKey {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// A new message observed in some chat.
#[derive(Clone, Debug)]
pub struct IncomingPost {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub text: String,
}

impl IncomingPost {
    pub fn key(&self) -> MessageKey {
        MessageKey {
            chat_id: self.chat_id,
            message_id: self.message_id,
        }
    }
}

/// A watched channel that was resolved to an addressable entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelRef {
    pub id: ChatId,
    pub name: String,
}

/// A resolved recipient for outbound replies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipient {
    pub id: ChatId,
    pub handle: String,
}
