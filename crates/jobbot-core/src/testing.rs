//! In-memory messenger used by the pipeline tests.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;

use crate::{
    domain::{ChannelRef, ChatId, IncomingPost, MessageId, Recipient},
    errors::Error,
    ports::MessengerPort,
    Result,
};

pub fn tmp_path(prefix: &str) -> PathBuf {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_nanos();
    let pid = std::process::id();
    PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}"))
}

pub fn post(chat: i64, id: i32, text: &str) -> IncomingPost {
    IncomingPost {
        chat_id: ChatId(chat),
        message_id: MessageId(id),
        text: text.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sent {
    Text {
        to: i64,
        text: String,
    },
    File {
        to: i64,
        path: PathBuf,
        caption: String,
    },
}

impl Sent {
    pub fn text(to: i64, text: &str) -> Self {
        Self::Text {
            to,
            text: text.to_string(),
        }
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    users: HashMap<String, i64>,
    channels: HashMap<String, i64>,
    unjoinable: HashSet<String>,
    text_rate_limit: Option<Duration>,
    fail_texts: bool,
    fail_files: bool,
    posts: Mutex<VecDeque<Result<IncomingPost>>>,
    sent: Mutex<Vec<Sent>>,
    joined: Mutex<Vec<String>>,
    disconnected: AtomicBool,
}

impl FakeMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, handle: &str, id: i64) -> Self {
        self.users.insert(handle.to_string(), id);
        self
    }

    pub fn with_channel(mut self, name: &str, id: i64) -> Self {
        self.channels.insert(name.to_string(), id);
        self
    }

    pub fn unjoinable(mut self, name: &str) -> Self {
        self.unjoinable.insert(name.to_string());
        self
    }

    pub fn rate_limit_texts(mut self, wait: Duration) -> Self {
        self.text_rate_limit = Some(wait);
        self
    }

    pub fn failing_texts(mut self) -> Self {
        self.fail_texts = true;
        self
    }

    pub fn failing_files(mut self) -> Self {
        self.fail_files = true;
        self
    }

    pub fn queue_post(&self, post: IncomingPost) {
        self.posts.lock().unwrap().push_back(Ok(post));
    }

    pub fn queue_error(&self, err: Error) {
        self.posts.lock().unwrap().push_back(Err(err));
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn joined(&self) -> Vec<String> {
        self.joined.lock().unwrap().clone()
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessengerPort for FakeMessenger {
    async fn join_channel(&self, channel: &str) -> Result<()> {
        if self.unjoinable.contains(channel) {
            return Err(Error::External(format!("cannot join {channel}")));
        }
        self.joined.lock().unwrap().push(channel.to_string());
        Ok(())
    }

    async fn resolve_channel(&self, channel: &str) -> Result<ChannelRef> {
        self.channels
            .get(channel)
            .map(|id| ChannelRef {
                id: ChatId(*id),
                name: channel.to_string(),
            })
            .ok_or_else(|| Error::Resolution(format!("no such channel: {channel}")))
    }

    async fn resolve_user(&self, handle: &str) -> Result<Recipient> {
        self.users
            .get(handle)
            .map(|id| Recipient {
                id: ChatId(*id),
                handle: handle.to_string(),
            })
            .ok_or_else(|| Error::Resolution(format!("user not found: {handle}")))
    }

    async fn send_text(&self, to: &Recipient, text: &str) -> Result<()> {
        if let Some(wait) = self.text_rate_limit {
            return Err(Error::RateLimited { wait });
        }
        if self.fail_texts {
            return Err(Error::Delivery("text rejected".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::text(to.id.0, text));
        Ok(())
    }

    async fn send_file(&self, to: &Recipient, path: &Path, caption: &str) -> Result<()> {
        if self.fail_files {
            return Err(Error::Delivery("upload failed".to_string()));
        }
        self.sent.lock().unwrap().push(Sent::File {
            to: to.id.0,
            path: path.to_path_buf(),
            caption: caption.to_string(),
        });
        Ok(())
    }

    async fn next_post(&self) -> Result<Option<IncomingPost>> {
        match self.posts.lock().unwrap().pop_front() {
            Some(Ok(p)) => Ok(Some(p)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnected.store(true, Ordering::SeqCst);
        Ok(())
    }
}
