use std::time::Duration;

/// Core error type for the bot.
///
/// Adapter crates map their library errors into this type so the pipeline can
/// tell the one retryable case (`RateLimited`) apart from everything else.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Flood control from the messaging transport. The caller pauses for `wait`.
    #[error("rate limited by transport, retry after {}s", wait.as_secs())]
    RateLimited { wait: Duration },

    #[error("could not resolve recipient: {0}")]
    Resolution(String),

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external error: {0}")]
    External(String),
}

impl Error {
    /// Wait duration if this is a transport rate limit.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Error::RateLimited { wait } => Some(*wait),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Non-fatal configuration problems. Each one is logged and startup continues.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigWarning {
    #[error("invalid type for optional variable {key}: expected {expected}")]
    InvalidOptional { key: String, expected: &'static str },

    #[error("unsupported proxy type: {0}. Supported types: socks5, http, mtproto")]
    UnsupportedProxyType(String),

    #[error("MTProto proxy requires PROXY_SECRET")]
    MissingProxySecret,

    #[error("invalid proxy port: {0}")]
    InvalidProxyPort(i64),

    #[error("proxy type specified but server/port missing")]
    IncompleteProxy,

    #[error("invalid URL format for {key}: {url}")]
    InvalidUrl { key: &'static str, url: String },
}
