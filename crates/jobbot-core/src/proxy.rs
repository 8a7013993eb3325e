//! Proxy settings and the transport descriptor derived from them.

use std::fmt;

use tracing::error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProxyKind {
    Socks5,
    Http,
    MtProto,
}

impl ProxyKind {
    /// Case-insensitive parse of `PROXY_TYPE`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "socks5" => Some(Self::Socks5),
            "http" => Some(Self::Http),
            "mtproto" => Some(Self::MtProto),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Socks5 => "socks5",
            Self::Http => "http",
            Self::MtProto => "mtproto",
        }
    }
}

impl fmt::Display for ProxyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated proxy settings as they come out of configuration.
///
/// `kind` is `None` whenever validation disabled the proxy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub kind: Option<ProxyKind>,
    pub server: Option<String>,
    pub port: Option<u16>,
    pub secret: Option<String>,
}

impl ProxySettings {
    pub fn is_enabled(&self) -> bool {
        self.kind.is_some()
    }
}

/// Transport the messaging client should dial through.
#[derive(Clone, PartialEq, Eq)]
pub enum ProxyDescriptor {
    None,
    Socks5 {
        server: String,
        port: u16,
    },
    Http {
        server: String,
        port: u16,
    },
    MtProto {
        server: String,
        port: u16,
        secret: Vec<u8>,
    },
}

impl ProxyDescriptor {
    /// Build the descriptor. Incomplete or malformed settings degrade to `None`.
    pub fn from_settings(settings: &ProxySettings) -> Self {
        let (Some(kind), Some(server), Some(port)) =
            (settings.kind, settings.server.as_ref(), settings.port)
        else {
            return Self::None;
        };
        let server = server.clone();

        match kind {
            ProxyKind::Socks5 => Self::Socks5 { server, port },
            ProxyKind::Http => Self::Http { server, port },
            ProxyKind::MtProto => {
                let Some(raw) = settings.secret.as_deref() else {
                    error!("MTProto proxy requires proxy_secret");
                    return Self::None;
                };
                match hex::decode(raw.trim()) {
                    Ok(secret) => Self::MtProto {
                        server,
                        port,
                        secret,
                    },
                    Err(e) => {
                        error!("invalid proxy_secret format, must be a hex string: {e}");
                        Self::None
                    }
                }
            }
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// URL form for clients that take a proxy URL. MTProto proxies have none.
    pub fn proxy_url(&self) -> Option<String> {
        match self {
            Self::Socks5 { server, port } => Some(format!("socks5://{server}:{port}")),
            Self::Http { server, port } => Some(format!("http://{server}:{port}")),
            Self::None | Self::MtProto { .. } => None,
        }
    }
}

// Keeps the MTProto secret out of logs.
impl fmt::Debug for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Socks5 { server, port } => write!(f, "Socks5({server}:{port})"),
            Self::Http { server, port } => write!(f, "Http({server}:{port})"),
            Self::MtProto { server, port, .. } => write!(f, "MtProto({server}:{port})"),
        }
    }
}
