use std::{env, path::PathBuf};

use tracing::{info, warn};

use crate::{
    errors::{ConfigWarning, Error},
    proxy::{ProxyKind, ProxySettings},
    Result,
};

pub const DEFAULT_RESUME_FILENAME: &str = "javad-rostami resume.pdf";
pub const DEFAULT_SESSION_FILE: &str = "telegram_ui_bot_session.session";
pub const DEFAULT_LOG_FILE: &str = "telegram_bot.log";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-pro";

/// Typed configuration, built once at startup from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram client credentials
    pub api_id: i32,
    pub api_hash: String,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub session_file: PathBuf,

    // Generative model
    pub gemini_api_key: String,
    pub gemini_model: String,

    // Watch list, in input order
    pub channels: Vec<String>,

    // Reply payload
    pub portfolio_url: String,
    pub cv_url: Option<String>,
    pub resume_filename: String,

    pub proxy: ProxySettings,

    /// Everything validation complained about without failing.
    pub warnings: Vec<ConfigWarning>,
}

/// Load `.env` into the process environment. Existing variables win.
///
/// A missing file is fine; a malformed one is returned so the caller can log
/// it once logging is up.
pub fn load_dotenv() -> std::result::Result<(), dotenvy::Error> {
    missing_is_ok(dotenvy::dotenv().map(|_| ()))
}

fn missing_is_ok(
    result: std::result::Result<(), dotenvy::Error>,
) -> std::result::Result<(), dotenvy::Error> {
    match result {
        Err(e) if e.not_found() => Ok(()),
        other => other,
    }
}

/// Log file path (`LOG_FILE`), needed before the rest of the config is loaded.
pub fn log_file_path() -> PathBuf {
    path_or(env_str("LOG_FILE"), DEFAULT_LOG_FILE)
}

/// Session file path (`SESSION_FILE`), readable without a valid config.
pub fn session_file_path() -> PathBuf {
    path_or(env_str("SESSION_FILE"), DEFAULT_SESSION_FILE)
}

fn path_or(value: Option<String>, default: &str) -> PathBuf {
    value
        .and_then(non_empty)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(env_str)
    }

    /// Build and validate a config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).and_then(non_empty);
        let mut warnings = Vec::new();

        // Required
        let api_id = required(&get, "API_ID")?;
        let api_id = api_id.trim().parse::<i32>().map_err(|_| {
            Error::Config("invalid type for API_ID: expected integer".to_string())
        })?;
        let api_hash = required(&get, "API_HASH")?;
        let gemini_api_key = required(&get, "GEMINI_API_KEY")?;
        let channels = parse_channels(&required(&get, "CHANNELS")?);
        if channels.is_empty() {
            return Err(Error::Config(
                "no valid channels found in CHANNELS environment variable".to_string(),
            ));
        }
        let portfolio_url = required(&get, "PORTFOLIO_URL")?;

        // Optional
        let cv_url = get("CV_URL");
        let resume_filename =
            get("RESUME_FILENAME").unwrap_or_else(|| DEFAULT_RESUME_FILENAME.to_string());
        let phone = get("TELEGRAM_PHONE");
        let password = get("TELEGRAM_PASSWORD");
        let session_file = path_or(get("SESSION_FILE"), DEFAULT_SESSION_FILE);
        let gemini_model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        let proxy = validate_proxy(
            get("PROXY_TYPE"),
            get("PROXY_SERVER"),
            get("PROXY_PORT"),
            get("PROXY_SECRET"),
            &mut warnings,
        );

        for (key, url) in [
            ("PORTFOLIO_URL", Some(&portfolio_url)),
            ("CV_URL", cv_url.as_ref()),
        ] {
            if let Some(url) = url {
                if !is_http_url(url) {
                    push_warning(
                        &mut warnings,
                        ConfigWarning::InvalidUrl {
                            key,
                            url: url.clone(),
                        },
                    );
                }
            }
        }

        info!("configuration validation completed");

        Ok(Self {
            api_id,
            api_hash,
            phone,
            password,
            session_file,
            gemini_api_key,
            gemini_model,
            channels,
            portfolio_url,
            cv_url,
            resume_filename,
            proxy,
            warnings,
        })
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let set = |present: bool| if present { "Set" } else { "Not set" };
        vec![
            format!("API ID: {}", self.api_id),
            format!("Channels: {} channels configured", self.channels.len()),
            format!(
                "Proxy: {}",
                match self.proxy.kind {
                    Some(kind) => format!("Enabled ({kind})"),
                    None => "Disabled".to_string(),
                }
            ),
            format!("Portfolio URL: {}", set(!self.portfolio_url.is_empty())),
            format!("CV URL: {}", set(self.cv_url.is_some())),
            format!("Resume file: {}", self.resume_filename),
        ]
    }

    pub fn log_summary(&self) {
        info!("=== Configuration Summary ===");
        for line in self.summary_lines() {
            info!("{line}");
        }
        info!("=============================");
    }
}

fn validate_proxy(
    raw_type: Option<String>,
    server: Option<String>,
    raw_port: Option<String>,
    secret: Option<String>,
    warnings: &mut Vec<ConfigWarning>,
) -> ProxySettings {
    let mut port = raw_port.and_then(|p| match p.trim().parse::<i64>() {
        Ok(n) => Some(n),
        Err(_) => {
            push_warning(
                warnings,
                ConfigWarning::InvalidOptional {
                    key: "PROXY_PORT".to_string(),
                    expected: "integer",
                },
            );
            None
        }
    });

    if let Some(n) = port {
        if !(1..=65535).contains(&n) {
            push_warning(warnings, ConfigWarning::InvalidProxyPort(n));
            port = None;
        }
    }
    let port = port.and_then(|n| u16::try_from(n).ok());

    let mut kind = None;
    if let Some(raw) = raw_type.as_deref() {
        kind = ProxyKind::parse(raw);
        if kind.is_none() {
            push_warning(
                warnings,
                ConfigWarning::UnsupportedProxyType(raw.to_string()),
            );
        }
        if kind == Some(ProxyKind::MtProto) && secret.is_none() {
            push_warning(warnings, ConfigWarning::MissingProxySecret);
            kind = None;
        }
        if server.is_none() || port.is_none() {
            push_warning(warnings, ConfigWarning::IncompleteProxy);
        }
    }

    ProxySettings {
        kind,
        server,
        port,
        secret,
    }
}

fn push_warning(warnings: &mut Vec<ConfigWarning>, w: ConfigWarning) {
    warn!("{w}");
    warnings.push(w);
}

fn required(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    get(key).ok_or_else(|| {
        Error::Config(format!("required environment variable {key} is missing"))
    })
}

/// Split a comma list, trimming entries and dropping empty ones. Order is kept.
pub fn parse_channels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
