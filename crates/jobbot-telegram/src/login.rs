//! Connecting the user client and interactive sign-in.

use anyhow::Context;
use grammers_client::{Client, Config as ClientConfig, InitParams, SignInError};
use grammers_session::Session;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use jobbot_core::{config::Config, proxy::ProxyDescriptor};

use crate::TelegramMessenger;

/// Build client parameters for the given proxy.
///
/// grammers tunnels through SOCKS5/HTTP only; an MTProto proxy falls back to a
/// direct connection.
pub fn init_params(proxy: &ProxyDescriptor) -> InitParams {
    let mut params = InitParams {
        // Flood waits surface as errors and are handled upstream.
        flood_sleep_threshold: 0,
        ..Default::default()
    };

    match proxy {
        ProxyDescriptor::None => info!("creating client without proxy"),
        ProxyDescriptor::MtProto { server, port, .. } => {
            warn!("MTProto proxy {server}:{port} is not supported by this client, connecting directly");
        }
        other => {
            info!("creating client with proxy {other:?}");
            params.proxy_url = other.proxy_url();
        }
    }
    params
}

/// Open the session file, connect and make sure the account is signed in.
pub async fn connect(cfg: &Config, proxy: &ProxyDescriptor) -> anyhow::Result<TelegramMessenger> {
    let session = Session::load_file_or_create(&cfg.session_file)
        .with_context(|| format!("opening session {}", cfg.session_file.display()))?;

    let client = Client::connect(ClientConfig {
        session,
        api_id: cfg.api_id,
        api_hash: cfg.api_hash.clone(),
        params: init_params(proxy),
    })
    .await
    .context("connecting to telegram")?;

    ensure_authorized(&client, cfg).await?;
    info!("telegram client started");

    Ok(TelegramMessenger::new(client, cfg.session_file.clone()))
}

async fn ensure_authorized(client: &Client, cfg: &Config) -> anyhow::Result<()> {
    if client.is_authorized().await.context("checking authorization")? {
        return Ok(());
    }

    let phone = match &cfg.phone {
        Some(phone) => phone.clone(),
        None => prompt("Phone number (international format): ").await?,
    };
    let token = client
        .request_login_code(&phone)
        .await
        .context("requesting login code")?;
    let code = prompt("Login code: ").await?;

    match client.sign_in(&token, &code).await {
        Ok(_) => {}
        Err(SignInError::PasswordRequired(password_token)) => {
            let password = match &cfg.password {
                Some(password) => password.clone(),
                None => prompt("Two-step verification password: ").await?,
            };
            client
                .check_password(password_token, password.trim())
                .await
                .context("checking two-step password")?;
        }
        Err(e) => return Err(e).context("signing in"),
    }

    client
        .session()
        .save_to_file(&cfg.session_file)
        .context("saving session")?;
    info!("signed in, session saved to {}", cfg.session_file.display());
    Ok(())
}

async fn prompt(message: &str) -> anyhow::Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(message.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socks_proxy_becomes_proxy_url() {
        let proxy = ProxyDescriptor::Socks5 {
            server: "127.0.0.1".to_string(),
            port: 1080,
        };
        let params = init_params(&proxy);
        assert_eq!(params.proxy_url.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(params.flood_sleep_threshold, 0);
    }

    #[test]
    fn mtproto_and_none_connect_directly() {
        let mtproto = ProxyDescriptor::MtProto {
            server: "proxy.example".to_string(),
            port: 443,
            secret: vec![0xde, 0xad],
        };
        assert!(init_params(&mtproto).proxy_url.is_none());
        assert!(init_params(&ProxyDescriptor::None).proxy_url.is_none());
    }
}
