//! Reply delivery: cooldown, recipient resolution, text + resume attachment.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use tracing::{error, info, warn};

use crate::{
    config::Config, cooldown::CooldownTable, domain::Recipient, errors::Error,
    ports::MessengerPort, Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachmentOutcome {
    /// Resume file sent with the portfolio caption.
    File(PathBuf),
    /// File send failed; portfolio link sent as text instead.
    LinkFallback,
    /// No resume file found; portfolio link sent as text.
    LinkOnly,
    /// Neither a file nor a portfolio link could be sent.
    Nothing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent { attachment: AttachmentOutcome },
    CoolingDown,
    Unresolved,
    Failed,
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

pub fn resume_caption(portfolio_url: &str) -> String {
    format!("📄 رزومه و سوابق کاری\n🎨 نمونه کارها: {portfolio_url}")
}

pub fn portfolio_message(portfolio_url: &str) -> String {
    format!("🎨 نمونه کارها: {portfolio_url}")
}

/// Where to look for the resume, in probe order.
///
/// Relative paths resolve against the working directory; `anchor` is the
/// directory of the running binary.
pub fn resume_candidates(filename: &str, anchor: Option<&Path>) -> Vec<PathBuf> {
    let mut out = vec![Path::new("resume").join(filename), PathBuf::from(filename)];
    if let Some(dir) = anchor {
        out.push(dir.join("resume").join(filename));
        out.push(dir.join(filename));
    }
    out
}

pub fn locate_resume(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .find(|p| p.exists())
        .map(PathBuf::as_path)
}

fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
}

pub struct DeliveryEngine {
    cooldown: CooldownTable,
    resume_candidates: Vec<PathBuf>,
    portfolio_url: String,
}

impl DeliveryEngine {
    pub fn new(cfg: &Config) -> Self {
        Self::with_parts(
            CooldownTable::default(),
            resume_candidates(&cfg.resume_filename, exe_dir().as_deref()),
            cfg.portfolio_url.clone(),
        )
    }

    pub fn with_parts(
        cooldown: CooldownTable,
        resume_candidates: Vec<PathBuf>,
        portfolio_url: String,
    ) -> Self {
        Self {
            cooldown,
            resume_candidates,
            portfolio_url,
        }
    }

    pub fn cooldown(&self) -> &CooldownTable {
        &self.cooldown
    }

    /// Send `text` and the resume to `handle`.
    ///
    /// Only `Error::RateLimited` is returned as an error; every other failure
    /// is logged and reported through the outcome.
    pub async fn deliver(
        &mut self,
        port: &dyn MessengerPort,
        handle: &str,
        text: &str,
    ) -> Result<DeliveryOutcome> {
        let now = Instant::now();
        if self.cooldown.is_cooling_down_at(handle, now) {
            info!("rate limiting: skipping message to {handle}");
            return Ok(DeliveryOutcome::CoolingDown);
        }

        let recipient = match port.resolve_user(handle).await {
            Ok(r) => r,
            Err(e @ Error::RateLimited { .. }) => return Err(e),
            Err(e) => {
                warn!("user not reachable: {handle}: {e}");
                return Ok(DeliveryOutcome::Unresolved);
            }
        };

        match port.send_text(&recipient, text).await {
            Ok(()) => info!("message sent to {handle}"),
            Err(e @ Error::RateLimited { .. }) => {
                warn!("flood wait while messaging {handle}: {e}");
                return Err(e);
            }
            Err(e) => {
                error!("error sending message to {handle}: {e}");
                return Ok(DeliveryOutcome::Failed);
            }
        }

        self.cooldown.record_at(handle, now);

        let attachment = self.send_resume(port, &recipient).await?;
        Ok(DeliveryOutcome::Sent { attachment })
    }

    async fn send_resume(
        &self,
        port: &dyn MessengerPort,
        to: &Recipient,
    ) -> Result<AttachmentOutcome> {
        let Some(path) = locate_resume(&self.resume_candidates) else {
            warn!("resume file not found at any of the expected paths");
            return self.send_portfolio_link(port, to, AttachmentOutcome::LinkOnly).await;
        };

        match port
            .send_file(to, path, &resume_caption(&self.portfolio_url))
            .await
        {
            Ok(()) => {
                info!("resume file sent to {}", to.handle);
                Ok(AttachmentOutcome::File(path.to_path_buf()))
            }
            Err(e) => {
                error!("error sending resume file to {}: {e}", to.handle);
                self.send_portfolio_link(port, to, AttachmentOutcome::LinkFallback)
                    .await
            }
        }
    }

    async fn send_portfolio_link(
        &self,
        port: &dyn MessengerPort,
        to: &Recipient,
        on_success: AttachmentOutcome,
    ) -> Result<AttachmentOutcome> {
        if self.portfolio_url.is_empty() {
            return Ok(AttachmentOutcome::Nothing);
        }
        match port
            .send_text(to, &portfolio_message(&self.portfolio_url))
            .await
        {
            Ok(()) => Ok(on_success),
            Err(e @ Error::RateLimited { .. }) => Err(e),
            Err(e) => {
                warn!("could not send portfolio link to {}: {e}", to.handle);
                Ok(AttachmentOutcome::Nothing)
            }
        }
    }
}
