use tracing::{error, info};

use jobbot_core::{bot, config::Config, generator::ResponseGenerator, proxy::ProxyDescriptor};

use crate::login;

/// Connect, then monitor the configured channels until Ctrl-C.
pub async fn run(
    cfg: &Config,
    proxy: &ProxyDescriptor,
    generator: ResponseGenerator,
) -> anyhow::Result<()> {
    let messenger = login::connect(cfg, proxy).await?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
        info!("bot stopped by user");
    };

    bot::serve(&messenger, cfg, generator, shutdown).await?;
    Ok(())
}
