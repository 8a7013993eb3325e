use std::sync::Arc;

use tracing::{error, info, warn};

use jobbot_core::{
    config::{self, Config},
    generator::ResponseGenerator,
    ports::CompletionClient,
    proxy::ProxyDescriptor,
    session::cleanup_session,
};
use jobbot_gemini::GeminiClient;

#[tokio::main]
async fn main() -> Result<(), jobbot_core::Error> {
    let dotenv = config::load_dotenv();
    jobbot_core::logging::init("jobbot", &config::log_file_path())?;
    if let Err(e) = dotenv {
        warn!("could not load .env: {e}");
    }

    if std::env::args().nth(1).as_deref() == Some("--cleanup-session") {
        let session_file = config::session_file_path();
        if !cleanup_session(&session_file) {
            info!("no session file to clean up at {}", session_file.display());
        }
        return Ok(());
    }

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("configuration error: {e}");
            return Err(e);
        }
    };

    cfg.log_summary();

    let proxy = ProxyDescriptor::from_settings(&cfg.proxy);
    let generator = ResponseGenerator::new(completion_client(&cfg));

    jobbot_telegram::router::run(&cfg, &proxy, generator)
        .await
        .map_err(|e| {
            error!("fatal error: {e:#}");
            jobbot_core::Error::External(format!("telegram bot failed: {e:#}"))
        })?;

    Ok(())
}

fn completion_client(cfg: &Config) -> Option<Arc<dyn CompletionClient>> {
    match GeminiClient::new(&cfg.gemini_api_key, &cfg.gemini_model) {
        Ok(client) => {
            info!("gemini AI configured with model {}", client.model());
            Some(Arc::new(client))
        }
        Err(e) => {
            error!("failed to configure gemini AI: {e}");
            None
        }
    }
}
