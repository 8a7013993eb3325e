//! Orchestrator: channel setup, the single event loop, and shutdown.

use std::{collections::HashSet, future::Future, time::Duration};

use tracing::{debug, error, info, warn};

use crate::{
    config::Config,
    delivery::DeliveryEngine,
    domain::{ChannelRef, ChatId, IncomingPost},
    errors::Error,
    generator::ResponseGenerator,
    ports::MessengerPort,
    processor::{JobPostProcessor, ProcessOutcome},
    Result,
};

/// Join every configured channel and resolve it to an entity.
///
/// A failed join is only logged; a failed resolve drops the channel. Fails if
/// nothing could be resolved.
pub async fn join_and_resolve(
    port: &dyn MessengerPort,
    channels: &[String],
) -> Result<Vec<ChannelRef>> {
    let mut out = Vec::new();
    for channel in channels {
        match port.join_channel(channel).await {
            Ok(()) => info!("successfully joined channel: {channel}"),
            Err(e) => warn!("could not join channel {channel}: {e}"),
        }

        match port.resolve_channel(channel).await {
            Ok(entity) => {
                info!("added channel entity: {channel}");
                out.push(entity);
            }
            Err(e) => error!("failed to process channel {channel}: {e}"),
        }
    }

    if out.is_empty() {
        return Err(Error::Config(
            "no channels could be joined or resolved".to_string(),
        ));
    }
    Ok(out)
}

/// Run the event loop until the update stream ends or `shutdown` resolves.
///
/// Posts are handled one at a time, in arrival order. `shutdown` is also
/// polled while a post is being processed and during rate-limit waits.
pub async fn run<F>(
    port: &dyn MessengerPort,
    processor: &mut JobPostProcessor,
    channels: &[ChannelRef],
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let watched: HashSet<ChatId> = channels.iter().map(|c| c.id).collect();
    tokio::pin!(shutdown);

    loop {
        let next = tokio::select! {
            _ = &mut shutdown => {
                info!("shutdown requested");
                return Ok(());
            }
            next = port.next_post() => next,
        };

        let wait = match next {
            Ok(Some(post)) if watched.contains(&post.chat_id) => {
                let result = tokio::select! {
                    _ = &mut shutdown => {
                        info!("shutdown requested while processing message {}", post.message_id.0);
                        return Ok(());
                    }
                    result = processor.process(port, &post) => result,
                };
                post_wait(&post, result)
            }
            Ok(Some(_)) => None,
            Ok(None) => {
                info!("update stream closed");
                return Ok(());
            }
            Err(Error::RateLimited { wait }) => {
                warn!("rate limited while receiving updates, waiting {}s", wait.as_secs());
                Some(wait)
            }
            Err(e) => return Err(e),
        };

        if let Some(wait) = wait {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested during rate-limit wait");
                    return Ok(());
                }
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}

/// Log the outcome of one post; a transport rate limit yields the wait.
fn post_wait(post: &IncomingPost, result: Result<ProcessOutcome>) -> Option<Duration> {
    match result {
        Ok(outcome) => {
            debug!(
                "message {} in {}: {outcome:?}",
                post.message_id.0, post.chat_id.0
            );
            None
        }
        Err(Error::RateLimited { wait }) => {
            warn!("rate limited, waiting {} seconds", wait.as_secs());
            Some(wait)
        }
        Err(e) => {
            error!("error processing message: {e}");
            None
        }
    }
}

/// Full bot lifecycle over a connected messenger. Always disconnects.
pub async fn serve<F>(
    port: &dyn MessengerPort,
    cfg: &Config,
    generator: ResponseGenerator,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let result = async move {
        let channels = join_and_resolve(port, &cfg.channels).await?;
        let mut processor = JobPostProcessor::new(DeliveryEngine::new(cfg), generator);

        info!("message handler set up for {} channels", channels.len());
        info!("bot is now running and monitoring channels...");
        run(port, &mut processor, &channels, shutdown).await
    }
    .await;

    if let Err(e) = port.disconnect().await {
        warn!("disconnect failed: {e}");
    }
    info!("bot stopped");
    result
}
