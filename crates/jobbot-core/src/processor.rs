//! Per-post pipeline: dedup → classify → extract → generate → deliver.

use tracing::{debug, info};

use crate::{
    classifier::{is_relevant, is_substantive, ContactInfo},
    dedup::SeenMessages,
    delivery::{DeliveryEngine, DeliveryOutcome},
    domain::IncomingPost,
    generator::ResponseGenerator,
    ports::MessengerPort,
    Result,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    Duplicate,
    TooShort,
    NotRelevant,
    NoHandle,
    Skipped(DeliveryOutcome),
    Replied { handle: String },
}

pub struct JobPostProcessor {
    seen: SeenMessages,
    delivery: DeliveryEngine,
    generator: ResponseGenerator,
}

impl JobPostProcessor {
    pub fn new(delivery: DeliveryEngine, generator: ResponseGenerator) -> Self {
        Self {
            seen: SeenMessages::new(),
            delivery,
            generator,
        }
    }

    pub fn seen(&self) -> &SeenMessages {
        &self.seen
    }

    /// Handle one incoming post. Only a transport rate limit is returned as `Err`.
    pub async fn process(
        &mut self,
        port: &dyn MessengerPort,
        post: &IncomingPost,
    ) -> Result<ProcessOutcome> {
        let key = post.key();
        if self.seen.contains(&key) {
            return Ok(ProcessOutcome::Duplicate);
        }
        if !is_substantive(&post.text) {
            return Ok(ProcessOutcome::TooShort);
        }

        debug!(
            "processing message: {}...",
            post.text.chars().take(100).collect::<String>()
        );

        if !is_relevant(&post.text) {
            return Ok(ProcessOutcome::NotRelevant);
        }
        info!("UI/UX job posting detected");

        let contact = ContactInfo::extract(&post.text);
        let Some(handle) = contact.handle else {
            info!("no username found in message");
            return Ok(ProcessOutcome::NoHandle);
        };
        info!("found username: {handle}");
        if contact.phone.is_some() || contact.email.is_some() {
            debug!(
                "additional contact details (unused): phone={:?} email={:?}",
                contact.phone, contact.email
            );
        }

        let reply = self.generator.generate(&post.text).await;

        let outcome = self.delivery.deliver(port, &handle, &reply).await?;
        if !outcome.is_sent() {
            return Ok(ProcessOutcome::Skipped(outcome));
        }

        info!("successfully processed and responded to job posting from {handle}");
        self.seen.insert(key);
        Ok(ProcessOutcome::Replied { handle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cooldown::CooldownTable,
        generator::FALLBACK_MESSAGE,
        testing::{post, FakeMessenger, Sent},
    };
    use std::time::Duration;

    const PORTFOLIO: &str = "https://example.com/p";

    fn processor() -> JobPostProcessor {
        JobPostProcessor::new(
            DeliveryEngine::with_parts(
                CooldownTable::new(Duration::from_secs(30)),
                vec![],
                PORTFOLIO.to_string(),
            ),
            ResponseGenerator::new(None),
        )
    }

    #[tokio::test]
    async fn job_post_gets_fallback_reply_and_link() {
        let port = FakeMessenger::new().with_user("jane_doe", 7);
        let mut p = processor();

        let out = p
            .process(
                &port,
                &post(1, 100, "Looking for a UI/UX designer, contact @jane_doe"),
            )
            .await
            .unwrap();

        assert_eq!(
            out,
            ProcessOutcome::Replied {
                handle: "jane_doe".to_string()
            }
        );
        let sent = port.sent();
        assert_eq!(sent[0], Sent::text(7, FALLBACK_MESSAGE));
        assert_eq!(
            sent[1],
            Sent::text(7, &crate::delivery::portfolio_message(PORTFOLIO))
        );
        assert_eq!(sent.len(), 2);
    }

    #[tokio::test]
    async fn same_message_twice_is_answered_once() {
        let port = FakeMessenger::new().with_user("jane_doe", 7);
        let mut p = processor();
        let msg = post(1, 100, "Looking for a UI/UX designer, contact @jane_doe");

        p.process(&port, &msg).await.unwrap();
        let before = port.sent().len();
        assert_eq!(
            p.process(&port, &msg).await.unwrap(),
            ProcessOutcome::Duplicate
        );
        assert_eq!(port.sent().len(), before);
    }

    #[tokio::test]
    async fn different_post_same_handle_hits_cooldown() {
        let port = FakeMessenger::new().with_user("jane_doe", 7);
        let mut p = processor();

        p.process(&port, &post(1, 1, "UI designer wanted, ping @jane_doe"))
            .await
            .unwrap();
        let out = p
            .process(&port, &post(1, 2, "Another UX role, ping @jane_doe"))
            .await
            .unwrap();
        assert_eq!(out, ProcessOutcome::Skipped(DeliveryOutcome::CoolingDown));
        // Skipped posts are not marked as seen.
        assert_eq!(p.seen().len(), 1);
    }

    #[tokio::test]
    async fn irrelevant_short_or_handleless_posts_send_nothing() {
        let port = FakeMessenger::new().with_user("boss", 9);
        let mut p = processor();

        assert_eq!(
            p.process(&port, &post(1, 1, "Backend Go engineer, DM @boss"))
                .await
                .unwrap(),
            ProcessOutcome::NotRelevant
        );
        assert_eq!(
            p.process(&port, &post(1, 2, "UI @boss")).await.unwrap(),
            ProcessOutcome::TooShort
        );
        assert_eq!(
            p.process(&port, &post(1, 3, "Figma designer needed, email us"))
                .await
                .unwrap(),
            ProcessOutcome::NoHandle
        );
        assert!(port.sent().is_empty());
        assert!(p.seen().is_empty());
    }

    #[tokio::test]
    async fn rate_limit_bubbles_up_and_post_stays_unseen() {
        let port = FakeMessenger::new()
            .with_user("jane_doe", 7)
            .rate_limit_texts(Duration::from_secs(5));
        let mut p = processor();

        let err = p
            .process(&port, &post(1, 1, "UI designer wanted, ping @jane_doe"))
            .await
            .unwrap_err();
        assert_eq!(err.retry_after(), Some(Duration::from_secs(5)));
        assert!(p.seen().is_empty());
    }
}
