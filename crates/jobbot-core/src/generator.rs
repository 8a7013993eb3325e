use std::sync::Arc;

use tracing::{error, warn};

use crate::ports::CompletionClient;

/// Reply used whenever the model is unavailable or fails.
pub const FALLBACK_MESSAGE: &str = "🎨 سلام و وقت بخیر

با توجه به آگهی شما در زمینه طراحی UI/UX، تمایل دارم در این پروژه همکاری کنم.
چندین سال تجربه در طراحی رابط کاربری و تجربه کاربری دارم.

در ادامه نمونه کارها و رزومه خود را ارسال می‌کنم.

با تشکر 🙏";

/// Prompt sent to the model. The full post text is embedded verbatim.
pub fn build_prompt(job_text: &str) -> String {
    format!(
        r#"
با توجه به آگهی استخدام زیر، یک پیام حرفه‌ای و دوستانه به زبان فارسی برای ارسال به کارفرما بنویس. پیام باید:

1. مودبانه و حرفه‌ای باشد
2. اشتیاق و علاقه به همکاری را نشان دهد
3. به طور خلاصه به تجربه مرتبط در زمینه طراحی UI/UX اشاره کند
4. حداکثر 3-4 خط باشد
5. با یک ایموجی مناسب شروع شود
6. به درخواست ارسال نمونه کار یا رزومه اشاره کند

متن آگهی:
{job_text}

پیام شخصی‌سازی شده:
"#
    )
}

pub struct ResponseGenerator {
    client: Option<Arc<dyn CompletionClient>>,
}

impl ResponseGenerator {
    pub fn new(client: Option<Arc<dyn CompletionClient>>) -> Self {
        if client.is_none() {
            warn!("no completion client configured, replies will use the fallback template");
        }
        Self { client }
    }

    /// Personalized reply for a job post, or the fallback template.
    pub async fn generate(&self, job_text: &str) -> String {
        let Some(client) = &self.client else {
            return FALLBACK_MESSAGE.to_string();
        };

        match client.complete(&build_prompt(job_text)).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("model returned an empty completion, using fallback");
                FALLBACK_MESSAGE.to_string()
            }
            Err(e) => {
                error!("error generating AI response: {e}");
                FALLBACK_MESSAGE.to_string()
            }
        }
    }
}
