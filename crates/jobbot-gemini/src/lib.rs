//! Gemini adapter (reply generation).
//!
//! Implements the core `CompletionClient` port over the `generateContent` REST endpoint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use jobbot_core::{errors::Error, ports::CompletionClient, Result};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<PartIn<'a>>,
}

#[derive(Debug, Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    text: Option<String>,
}

#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Generation("gemini api key is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Generation(format!("gemini client build error: {e}")))?;
        Ok(Self {
            api_key,
            model: model.into(),
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/models/{}:generateContent", self.model)
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![PartIn { text: prompt }],
            }],
        };

        let url = self.endpoint();
        debug!("sending request to gemini: {url}");

        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("gemini request error: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "gemini generateContent failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| Error::Generation(format!("gemini json error: {e}")))?;

        first_candidate_text(parsed)
    }
}

fn first_candidate_text(resp: GenerateResponse) -> Result<String> {
    let text = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::Generation(
            "gemini returned no candidate text".to_string(),
        ));
    }
    Ok(text)
}
