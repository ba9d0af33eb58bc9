use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::extract::{extract_json_payload, parse_analysis};
use super::keywords::local_keyword_fallback;
use super::prompt::build_prompt;
use crate::config::{Credentials, LlmConfig, LLM_API_KEY_VAR};
use crate::error::{Error, Result};
use crate::models::ReviewAnalysis;

/// Characters of review or model text kept in a fallback summary.
const FALLBACK_SUMMARY_CHARS: usize = 200;

/// Prefix of the summary built when the provider is unavailable ("review content: ").
const API_FALLBACK_PREFIX: &str = "评价内容：";

/// Client for the chat-completion provider.
///
/// NOTE: Do NOT derive `Debug` on this struct, `api_key` would be exposed.
#[derive(Clone)]
pub struct ReviewAnalysisClient {
    http: Client,
    api_key: String,
    endpoint: Url,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ReviewAnalysisClient {
    pub fn new(api_key: impl Into<String>, config: &LlmConfig) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Configuration(format!("{LLM_API_KEY_VAR} is empty")));
        }

        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            Error::Configuration(format!("invalid completion endpoint {}: {e}", config.endpoint))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the client from environment credentials, failing if the key is absent.
    pub fn from_credentials(credentials: &Credentials, config: &LlmConfig) -> Result<Self> {
        let api_key = credentials
            .llm_api_key
            .as_deref()
            .ok_or_else(|| Error::Configuration(format!("{LLM_API_KEY_VAR} not set")))?;
        Self::new(api_key, config)
    }

    /// Summarize the safety aspects of a review and extract keywords.
    ///
    /// Never fails: provider errors and unparseable replies fall back to a
    /// vocabulary scan of `review`, so `keywords` is non-empty on every fallback.
    pub async fn analyze_review(&self, review: &str) -> ReviewAnalysis {
        let outcome = self
            .complete(&build_prompt(review))
            .await
            .and_then(|content| interpret_completion(&content, review));

        match outcome {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "Review analysis unavailable, using keyword fallback");
                ReviewAnalysis {
                    summary: format!(
                        "{API_FALLBACK_PREFIX}{}",
                        truncate_chars(review, FALLBACK_SUMMARY_CHARS)
                    ),
                    keywords: local_keyword_fallback(review),
                }
            }
        }
    }

    /// One non-streaming completion call. No retries.
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!(
                "completion API returned {status}: {body_text}"
            )));
        }

        let envelope: ChatResponse = response.json().await?;
        let choice = envelope
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Upstream("completion API returned no choices".into()))?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .unwrap_or_default();
        debug!(chars = content.chars().count(), "Received completion");
        Ok(content)
    }
}

/// Turn model output into an analysis, falling back when it is not valid JSON.
///
/// Valid JSON that is not an object (a bare array or string) is reported as an
/// upstream error, so the caller takes the provider-failure path instead.
fn interpret_completion(content: &str, review: &str) -> Result<ReviewAnalysis> {
    let payload = extract_json_payload(content);
    match parse_analysis(payload) {
        Ok(analysis) => Ok(analysis),
        Err(e) if is_non_object_json(payload) => Err(Error::Upstream(format!(
            "model reply is not a JSON object: {e}"
        ))),
        Err(e) => {
            warn!(error = %e, "Model reply is not valid JSON, using keyword fallback");
            Ok(ReviewAnalysis {
                summary: truncate_chars(content, FALLBACK_SUMMARY_CHARS).to_string(),
                keywords: local_keyword_fallback(review),
            })
        }
    }
}

fn is_non_object_json(payload: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(payload).is_ok_and(|value| !value.is_object())
}

/// The first `max` characters of `text`.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
