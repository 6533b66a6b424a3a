//! Hosted-model backends reached over HTTP.
//!
//! - DeepSeek: OpenAI-compatible `POST {base}/chat/completions`, bearer auth
//! - Google: `POST {base}/models/{model}:generateContent`, API key in the query

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::{preview, Generator};
use crate::config::{Platform, Settings};
use crate::error::{ConfigError, GenerationError};

/// Sampling temperature for every request.
const TEMPERATURE: f32 = 0.7;

/// Characters of instruction and reply shown at info level.
const LOG_PREVIEW_CHARS: usize = 200;

/// Generator backed by a hosted model API.
pub struct HttpGenerator {
    http: HttpClient,
    platform: Platform,
    model_name: String,
    api_key: String,
    api_base: String,
}

impl HttpGenerator {
    /// Build a generator for the platform and model named in `settings`.
    ///
    /// Does not check connectivity; that happens on the first request.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        info!(
            "Initializing {} client for model {}",
            settings.platform, settings.model_name
        );

        Ok(Self {
            http,
            platform: settings.platform,
            model_name: settings.model_name.clone(),
            api_key: settings.api_key.clone(),
            api_base: settings.api_base.clone(),
        })
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    fn endpoint(&self) -> String {
        match self.platform {
            Platform::DeepSeek => format!("{}/chat/completions", self.api_base),
            Platform::Google => {
                format!("{}/models/{}:generateContent", self.api_base, self.model_name)
            }
        }
    }

    async fn send(&self, instruction: &str) -> Result<String, GenerationError> {
        let endpoint = self.endpoint();
        let request = match self.platform {
            Platform::DeepSeek => self
                .http
                .post(&endpoint)
                .bearer_auth(&self.api_key)
                .json(&ChatCompletionRequest {
                    model: &self.model_name,
                    messages: vec![ChatMessage {
                        role: "user",
                        content: instruction,
                    }],
                    temperature: TEMPERATURE,
                    stream: false,
                }),
            Platform::Google => self
                .http
                .post(&endpoint)
                .query(&[("key", self.api_key.as_str())])
                .json(&GenerateContentRequest {
                    contents: vec![Content {
                        role: "user",
                        parts: vec![Part { text: instruction }],
                    }],
                    generation_config: GenerationConfig {
                        temperature: TEMPERATURE,
                    },
                }),
        };

        let response = request
            .send()
            .await
            .map_err(|source| GenerationError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| GenerationError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !status.is_success() {
            return Err(GenerationError::Http {
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        match self.platform {
            Platform::DeepSeek => parse_chat_completion(&endpoint, &body),
            Platform::Google => parse_generate_content(&endpoint, &body),
        }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn generate(&self, instruction: &str) -> Result<String, GenerationError> {
        info!(
            "Calling model {} with prompt (first {LOG_PREVIEW_CHARS} chars): {}...",
            self.model_name,
            preview(instruction, LOG_PREVIEW_CHARS)
        );
        debug!("Full prompt: {instruction}");

        match self.send(instruction).await {
            Ok(reply) => {
                info!(
                    "Model {} returned response (first {LOG_PREVIEW_CHARS} chars): {}...",
                    self.model_name,
                    preview(&reply, LOG_PREVIEW_CHARS)
                );
                debug!("Full response: {reply}");
                Ok(reply)
            }
            Err(e) => {
                error!("Error calling model {}: {e}", self.model_name);
                Err(e)
            }
        }
    }
}

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn malformed(endpoint: &str, reason: impl Into<String>) -> GenerationError {
    GenerationError::MalformedResponse {
        endpoint: endpoint.to_string(),
        reason: reason.into(),
    }
}

/// Extract the assistant text from an OpenAI-style chat completion body.
fn parse_chat_completion(endpoint: &str, body: &str) -> Result<String, GenerationError> {
    let response: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| malformed(endpoint, e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| malformed(endpoint, "no message content in choices"))
}

/// Extract and concatenate the text parts of the first Gemini candidate.
fn parse_generate_content(endpoint: &str, body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| malformed(endpoint, e.to_string()))?;
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .ok_or_else(|| malformed(endpoint, "no candidate content"))?;

    let text: String = parts.into_iter().filter_map(|part| part.text).collect();
    if text.is_empty() {
        return Err(malformed(endpoint, "candidate has no text parts"));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(platform: Platform) -> Settings {
        Settings::from_lookup(|key| match key {
            "API_KEY" => Some("sk-test".to_string()),
            "PLATFORM" => Some(platform.as_str().to_string()),
            "MODEL_NAME" => Some("test-model".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoints_per_platform() {
        let deepseek = HttpGenerator::from_settings(&settings(Platform::DeepSeek)).unwrap();
        assert_eq!(deepseek.endpoint(), "https://api.deepseek.com/chat/completions");
        assert_eq!(deepseek.model_name(), "test-model");

        let google = HttpGenerator::from_settings(&settings(Platform::Google)).unwrap();
        assert_eq!(
            google.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/test-model:generateContent"
        );
        assert_eq!(google.platform(), Platform::Google);
    }

    #[test]
    fn test_parse_chat_completion() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Week 1: basics"}}]}"#;
        assert_eq!(parse_chat_completion("e", body).unwrap(), "Week 1: basics");
    }

    #[test]
    fn test_parse_chat_completion_without_choices() {
        let err = parse_chat_completion("e", r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse { .. }));

        let err = parse_chat_completion("e", "<html>").unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse { .. }));
    }

    #[test]
    fn test_parse_generate_content_joins_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"plan"}]}}]}"#;
        assert_eq!(parse_generate_content("e", body).unwrap(), "Hello plan");
    }

    #[test]
    fn test_parse_generate_content_blocked() {
        let body = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let err = parse_generate_content("e", body).unwrap_err();
        assert!(matches!(err, GenerationError::MalformedResponse { .. }));
    }

    #[test]
    fn test_request_serialization() {
        let chat = serde_json::to_value(ChatCompletionRequest {
            model: "deepseek-chat",
            messages: vec![ChatMessage {
                role: "user",
                content: "hi",
            }],
            temperature: TEMPERATURE,
            stream: false,
        })
        .unwrap();
        assert_eq!(chat["messages"][0]["content"], "hi");
        assert_eq!(chat["stream"], false);

        let gemini = serde_json::to_value(GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        })
        .unwrap();
        assert_eq!(gemini["contents"][0]["parts"][0]["text"], "hi");
        assert!(gemini.get("generationConfig").is_some());
    }
}
