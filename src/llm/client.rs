//! OpenAI-compatible chat-completions client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ApiKey, Prompt, TextGenerator};
use crate::config::Config;
use crate::error::LlmError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct LlmClient {
    http: Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let endpoint = format!("{}/chat/completions", config.api_base_url.trim_end_matches('/'));
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| LlmError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        Ok(Self {
            http,
            endpoint,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TextGenerator for LlmClient {
    async fn complete(&self, key: &ApiKey, prompt: &Prompt) -> Result<String, LlmError> {
        debug!(model = %self.model, chars = prompt.user.len(), "calling model");

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|source| LlmError::Request {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "model provider rejected credentials");
            return Err(LlmError::Auth {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "model provider returned an error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: message.chars().take(300).collect(),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|source| LlmError::Request {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| LlmError::EmptyResponse {
                model: self.model.clone(),
            })?;

        debug!(model = %self.model, chars = content.len(), "model call succeeded");
        Ok(content)
    }
}
