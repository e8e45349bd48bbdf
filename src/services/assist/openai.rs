//! OpenAI-style `chat/completions` provider.
//!
//! Works against any endpoint speaking the same wire shape by overriding
//! the base URL.

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::config::ProviderSettings;
use crate::errors::AssistError;

use super::{error_snippet, GenerationOptions, TextGenerator};

const PROVIDER: &str = "openai";

pub struct OpenAiProvider {
    client: reqwest::Client,
    settings: ProviderSettings,
}

impl OpenAiProvider {
    pub fn new(client: reqwest::Client, settings: ProviderSettings) -> Self {
        Self { client, settings }
    }

    fn chat_completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop: Vec<String>,
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
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[async_trait]
impl TextGenerator for OpenAiProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, AssistError> {
        // top_k has no equivalent on this wire shape and is ignored.
        let payload = ChatRequest {
            model: &self.settings.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: options.temperature,
            top_p: options.top_p,
            max_tokens: options.max_output_tokens,
            stop: options.stop_sequences.clone(),
        };

        let response = self
            .client
            .post(self.chat_completions_url())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.settings.api_key),
            )
            .json(&payload)
            .send()
            .await
            .map_err(|source| AssistError::Request {
                provider: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: error_snippet(&body),
            });
        }

        let reply: ChatResponse = response.json().await.map_err(|e| AssistError::Malformed {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        let text = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AssistError::Malformed {
                provider: PROVIDER,
                message: "reply carried no choice text".to_string(),
            });
        }

        Ok(text)
    }
}

impl std::fmt::Debug for OpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("model", &self.settings.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
