//! Text-generation client for assisted idea drafting and scoring.
//!
//! One capability, "produce text from a prompt", behind interchangeable
//! hosted providers. Callers are expected to treat every generation
//! failure as recoverable and fall back to templated text.

mod gemini;
mod mock;
mod openai;

pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::Settings;
use crate::errors::AssistError;

/// Upper bound for one provider round trip.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Generation knobs, passed through to whichever provider is active.
///
/// Providers ignore the knobs their API does not expose.
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub max_output_tokens: Option<u32>,
    pub stop_sequences: Vec<String>,
}

/// The one capability every provider implements.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Short provider label for logs and response metadata
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, AssistError>;
}

/// AssistClient fronts the one configured text-generation provider
#[derive(Clone)]
pub struct AssistClient {
    provider: Arc<dyn TextGenerator>,
}

impl AssistClient {
    /// Select a provider in fixed priority order: Gemini, then OpenAI,
    /// then the deterministic mock outside production.
    ///
    /// # Arguments
    /// * `settings` - Startup settings carrying provider credentials
    /// * `http` - Shared HTTP client, already carrying the request timeout
    ///
    /// # Returns
    /// The client, or `AssistError::Unconfigured` when production has no
    /// provider credentials at all.
    pub fn from_settings(settings: &Settings, http: reqwest::Client) -> Result<Self, AssistError> {
        if let Some(gemini) = &settings.gemini {
            tracing::info!(model = %gemini.model, "Text generation provider: gemini");
            return Ok(Self::new(GeminiProvider::new(http, gemini.clone())));
        }

        if let Some(openai) = &settings.openai {
            tracing::info!(model = %openai.model, "Text generation provider: openai");
            return Ok(Self::new(OpenAiProvider::new(http, openai.clone())));
        }

        if settings.environment.is_production() {
            return Err(AssistError::Unconfigured);
        }

        tracing::warn!("No text generation provider configured; using the deterministic mock");
        Ok(Self::new(MockProvider::new()))
    }

    pub fn new(provider: impl TextGenerator + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Produce text from a prompt. No retry; a failed call is the
    /// caller's cue to fall back.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, AssistError> {
        self.provider.generate(prompt, options).await
    }
}

impl std::fmt::Debug for AssistClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistClient")
            .field("provider", &self.provider.name())
            .finish()
    }
}

const ERROR_BODY_LIMIT: usize = 300;

/// Trim an upstream error body down to a loggable snippet.
fn error_snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.len() <= ERROR_BODY_LIMIT {
        return trimmed.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

/// Pull a 0-10 score out of a model reply.
///
/// Accepts "Score: 8.5", "8.5/10", or a bare leading number; the first
/// number found wins and is clamped into [0, 10]. `None` means the reply
/// is feedback-only.
pub fn extract_score(reply: &str) -> Option<f64> {
    reply
        .split(|c: char| !c.is_ascii_digit() && c != '.')
        .filter(|token| !token.is_empty())
        .find_map(|token| token.trim_matches('.').parse::<f64>().ok())
        .map(|value| value.clamp(0.0, 10.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Environment, ProviderSettings};

    fn settings_without_providers(environment: Environment) -> Settings {
        Settings {
            environment,
            bind_addr: "127.0.0.1:0".to_string(),
            database_url: "sqlite::memory:".to_string(),
            token_lifetime_minutes: 60,
            allowed_origins: vec![],
            external_auth: None,
            gemini: None,
            openai: None,
        }
    }

    fn provider(model: &str) -> ProviderSettings {
        ProviderSettings {
            api_key: "test-key".to_string(),
            model: model.to_string(),
            base_url: "https://example.invalid/v1".to_string(),
        }
    }

    #[test]
    fn selection_prefers_gemini_over_openai() {
        let mut settings = settings_without_providers(Environment::Production);
        settings.gemini = Some(provider("gemini-2.0-flash"));
        settings.openai = Some(provider("gpt-4o-mini"));

        let client = AssistClient::from_settings(&settings, reqwest::Client::new())
            .expect("provider configured");
        assert_eq!(client.provider_name(), "gemini");
    }

    #[test]
    fn selection_falls_back_to_openai() {
        let mut settings = settings_without_providers(Environment::Production);
        settings.openai = Some(provider("gpt-4o-mini"));

        let client = AssistClient::from_settings(&settings, reqwest::Client::new())
            .expect("provider configured");
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn production_without_providers_is_an_error() {
        let settings = settings_without_providers(Environment::Production);

        let result = AssistClient::from_settings(&settings, reqwest::Client::new());
        assert!(matches!(result, Err(AssistError::Unconfigured)));
    }

    #[test]
    fn development_without_providers_uses_the_mock() {
        let settings = settings_without_providers(Environment::Development);

        let client = AssistClient::from_settings(&settings, reqwest::Client::new())
            .expect("mock always available outside production");
        assert_eq!(client.provider_name(), "mock");
    }

    #[test]
    fn extract_score_reads_common_shapes() {
        assert_eq!(extract_score("Score: 8.5\nGreat idea."), Some(8.5));
        assert_eq!(extract_score("I rate this 7/10"), Some(7.0));
        assert_eq!(extract_score("9"), Some(9.0));
        assert_eq!(extract_score("Solid concept, 8.5."), Some(8.5));
        assert_eq!(extract_score("42 out of anything clamps"), Some(10.0));
    }

    #[test]
    fn extract_score_is_none_for_plain_feedback() {
        assert_eq!(extract_score("Needs a clearer revenue model."), None);
        assert_eq!(extract_score(""), None);
        assert_eq!(extract_score("..."), None);
    }
}
