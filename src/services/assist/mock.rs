//! Deterministic stand-in provider for development and tests.

use async_trait::async_trait;

use crate::errors::AssistError;

use super::{GenerationOptions, TextGenerator};

/// Never touches the network; the reply is a pure function of the prompt.
#[derive(Debug, Default)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextGenerator for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, AssistError> {
        let seed = prompt
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        let score = 5.0 + (seed % 41) as f64 / 10.0;

        // Score first so that score parsing picks it up, not the char count.
        Ok(format!(
            "Score: {:.1}\nDeterministic development reply for a {}-character prompt.",
            score,
            prompt.chars().count()
        ))
    }
}
