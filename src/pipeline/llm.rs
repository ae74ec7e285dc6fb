//! Model gateway: turn a prompt into generated text.
//!
//! The service only depends on the [`ModelGateway`] contract ("string in,
//! string-or-error out"). [`LlmGateway`] fulfils it through `edgequake-llm`,
//! which already knows how to talk to Gemini, OpenAI, Anthropic and friends.
//!
//! A failed call is surfaced once as [`KitchenError::Provider`]; there is no
//! retry loop here.

use crate::config::ServiceConfig;
use crate::error::KitchenError;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Anything that can complete a prompt.
pub trait ModelGateway: Send + Sync {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, KitchenError>>;
}

/// [`ModelGateway`] backed by an `edgequake-llm` provider.
#[derive(Clone)]
pub struct LlmGateway {
    provider: Arc<dyn LLMProvider>,
    temperature: f32,
    max_tokens: usize,
}

impl std::fmt::Debug for LlmGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGateway")
            .field("provider", &"<dyn LLMProvider>")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl LlmGateway {
    pub fn new(provider: Arc<dyn LLMProvider>, temperature: f32, max_tokens: usize) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Build the gateway from the configured provider name and model.
    ///
    /// The provider factory reads the matching API key (`GEMINI_API_KEY`,
    /// `OPENAI_API_KEY`, ...) from the environment, once, at startup.
    pub fn from_config(config: &ServiceConfig) -> Result<Self, KitchenError> {
        let provider = resolve_provider(&config.provider_name, &config.model)?;
        Ok(Self::new(provider, config.temperature, config.max_tokens))
    }

    fn options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
            ..Default::default()
        }
    }
}

impl ModelGateway for LlmGateway {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, KitchenError>> {
        async move {
            let start = Instant::now();
            let messages = vec![ChatMessage::user(prompt)];
            let options = self.options();

            match self.provider.chat(&messages, Some(&options)).await {
                Ok(response) => {
                    debug!(
                        "Model call: {} input tokens, {} output tokens, {:?}",
                        response.prompt_tokens,
                        response.completion_tokens,
                        start.elapsed()
                    );
                    Ok(response.content)
                }
                Err(e) => {
                    warn!("Model call failed after {:?}: {}", start.elapsed(), e);
                    Err(KitchenError::Provider {
                        detail: e.to_string(),
                    })
                }
            }
        }
        .boxed()
    }
}

/// Instantiate a named provider with the given model.
pub fn resolve_provider(
    provider_name: &str,
    model: &str,
) -> Result<Arc<dyn LLMProvider>, KitchenError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        KitchenError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!(
                "Set the API key for '{}' (e.g. GEMINI_API_KEY) before starting the service.\n\
                Error: {}",
                provider_name, e
            ),
        }
    })
}

