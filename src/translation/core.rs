/*!
 * Core translation service implementation.
 *
 * `Translator` is the seam the dispatcher works against; `TranslationService`
 * implements it on top of the configured language model provider.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::debug;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::gemini::{Gemini, GeminiRequest};

use super::usage::TokenUsage;

/// Anthropic requires a cap; used when none is configured
const ANTHROPIC_MAX_TOKENS: u32 = 2048;

/// A translated fragment together with the tokens it cost
#[derive(Debug, Clone, PartialEq)]
pub struct Translated {
    pub text: String,
    pub usage: TokenUsage,
}

/// Translates one fragment of text
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language`, optionally guided by `context`
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        context: Option<&str>,
    ) -> Result<Translated, TranslationError>;

    /// Provider identifier, e.g. `gemini`
    fn provider_name(&self) -> &str;

    /// Model identifier used for pricing
    fn model_name(&self) -> &str;
}

/// System instruction sent with every fragment
pub fn build_instructions(target_language: &str, context: Option<&str>) -> String {
    let mut instructions = format!(
        "Translate the following text to {} as accurately as possible. \
         Do not add any preamble, intro, or explanation; return only the translated text.",
        target_language
    );
    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        instructions.push_str(&format!(
            " You are provided with this context to perform the task: '{}'",
            context
        ));
    }
    instructions
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// Google Gemini
    Gemini {
        /// Client instance
        client: Gemini,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// Translation service backed by a language model provider
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    provider_name: String,
    model: String,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(anyhow!(
                "No API key configured for {}",
                config.provider.display_name()
            ));
        }

        let model = config.get_model();
        let provider = match config.provider {
            ConfigTranslationProvider::Gemini => TranslationProviderImpl::Gemini {
                client: Gemini::new(
                    config.api_key.clone(),
                    config.get_endpoint(),
                    model.clone(),
                    config.timeout_secs,
                ),
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(
                    config.api_key.clone(),
                    config.get_endpoint(),
                    model.clone(),
                    config.timeout_secs,
                ),
            },
        };

        Ok(Self {
            provider,
            provider_name: config.provider.to_lowercase_string(),
            model,
            config,
        })
    }

    /// Send a minimal request to check credentials and reachability
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.provider {
            TranslationProviderImpl::Gemini { client } => client.test_connection().await,
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
        }
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        context: Option<&str>,
    ) -> Result<Translated, TranslationError> {
        let instructions = build_instructions(target_language, context);

        let (raw, usage) = match &self.provider {
            TranslationProviderImpl::Gemini { client } => {
                let mut request = GeminiRequest::new()
                    .system(instructions)
                    .user(text)
                    .temperature(self.config.temperature);
                if let Some(max_output_tokens) = self.config.max_output_tokens {
                    request = request.max_output_tokens(max_output_tokens);
                }
                let response = client.complete(request).await?;
                (Gemini::extract_text(&response), Gemini::extract_usage(&response))
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(
                    self.model.clone(),
                    self.config.max_output_tokens.unwrap_or(ANTHROPIC_MAX_TOKENS),
                )
                    .system(instructions)
                    .temperature(self.config.temperature)
                    .add_message("user", text);
                let response = client.complete(request).await?;
                (Anthropic::extract_text(&response), Anthropic::extract_usage(&response))
            }
        };

        let translated = raw.trim();
        if translated.is_empty() {
            return Err(TranslationError::EmptyTranslation);
        }
        debug!(
            "{} used {} input / {} output tokens",
            self.provider_name, usage.input_tokens, usage.output_tokens
        );

        Ok(Translated {
            text: translated.to_string(),
            usage,
        })
    }

    fn provider_name(&self) -> &str {
        &self.provider_name
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
