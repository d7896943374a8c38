/*!
 * Provider implementations for the language model services used to translate.
 *
 * This module contains client implementations for:
 * - Gemini: Google Generative Language API
 * - Anthropic: Anthropic Messages API
 * - Mock: in-process translator for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::translation::usage::TokenUsage;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider with a minimal request
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;

    /// Extract token consumption from the provider response
    fn extract_usage(response: &Self::Response) -> TokenUsage;
}

pub mod anthropic;
pub mod gemini;
pub mod mock;
