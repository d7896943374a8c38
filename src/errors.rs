/*!
 * Error types for the slides-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify a non-success HTTP status into a provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while translating a single fragment
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider answered but returned no usable text
    #[error("Provider returned an empty translation")]
    EmptyTranslation,
}

/// Errors raised by a deck service (document access or replacement)
#[derive(Error, Debug)]
pub enum DeckError {
    /// The presentation could not be read or copied
    #[error("Cannot access presentation '{document_id}': {message}")]
    Access {
        /// Presentation the call was made for
        document_id: String,
        /// Underlying failure
        message: String,
    },

    /// A replacement batch was rejected
    #[error("Failed to apply batch {batch_number} to presentation '{document_id}': {message}")]
    Apply {
        /// Presentation the batch was submitted to
        document_id: String,
        /// 1-based number of the failing batch
        batch_number: usize,
        /// Underlying failure
        message: String,
    },

    /// The service answered with a payload we could not understand
    #[error("Invalid presentation payload: {0}")]
    Parse(String),
}

impl DeckError {
    /// Build an access error for the given presentation
    pub fn access(document_id: impl Into<String>, message: impl ToString) -> Self {
        Self::Access {
            document_id: document_id.into(),
            message: message.to_string(),
        }
    }

    /// Build an apply error for the given presentation and batch
    pub fn apply(document_id: impl Into<String>, batch_number: usize, message: impl ToString) -> Self {
        Self::Apply {
            document_id: document_id.into(),
            batch_number,
            message: message.to_string(),
        }
    }
}

/// Errors that can occur while negotiating OAuth credentials
#[derive(Error, Debug)]
pub enum AuthError {
    /// OAuth client id or secret is missing from the configuration
    #[error("OAuth client is not configured: {0}")]
    MissingClient(String),

    /// Authorization code exchange failed
    #[error("Authorization code exchange failed: {0}")]
    Exchange(String),

    /// Refreshing an expired token failed
    #[error("Token refresh failed: {0}")]
    Refresh(String),

    /// Token cache could not be read or written
    #[error("Token cache error: {0}")]
    Cache(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the presentation service
    #[error("Presentation error: {0}")]
    Deck(#[from] DeckError),

    /// Error from credential negotiation
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
