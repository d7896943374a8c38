use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language, as an English name or ISO code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Replacement config
    #[serde(default)]
    pub replacement: ReplacementConfig,

    /// OAuth config for Google Slides and Drive
    #[serde(default)]
    pub auth: AuthConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Gemini
    #[default]
    Gemini,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Gemini => "Gemini",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Gemini => "gemini".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }

    // @returns: Model used when none is configured
    pub fn default_model(&self) -> String {
        match self {
            Self::Gemini => default_gemini_model(),
            Self::Anthropic => default_anthropic_model(),
        }
    }

    // @returns: API base URL used when none is configured
    pub fn default_endpoint(&self) -> String {
        match self {
            Self::Gemini => default_gemini_endpoint(),
            Self::Anthropic => default_anthropic_endpoint(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Model name; empty means the provider default
    #[serde(default = "String::new")]
    pub model: String,

    /// API key for the provider
    #[serde(default = "String::new")]
    pub api_key: String,

    /// API base URL; empty means the provider default
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Zero keeps translations as literal and repeatable as possible
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum number of translations in flight
    #[serde(default = "default_concurrent_workers")]
    pub concurrent_workers: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cap on generated tokens per fragment; unset keeps the provider default
    /// On Gemini 2.5 models the cap also covers thinking tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            model: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            temperature: default_temperature(),
            concurrent_workers: default_concurrent_workers(),
            timeout_secs: default_timeout_secs(),
            max_output_tokens: None,
        }
    }
}

impl TranslationConfig {
    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if self.model.is_empty() {
            self.provider.default_model()
        } else {
            self.model.clone()
        }
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if self.endpoint.is_empty() {
            self.provider.default_endpoint()
        } else {
            self.endpoint.clone()
        }
    }
}

/// Replacement stage configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReplacementConfig {
    /// Maximum replace requests per batch update call
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ReplacementConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
        }
    }
}

/// OAuth 2.0 client configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    /// OAuth client id
    #[serde(default = "String::new")]
    pub client_id: String,

    /// OAuth client secret
    #[serde(default = "String::new")]
    pub client_secret: String,

    /// Authorization endpoint the user is sent to
    #[serde(default = "default_authorization_url")]
    pub authorization_url: String,

    /// Token endpoint for code exchange and refresh
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// Redirect URI registered for the client; the code is read from the redirected URL
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,

    /// Scopes requested from the user
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,

    /// File holding cached tokens
    #[serde(default = "default_token_cache_path")]
    pub token_cache_path: PathBuf,

    /// Key of the token entry inside the cache file
    #[serde(default = "default_token_cache_key")]
    pub token_cache_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            authorization_url: default_authorization_url(),
            token_url: default_token_url(),
            redirect_uri: default_redirect_uri(),
            scopes: default_scopes(),
            token_cache_path: default_token_cache_path(),
            token_cache_key: default_token_cache_key(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching filter for the `log` facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "Spanish".to_string()
}

fn default_temperature() -> f32 {
    0.0
}

fn default_concurrent_workers() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_batch_size() -> usize {
    50
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-5-haiku-latest".to_string()
}

fn default_gemini_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_authorization_url() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "https://www.googleapis.com/auth/drive".to_string(),
        "https://www.googleapis.com/auth/presentations".to_string(),
    ]
}

fn default_token_cache_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("slides-translator")
        .join("tokens.json")
}

fn default_token_cache_key() -> String {
    "user:slides_translator_token".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::resolve_language_name(&self.target_language)?;

        if self.translation.concurrent_workers == 0 {
            return Err(anyhow!("translation.concurrent_workers must be at least 1"));
        }

        if self.replacement.batch_size == 0 {
            return Err(anyhow!("replacement.batch_size must be at least 1"));
        }

        if !(0.0..=1.0).contains(&self.translation.temperature) {
            return Err(anyhow!(
                "translation.temperature must be between 0.0 and 1.0, got {}",
                self.translation.temperature
            ));
        }

        if self.translation.api_key.is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }

        Ok(())
    }

    /// Load the configuration file, writing a default one if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let file = File::open(path).with_context(|| format!("Failed to open config file: {:?}", path))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok(config);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;
        Ok(config)
    }

    /// Fill secrets left empty in the file from the environment
    pub fn apply_env_fallbacks(&mut self) {
        self.apply_env_fallbacks_with(|key| std::env::var(key).ok());
    }

    /// Fill secrets left empty in the file using `lookup`
    pub fn apply_env_fallbacks_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let fill = |field: &mut String, key: &str| {
            if field.is_empty() {
                if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                    *field = value;
                }
            }
        };

        let api_key_var = match self.translation.provider {
            TranslationProvider::Gemini => "GEMINI_API_KEY",
            TranslationProvider::Anthropic => "ANTHROPIC_API_KEY",
        };
        fill(&mut self.translation.api_key, api_key_var);
        fill(&mut self.auth.client_id, "AUTHENTICATION_CLIENT_ID");
        fill(&mut self.auth.client_secret, "AUTHENTICATION_CLIENT_SECRET");
    }

    /// Validate the OAuth client settings needed for Google Slides runs
    pub fn validate_auth(&self) -> Result<()> {
        if self.auth.client_id.is_empty() || self.auth.client_secret.is_empty() {
            return Err(anyhow!("OAuth client id and secret are required for Google Slides"));
        }
        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            replacement: ReplacementConfig::default(),
            auth: AuthConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
