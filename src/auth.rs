/*!
 * OAuth 2.0 credential negotiation for Google Slides and Drive.
 *
 * Negotiation order:
 * 1. a cached token, refreshed when it has expired
 * 2. an authorization code supplied by the user, exchanged for tokens
 * 3. otherwise the run is pending until the user grants access
 */

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::app_config::AuthConfig;
use crate::errors::AuthError;

/// Seconds before expiry at which a token is treated as expired
const EXPIRY_SKEW_SECS: i64 = 60;

/// Message shown while waiting for the user to grant access
pub const PENDING_MESSAGE: &str = "Awaiting user authentication";

/// Tokens granted by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl Credentials {
    /// Whether the access token can still be used at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => expires_at - Duration::seconds(EXPIRY_SKEW_SECS) > now,
            None => true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// The user must visit `authorization_url` and come back with a code
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingAuth {
    pub message: String,
    pub authorization_url: String,
}

/// Result of credential negotiation
#[derive(Debug)]
pub enum AuthOutcome {
    Authorized(Credentials),
    Pending(PendingAuth),
    Failed(AuthError),
}

/// JSON file mapping cache keys to credentials
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, Credentials>, AuthError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| AuthError::Cache(format!("Failed to read {:?}: {}", self.path, e)))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&content)
            .map_err(|e| AuthError::Cache(format!("Failed to parse {:?}: {}", self.path, e)))
    }

    fn write_all(&self, entries: &HashMap<String, Credentials>) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| AuthError::Cache(format!("Failed to create {:?}: {}", parent, e)))?;
            }
        }
        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| AuthError::Cache(e.to_string()))?;
        fs::write(&self.path, content)
            .map_err(|e| AuthError::Cache(format!("Failed to write {:?}: {}", self.path, e)))
    }

    /// Cached credentials for `key`, if any
    pub fn load(&self, key: &str) -> Result<Option<Credentials>, AuthError> {
        Ok(self.read_all()?.remove(key))
    }

    /// Store credentials under `key`, keeping other entries
    pub fn store(&self, key: &str, credentials: &Credentials) -> Result<(), AuthError> {
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), credentials.clone());
        self.write_all(&entries)
    }

    /// Drop the entry for `key`; an unreadable cache is reset
    pub fn evict(&self, key: &str) -> Result<(), AuthError> {
        let mut entries = self.read_all().unwrap_or_default();
        entries.remove(key);
        self.write_all(&entries)
    }
}

/// Token endpoint operations
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Trade an authorization code for credentials
    async fn exchange_code(&self, code: &str) -> Result<Credentials, AuthError>;

    /// Obtain a fresh access token using the refresh token
    async fn refresh(&self, credentials: &Credentials) -> Result<Credentials, AuthError>;

    /// URL the user opens to grant access
    fn authorization_url(&self) -> Result<String, AuthError>;
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

impl TokenResponse {
    fn into_credentials(self, previous: Option<&Credentials>, default_scopes: &[String]) -> Credentials {
        let scopes = match self.scope {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => previous
                .map(|p| p.scopes.clone())
                .unwrap_or_else(|| default_scopes.to_vec()),
        };
        Credentials {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .or_else(|| previous.and_then(|p| p.refresh_token.clone())),
            expires_at: self.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
            scopes,
        }
    }
}

/// OAuth client talking to Google's authorization server
#[derive(Debug)]
pub struct OAuthClient {
    client: Client,
    config: AuthConfig,
}

impl OAuthClient {
    pub fn new(config: AuthConfig, timeout_secs: u64) -> Result<Self, AuthError> {
        if config.client_id.is_empty() {
            return Err(AuthError::MissingClient("client_id is empty".to_string()));
        }
        if config.client_secret.is_empty() {
            return Err(AuthError::MissingClient("client_secret is empty".to_string()));
        }
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            config,
        })
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, String> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("HTTP {}: {}", status, body));
        }
        response.json::<TokenResponse>().await.map_err(|e| e.to_string())
    }
}

#[async_trait]
impl TokenExchanger for OAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<Credentials, AuthError> {
        let form = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let response = self.token_request(&form).await.map_err(AuthError::Exchange)?;
        Ok(response.into_credentials(None, &self.config.scopes))
    }

    async fn refresh(&self, credentials: &Credentials) -> Result<Credentials, AuthError> {
        let refresh_token = credentials
            .refresh_token
            .as_deref()
            .ok_or_else(|| AuthError::Refresh("no refresh token".to_string()))?;
        let form = [
            ("refresh_token", refresh_token),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "refresh_token"),
        ];
        let response = self.token_request(&form).await.map_err(AuthError::Refresh)?;
        Ok(response.into_credentials(Some(credentials), &self.config.scopes))
    }

    fn authorization_url(&self) -> Result<String, AuthError> {
        let scope = self.config.scopes.join(" ");
        let url = Url::parse_with_params(
            &self.config.authorization_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| AuthError::MissingClient(format!("invalid authorization_url: {}", e)))?;
        Ok(url.to_string())
    }
}

/// Authorization code from what the user pasted
///
/// Accepts the bare code or the whole URL the consent page redirected to,
/// e.g. `http://localhost/?code=4/0Ab...&scope=...`.
pub fn authorization_code_from_input(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match Url::parse(input) {
        Ok(url) if url.has_host() => url
            .query_pairs()
            .find(|(name, _)| name == "code")
            .map(|(_, code)| code.into_owned())
            .filter(|code| !code.is_empty()),
        _ => Some(input.to_string()),
    }
}

/// Resolve credentials for a run
pub async fn negotiate(
    exchanger: &dyn TokenExchanger,
    cache: &TokenCache,
    cache_key: &str,
    auth_code: Option<&str>,
) -> AuthOutcome {
    match cache.load(cache_key) {
        Ok(Some(credentials)) if credentials.is_valid() => {
            debug!("Using cached credentials");
            return AuthOutcome::Authorized(credentials);
        }
        Ok(Some(credentials)) if credentials.refresh_token.is_some() => {
            info!("Cached token expired, refreshing");
            match exchanger.refresh(&credentials).await {
                Ok(refreshed) => {
                    if let Err(e) = cache.store(cache_key, &refreshed) {
                        warn!("Could not cache refreshed token: {}", e);
                    }
                    return AuthOutcome::Authorized(refreshed);
                }
                Err(e) => {
                    warn!("{}", e);
                    evict(cache, cache_key);
                }
            }
        }
        Ok(Some(_)) => {
            debug!("Cached token expired without refresh token");
            evict(cache, cache_key);
        }
        Ok(None) => {}
        Err(e) => {
            warn!("{}", e);
            evict(cache, cache_key);
        }
    }

    if let Some(code) = auth_code.and_then(authorization_code_from_input) {
        return match exchanger.exchange_code(&code).await {
            Ok(credentials) => {
                if let Err(e) = cache.store(cache_key, &credentials) {
                    warn!("Could not cache token: {}", e);
                }
                info!("Authorization code exchanged");
                AuthOutcome::Authorized(credentials)
            }
            Err(e) => AuthOutcome::Failed(e),
        };
    }

    match exchanger.authorization_url() {
        Ok(authorization_url) => AuthOutcome::Pending(PendingAuth {
            message: PENDING_MESSAGE.to_string(),
            authorization_url,
        }),
        Err(e) => AuthOutcome::Failed(e),
    }
}

fn evict(cache: &TokenCache, cache_key: &str) {
    if let Err(e) = cache.evict(cache_key) {
        warn!("Could not evict cached token: {}", e);
    }
}
