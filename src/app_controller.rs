use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::auth::{AuthOutcome, OAuthClient, PendingAuth, TokenCache, negotiate};
use crate::deck::{DeckService, GoogleSlidesClient, MemoryDeckStore, copy_title, presentation_id_from_input};
use crate::errors::{AppError, AuthError, DeckError};
use crate::language_utils;
use crate::translation::{PipelineOptions, TranslationPipeline, TranslationReport, TranslationService, Translator};

// @module: Application controller for presentation translation

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    /// Every batch was applied
    Completed(TranslationReport),

    /// A batch was rejected; earlier batches stay applied
    Aborted {
        report: TranslationReport,
        error: DeckError,
    },

    /// The user has to grant access before anything can run
    AuthPending(PendingAuth),
}

impl RunOutcome {
    /// The report, when the pipeline ran
    pub fn report(&self) -> Option<&TranslationReport> {
        match self {
            RunOutcome::Completed(report) | RunOutcome::Aborted { report, .. } => Some(report),
            RunOutcome::AuthPending(_) => None,
        }
    }
}

/// Main application controller for presentation translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(e.to_string()))?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Target language as an English name, e.g. `es` → `Spanish`
    pub fn target_language(&self) -> Result<String, AppError> {
        language_utils::resolve_language_name(&self.config.target_language)
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Translator built from the translation config
    ///
    /// A minimal request is sent first so a bad key or endpoint fails the run
    /// before any presentation is copied.
    pub async fn translator(&self) -> Result<Arc<dyn Translator>, AppError> {
        let service = TranslationService::new(self.config.translation.clone())?;
        service.test_connection().await?;
        info!(
            "Connected to {} ({})",
            self.config.translation.provider.display_name(),
            service.model_name()
        );
        Ok(Arc::new(service))
    }

    /// Translate a Google Slides presentation into a new copy
    ///
    /// `presentation_id` may also be the presentation's URL.
    ///
    /// Credentials are negotiated first; without them the run stops with
    /// `AuthPending` before any presentation is touched.
    pub async fn run_google(
        &self,
        presentation_id: &str,
        context: Option<&str>,
        auth_code: Option<&str>,
    ) -> Result<RunOutcome, AppError> {
        self.config
            .validate_auth()
            .map_err(|e| AuthError::MissingClient(e.to_string()))?;
        let oauth = OAuthClient::new(self.config.auth.clone(), self.config.translation.timeout_secs)?;
        let cache = TokenCache::new(self.config.auth.token_cache_path.clone());

        let credentials = match negotiate(&oauth, &cache, &self.config.auth.token_cache_key, auth_code).await {
            AuthOutcome::Authorized(credentials) => credentials,
            AuthOutcome::Pending(pending) => {
                info!("{}", pending.message);
                return Ok(RunOutcome::AuthPending(pending));
            }
            AuthOutcome::Failed(err) => return Err(err.into()),
        };

        let translator = self.translator().await?;
        let slides = Arc::new(GoogleSlidesClient::new(
            credentials.access_token,
            self.config.translation.timeout_secs,
        ));
        let presentation_id = presentation_id_from_input(presentation_id);
        self.translate_copy(slides, translator, &presentation_id, context)
            .await
    }

    /// Copy a presentation and translate the copy, leaving the original untouched
    pub async fn translate_copy(
        &self,
        service: Arc<dyn DeckService>,
        translator: Arc<dyn Translator>,
        presentation_id: &str,
        context: Option<&str>,
    ) -> Result<RunOutcome, AppError> {
        let target_language = self.target_language()?;
        let original = service.fetch(presentation_id).await?;
        let title = copy_title(&original.title, &target_language);

        info!("[{}] Copying presentation as '{}'", presentation_id, title);
        let copy = service.copy(presentation_id, &title).await?;
        info!("[{}] Translating copy {}", presentation_id, copy.url);

        self.run_pipeline(service, translator, &copy.id, &target_language, context)
            .await
    }

    /// Translate a deck stored as JSON and write the result to `output`
    ///
    /// The output is written even when a batch fails, so it reflects exactly
    /// the batches that were applied.
    pub async fn run_local(
        &self,
        translator: Arc<dyn Translator>,
        input: &Path,
        output: &Path,
        context: Option<&str>,
    ) -> Result<RunOutcome, AppError> {
        let target_language = self.target_language()?;
        let deck = MemoryDeckStore::load_deck(input)?;
        let deck_id = deck.id.clone();

        let store = Arc::new(MemoryDeckStore::new());
        store.insert(deck);

        let outcome = self
            .run_pipeline(store.clone(), translator, &deck_id, &target_language, context)
            .await?;

        let translated = store
            .get(&deck_id)
            .ok_or_else(|| AppError::Unknown(format!("deck '{}' vanished from the store", deck_id)))?;
        MemoryDeckStore::save_deck(&translated, output)?;
        info!("[{}] Wrote translated deck to {:?}", deck_id, output);

        Ok(outcome)
    }

    async fn run_pipeline(
        &self,
        service: Arc<dyn DeckService>,
        translator: Arc<dyn Translator>,
        deck_id: &str,
        target_language: &str,
        context: Option<&str>,
    ) -> Result<RunOutcome, AppError> {
        info!(
            "[{}] {} - {} → {}",
            deck_id,
            translator.provider_name(),
            translator.model_name(),
            target_language
        );

        let pipeline = TranslationPipeline::new(service, translator, PipelineOptions::from(&self.config));

        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} texts ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let result = pipeline
            .run_with_progress(deck_id, target_language, context, |done, total| {
                progress_bar.set_length(total as u64);
                progress_bar.set_position(done as u64);
            })
            .await;
        progress_bar.finish_and_clear();

        let outcome = result?;
        Ok(match outcome.apply_error {
            None => {
                info!(
                    "[{}] Done: {} of {} texts translated, {} occurrences changed",
                    deck_id,
                    outcome.report.text_runs_translated,
                    outcome.report.unique_text_runs_found,
                    outcome.report.text_occurrences_changed
                );
                RunOutcome::Completed(outcome.report)
            }
            Some(error) => {
                error!("[{}] Translation aborted: {}", deck_id, error);
                RunOutcome::Aborted {
                    report: outcome.report,
                    error,
                }
            }
        })
    }
}
