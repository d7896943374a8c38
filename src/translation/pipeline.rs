/*!
 * End-to-end translation of one presentation.
 *
 * Runs the stages in order: fetch → index → dispatch → plan → apply, and
 * folds their results into a `TranslationReport`.
 */

use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::app_config::Config;
use crate::deck::{DeckService, presentation_url};
use crate::errors::DeckError;

use super::applier::BatchApplier;
use super::core::Translator;
use super::dispatcher::{DispatchOutcome, TranslationDispatcher};
use super::planner::ReplacementPlanner;
use super::walker::index_deck;

/// Tunables for a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Maximum translations in flight
    pub workers: usize,
    /// Maximum replace requests per apply call
    pub batch_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            workers: 10,
            batch_size: 50,
        }
    }
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            workers: config.translation.concurrent_workers,
            batch_size: config.replacement.batch_size,
        }
    }
}

/// Summary of a run, printed as JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslationReport {
    pub presentation_id: String,
    pub presentation_url: String,
    pub presentation_title: String,
    pub slides_count: usize,
    pub unique_text_runs_found: usize,
    pub text_runs_translated: usize,
    pub text_occurrences_changed: u64,
    pub estimated_words_translated: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_cost_usd: f64,
    pub batches_applied: usize,
    pub batches_total: usize,
    /// Fragments the provider could not translate, sorted
    pub failed_fragments: Vec<String>,
    /// Why the run stopped before its last batch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal_error: Option<String>,
}

/// What a run produced
///
/// A failed apply call does not discard the work done before it: the report
/// counts the batches that were applied and `apply_error` holds the failure.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub report: TranslationReport,
    pub apply_error: Option<DeckError>,
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        self.apply_error.is_none()
    }
}

/// Wires the stages together over a deck service and a translator
pub struct TranslationPipeline {
    deck_service: Arc<dyn DeckService>,
    translator: Arc<dyn Translator>,
    options: PipelineOptions,
}

impl TranslationPipeline {
    pub fn new(deck_service: Arc<dyn DeckService>, translator: Arc<dyn Translator>, options: PipelineOptions) -> Self {
        Self {
            deck_service,
            translator,
            options,
        }
    }

    /// Translate a presentation in place
    pub async fn run(
        &self,
        deck_id: &str,
        target_language: &str,
        context: Option<&str>,
    ) -> Result<PipelineOutcome, DeckError> {
        self.run_with_progress(deck_id, target_language, context, |_, _| {})
            .await
    }

    /// Translate a presentation in place, reporting dispatch progress
    ///
    /// Returns `Err` only when the presentation cannot be read.
    pub async fn run_with_progress(
        &self,
        deck_id: &str,
        target_language: &str,
        context: Option<&str>,
        on_translated: impl Fn(usize, usize),
    ) -> Result<PipelineOutcome, DeckError> {
        let deck = self.deck_service.fetch(deck_id).await?;
        let index = index_deck(&deck);
        info!(
            "[{}] Found {} unique texts across {} slides",
            deck_id,
            index.len(),
            index.slide_count()
        );

        let dispatcher = TranslationDispatcher::new(self.translator.clone(), self.options.workers);
        let fragments: Vec<String> = index.fragments().map(str::to_string).collect();
        let dispatched = dispatcher
            .dispatch(fragments, target_language, context, on_translated)
            .await;

        let planner = ReplacementPlanner::new(self.options.batch_size);
        let batches = planner.plan(&dispatched.translations, &index);
        info!(
            "[{}] Created {} change requests in {} batches",
            deck_id,
            batches.iter().map(|b| b.len()).sum::<usize>(),
            batches.len()
        );

        let applied = BatchApplier::new(self.deck_service.clone())
            .apply(deck_id, &batches, |_, _| {})
            .await;

        let mut report = TranslationReport {
            presentation_id: deck.id.clone(),
            presentation_url: presentation_url(&deck.id),
            presentation_title: deck.title.clone(),
            slides_count: deck.slides.len(),
            unique_text_runs_found: index.len(),
            text_occurrences_changed: applied.occurrences_changed,
            batches_applied: applied.batches_applied,
            batches_total: applied.batches_total,
            fatal_error: applied.error.as_ref().map(ToString::to_string),
            ..Default::default()
        };
        self.fill_translation_stats(&mut report, &dispatched);

        if let Some(err) = &applied.error {
            warn!(
                "[{}] Stopped after {} of {} batches: {}",
                deck_id, applied.batches_applied, applied.batches_total, err
            );
        }

        Ok(PipelineOutcome {
            report,
            apply_error: applied.error,
        })
    }

    fn fill_translation_stats(&self, report: &mut TranslationReport, dispatched: &DispatchOutcome) {
        let model = self.translator.model_name();
        report.text_runs_translated = dispatched.translated();
        report.estimated_words_translated = dispatched
            .translations
            .values()
            .map(|text| text.split_whitespace().count())
            .sum();
        report.total_input_tokens = dispatched.usage.input_tokens;
        report.total_output_tokens = dispatched.usage.output_tokens;
        report.total_cost_usd = dispatched.usage.cost_usd(model);

        let mut failed: Vec<String> = dispatched.failures.iter().map(|f| f.fragment.clone()).collect();
        failed.sort();
        report.failed_fragments = failed;

        info!(
            "[{}] {}",
            report.presentation_id,
            dispatched.usage.summary(self.translator.provider_name(), model)
        );
    }
}
