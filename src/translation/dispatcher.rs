/*!
 * Concurrent translation dispatch.
 *
 * Every distinct fragment is translated exactly once by a bounded pool of
 * in-flight requests. Workers never touch shared state: each produces a
 * per-fragment result and the dispatcher folds them into the translation map
 * and usage totals once they arrive.
 */

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use super::core::{Translated, Translator};
use super::usage::UsageTotals;

/// Fragment → translated text
pub type Translations = HashMap<String, String>;

/// A fragment the provider could not translate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentFailure {
    pub fragment: String,
    pub error: String,
}

/// Everything the dispatch stage produced
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    /// Successful translations
    pub translations: Translations,

    /// Usage summed over successful calls
    pub usage: UsageTotals,

    /// Fragments left untranslated
    pub failures: Vec<FragmentFailure>,

    /// Number of fragments submitted
    pub requested: usize,
}

impl DispatchOutcome {
    /// Number of fragments translated successfully
    pub fn translated(&self) -> usize {
        self.translations.len()
    }
}

/// Fans fragments out to a translator with bounded concurrency
pub struct TranslationDispatcher {
    translator: Arc<dyn Translator>,
    workers: usize,
}

impl TranslationDispatcher {
    /// Create a dispatcher running at most `workers` translations at once
    pub fn new(translator: Arc<dyn Translator>, workers: usize) -> Self {
        Self {
            translator,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Translate each fragment once; failures are logged and left out
    ///
    /// Returns only after every fragment produced a result or a failure.
    /// `progress` is called with (completed, total) as results come in.
    pub async fn dispatch(
        &self,
        fragments: Vec<String>,
        target_language: &str,
        context: Option<&str>,
        progress: impl Fn(usize, usize),
    ) -> DispatchOutcome {
        let total = fragments.len();
        info!(
            "Translating {} texts to '{}' using '{}' with {} workers",
            total,
            target_language,
            self.translator.model_name(),
            self.workers
        );

        let translator = &self.translator;
        let mut results = stream::iter(fragments)
            .map(|fragment| async move {
                debug!("Translating text: '{}'", fragment);
                let start_time = Instant::now();
                let result = translator.translate(&fragment, target_language, context).await;
                (fragment, result, start_time.elapsed())
            })
            .buffer_unordered(self.workers);

        let mut outcome = DispatchOutcome {
            requested: total,
            ..Default::default()
        };
        let mut completed = 0;

        while let Some((fragment, result, elapsed)) = results.next().await {
            completed += 1;
            match result {
                Ok(Translated { text, usage }) => {
                    debug!("Translated ({}/{}): '{}' -> '{}'", completed, total, fragment, text);
                    outcome.usage.add(usage, elapsed);
                    outcome.translations.insert(fragment, text);
                }
                Err(error) => {
                    warn!("Translation error for '{}': {}", fragment, error);
                    outcome.failures.push(FragmentFailure {
                        fragment,
                        error: error.to_string(),
                    });
                }
            }
            progress(completed, total);
        }

        info!(
            "Finished translating {} out of {} texts",
            outcome.translated(),
            total
        );
        outcome
    }
}
