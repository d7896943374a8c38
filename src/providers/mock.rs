/*!
 * Mock translator for testing.
 *
 * This module provides a translator that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds with `[<target>] <text>`
 * - `MockTranslator::identity()` - Returns the text unchanged
 * - `MockTranslator::failing()` - Always fails with an error
 * - `MockTranslator::empty()` - Answers with blank text
 * - `MockTranslator::slow(ms)` - Succeeds after a delay
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::translation::core::{Translated, Translator};
use crate::translation::usage::TokenUsage;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Prefixes the text with the target language
    Working,
    /// Returns the source text unchanged
    Identity,
    /// Always fails with an error
    Failing,
    /// Returns an empty response
    Empty,
    /// Simulates slow response
    Slow { delay_ms: u64 },
}

/// Mock translator recording how it was called
#[derive(Debug, Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Texts that fail regardless of behavior
    failing_texts: Arc<HashSet<String>>,
    /// Fixed answers that override the behavior
    fixed: Arc<HashMap<String, String>>,
    /// Usage reported for each successful call
    usage: TokenUsage,
    /// Total calls received
    request_count: Arc<AtomicUsize>,
    /// Calls currently running
    in_flight: Arc<AtomicUsize>,
    /// Highest concurrency observed
    max_in_flight: Arc<AtomicUsize>,
    /// Contexts passed by callers, in call order
    contexts: Arc<Mutex<Vec<Option<String>>>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failing_texts: Arc::new(HashSet::new()),
            fixed: Arc::new(HashMap::new()),
            usage: TokenUsage::new(10, 5),
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            contexts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock translator that echoes the source text
    pub fn identity() -> Self {
        Self::new(MockBehavior::Identity)
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock translator that returns blank text
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a working mock translator that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Fail on the given texts
    pub fn failing_on<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing_texts = Arc::new(texts.into_iter().map(Into::into).collect());
        self
    }

    /// Answer the given texts with fixed translations
    pub fn with_translations<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.fixed = Arc::new(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Report this usage for every successful call
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of calls that overlapped
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Contexts received, in call order
    pub fn contexts(&self) -> Vec<Option<String>> {
        self.contexts.lock().clone()
    }

    fn respond(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        if self.failing_texts.contains(text) {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated failure for '{}'", text),
            }
            .into());
        }
        if let Some(answer) = self.fixed.get(text) {
            return Ok(answer.clone());
        }

        match self.behavior {
            MockBehavior::Working | MockBehavior::Slow { .. } => Ok(format!("[{}] {}", target_language, text)),
            MockBehavior::Identity => Ok(text.to_string()),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            }
            .into()),
            MockBehavior::Empty => Err(TranslationError::EmptyTranslation),
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
        context: Option<&str>,
    ) -> Result<Translated, TranslationError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().push(context.map(str::to_string));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay_ms = match self.behavior {
            MockBehavior::Slow { delay_ms } => delay_ms,
            _ => 0,
        };
        // Always yield so concurrent calls overlap the way network calls do
        tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;

        let result = self.respond(text, target_language);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        result.map(|text| Translated {
            text,
            usage: self.usage,
        })
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
