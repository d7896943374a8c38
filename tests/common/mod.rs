/*!
 * Common test utilities for the slides-translator test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use slides_translator::app_config::Config;
use slides_translator::deck::{Deck, DeckCopy, DeckService, MemoryDeckStore, PageElement, Slide};
use slides_translator::errors::DeckError;
use slides_translator::translation::ReplacementBatch;

/// Routes `log` output through env_logger; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Writes a deck as JSON into `dir`
pub fn write_deck_file(dir: &Path, filename: &str, deck: &Deck) -> Result<PathBuf> {
    let path = dir.join(filename);
    MemoryDeckStore::save_deck(deck, &path)?;
    Ok(path)
}

/// Config that passes validation without touching the network
pub fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.target_language = "Spanish".to_string();
    config.translation.api_key = "test-key".to_string();
    config.auth.client_id = "test-client".to_string();
    config.auth.client_secret = "test-secret".to_string();
    config.auth.token_cache_path = dir.join("tokens.json");
    config
}

/// Deck with one shape per slide, each holding the given runs
pub fn deck_with_runs(id: &str, slides: &[(&str, &[&str])]) -> Deck {
    slides.iter().fold(Deck::new(id, "Test deck"), |deck, (slide_id, runs)| {
        deck.with_slide(Slide::new(*slide_id, vec![PageElement::shape(runs.iter().copied())]))
    })
}

/// A small but realistic quarterly review deck
pub fn quarterly_review_deck() -> Deck {
    Deck::new("q3-review", "Q3 Review")
        .with_slide(Slide::new(
            "title",
            vec![
                PageElement::shape(["Quarterly Business Review", "\n"]),
                PageElement::shape(["Q3 2024"]),
                PageElement::Other,
            ],
        ))
        .with_slide(Slide::new(
            "agenda",
            vec![
                PageElement::shape(["Agenda"]),
                PageElement::shape(["Revenue", "Customers", "Next steps"]),
            ],
        ))
        .with_slide(Slide::new(
            "numbers",
            vec![
                PageElement::shape(["Revenue"]),
                PageElement::table([["Region", "Revenue"], ["EMEA", "1,200"], ["APAC", "950"]]),
                PageElement::group(vec![
                    PageElement::shape(["Source: finance team"]),
                    PageElement::group(vec![PageElement::shape(["42%"])]),
                ]),
            ],
        ))
        .with_slide(Slide::new(
            "closing",
            vec![PageElement::shape(["Next steps", "Thank you"])],
        ))
}

/// Deck service that rejects one apply call and records every batch it sees
pub struct FlakyDeck {
    inner: MemoryDeckStore,
    fail_on_call: Option<usize>,
    applied: Mutex<Vec<usize>>,
}

impl FlakyDeck {
    /// Fail the `call`-th apply call (1-based)
    pub fn failing_on_call(deck: Deck, call: usize) -> Self {
        let inner = MemoryDeckStore::new();
        inner.insert(deck);
        Self {
            inner,
            fail_on_call: Some(call),
            applied: Mutex::new(Vec::new()),
        }
    }

    /// Never fail, only record
    pub fn recording(deck: Deck) -> Self {
        let inner = MemoryDeckStore::new();
        inner.insert(deck);
        Self {
            inner,
            fail_on_call: None,
            applied: Mutex::new(Vec::new()),
        }
    }

    /// Batch numbers submitted, in call order (including the rejected one)
    pub fn submitted_batches(&self) -> Vec<usize> {
        self.applied.lock().clone()
    }

    pub fn store(&self) -> &MemoryDeckStore {
        &self.inner
    }
}

#[async_trait]
impl DeckService for FlakyDeck {
    async fn fetch(&self, deck_id: &str) -> Result<Deck, DeckError> {
        self.inner.fetch(deck_id).await
    }

    async fn copy(&self, deck_id: &str, title: &str) -> Result<DeckCopy, DeckError> {
        self.inner.copy(deck_id, title).await
    }

    async fn apply_batch(&self, deck_id: &str, batch: &ReplacementBatch) -> Result<Vec<u64>, DeckError> {
        let call = {
            let mut applied = self.applied.lock();
            applied.push(batch.number);
            applied.len()
        };
        if self.fail_on_call == Some(call) {
            return Err(DeckError::apply(deck_id, batch.number, "simulated rejection"));
        }
        self.inner.apply_batch(deck_id, batch).await
    }
}
