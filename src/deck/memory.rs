/*!
 * In-memory deck service.
 *
 * Holds decks in a map and applies replacements to their text runs directly.
 * Used for offline runs over deck JSON files and as the test backend.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use crate::errors::DeckError;
use crate::translation::planner::ReplacementBatch;

use super::{Deck, DeckCopy, DeckService, presentation_url};

/// Deck service backed by a map of decks
#[derive(Debug, Default)]
pub struct MemoryDeckStore {
    decks: Mutex<HashMap<String, Deck>>,
}

impl MemoryDeckStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a deck, keyed by its id
    pub fn insert(&self, deck: Deck) {
        self.decks.lock().insert(deck.id.clone(), deck);
    }

    /// Snapshot of a stored deck
    pub fn get(&self, deck_id: &str) -> Option<Deck> {
        self.decks.lock().get(deck_id).cloned()
    }

    /// Every text run of a deck, in walk order
    pub fn text_runs(&self, deck_id: &str) -> Option<Vec<String>> {
        let decks = self.decks.lock();
        let deck = decks.get(deck_id)?;
        let mut runs = Vec::new();
        for element in deck.slides.iter().flat_map(|slide| slide.elements.iter()) {
            element.for_each_text_run(&mut |run| runs.push(run.to_string()));
        }
        Some(runs)
    }

    /// Read a deck from a JSON file
    pub fn load_deck(path: &Path) -> Result<Deck> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read deck file: {:?}", path))?;
        let deck: Deck = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse deck file: {:?}", path))?;
        Ok(deck)
    }

    /// Write a deck to a JSON file
    pub fn save_deck(deck: &Deck, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }
        let content = serde_json::to_string_pretty(deck).context("Failed to serialize deck")?;
        fs::write(path, content).with_context(|| format!("Failed to write deck file: {:?}", path))?;
        Ok(())
    }
}

/// Replace every occurrence of `original` in the runs of the scoped slides
///
/// An empty scope means every slide. Returns the number of occurrences changed.
fn replace_in_deck(deck: &mut Deck, original: &str, translated: &str, slide_ids: &[String]) -> u64 {
    if original.is_empty() {
        return 0;
    }

    let mut changed = 0u64;
    for slide in deck
        .slides
        .iter_mut()
        .filter(|slide| slide_ids.is_empty() || slide_ids.contains(&slide.id))
    {
        for element in &mut slide.elements {
            element.for_each_text_run_mut(&mut |run| {
                let found = run.matches(original).count() as u64;
                if found > 0 {
                    *run = run.replace(original, translated);
                    changed += found;
                }
            });
        }
    }
    changed
}

#[async_trait]
impl DeckService for MemoryDeckStore {
    async fn fetch(&self, deck_id: &str) -> Result<Deck, DeckError> {
        self.get(deck_id)
            .ok_or_else(|| DeckError::access(deck_id, "presentation not found"))
    }

    async fn copy(&self, deck_id: &str, title: &str) -> Result<DeckCopy, DeckError> {
        let mut deck = self.fetch(deck_id).await?;
        let new_id = Uuid::new_v4().simple().to_string();
        deck.id = new_id.clone();
        deck.title = title.to_string();
        self.insert(deck);

        debug!("Copied '{}' to '{}'", deck_id, new_id);
        Ok(DeckCopy {
            url: presentation_url(&new_id),
            id: new_id,
            title: title.to_string(),
        })
    }

    async fn apply_batch(&self, deck_id: &str, batch: &ReplacementBatch) -> Result<Vec<u64>, DeckError> {
        let mut decks = self.decks.lock();
        let deck = decks
            .get_mut(deck_id)
            .ok_or_else(|| DeckError::apply(deck_id, batch.number, "presentation not found"))?;

        Ok(batch
            .requests
            .iter()
            .map(|request| replace_in_deck(deck, &request.original, &request.translated, &request.slide_ids))
            .collect())
    }
}
