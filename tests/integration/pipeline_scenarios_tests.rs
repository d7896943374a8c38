/*!
 * End-to-end pipeline scenarios over the in-memory deck store.
 */

use std::sync::Arc;

use slides_translator::deck::{MemoryDeckStore, PageElement};
use slides_translator::errors::DeckError;
use slides_translator::providers::mock::MockTranslator;
use slides_translator::translation::{PipelineOptions, TranslationPipeline};

use crate::common::{FlakyDeck, deck_with_runs, quarterly_review_deck};

fn options(workers: usize, batch_size: usize) -> PipelineOptions {
    PipelineOptions { workers, batch_size }
}

#[tokio::test]
async fn test_run_with_one_failed_fragment_should_translate_the_rest() {
    let store = Arc::new(MemoryDeckStore::new());
    store.insert(deck_with_runs("d", &[("s1", &["Hello"]), ("s2", &["Hello", "World"])]));
    let translator = Arc::new(
        MockTranslator::working()
            .with_translations([("Hello", "Hola")])
            .failing_on(["World"]),
    );
    let pipeline = TranslationPipeline::new(store.clone(), translator.clone(), options(10, 50));

    let outcome = pipeline.run("d", "Spanish", None).await.unwrap();

    assert!(outcome.is_success());
    let report = outcome.report;
    assert_eq!(report.unique_text_runs_found, 2);
    assert_eq!(report.text_runs_translated, 1);
    assert_eq!(report.failed_fragments, vec!["World"]);
    assert_eq!(report.text_occurrences_changed, 2);
    assert_eq!(translator.call_count(), 2);
    assert_eq!(store.text_runs("d").unwrap(), vec!["Hola", "Hola", "World"]);
}

#[tokio::test]
async fn test_run_with_batch_size_one_should_apply_each_request_separately() {
    let deck = FlakyDeck::recording(deck_with_runs("d", &[("s1", &["Hello", "World"]), ("s2", &["Hello"])]));
    let service = Arc::new(deck);
    let pipeline = TranslationPipeline::new(service.clone(), Arc::new(MockTranslator::working()), options(2, 1));

    let outcome = pipeline.run("d", "German", None).await.unwrap();

    assert!(outcome.is_success());
    assert!(outcome.report.fatal_error.is_none());
    assert!(serde_json::to_value(&outcome.report).unwrap().get("fatal_error").is_none());
    assert_eq!(service.submitted_batches(), vec![1, 2]);
    assert_eq!(outcome.report.batches_applied, 2);
    assert_eq!(outcome.report.batches_total, 2);
    assert_eq!(outcome.report.text_occurrences_changed, 3);
}

#[tokio::test]
async fn test_run_with_failing_second_batch_should_stop_and_keep_first() {
    // Three fragments of distinct lengths, one per batch: "Gamma ray" → "Alpha" → "Beta"
    let deck = deck_with_runs("d", &[("s1", &["Alpha", "Beta", "Gamma ray"]), ("s2", &["Gamma ray"])]);
    let service = Arc::new(FlakyDeck::failing_on_call(deck, 2));
    let pipeline = TranslationPipeline::new(service.clone(), Arc::new(MockTranslator::working()), options(3, 1));

    let outcome = pipeline.run("d", "Italian", None).await.unwrap();

    assert_eq!(service.submitted_batches(), vec![1, 2]);
    assert!(matches!(
        outcome.apply_error,
        Some(DeckError::Apply { batch_number: 2, .. })
    ));
    let report = outcome.report;
    assert_eq!(
        report.fatal_error.as_deref(),
        Some("Failed to apply batch 2 to presentation 'd': simulated rejection")
    );
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["fatal_error"], report.fatal_error.clone().unwrap());
    assert_eq!(report.batches_applied, 1);
    assert_eq!(report.batches_total, 3);
    assert_eq!(report.text_occurrences_changed, 2);
    assert_eq!(report.text_runs_translated, 3);
    assert_eq!(
        service.store().text_runs("d").unwrap(),
        vec!["Alpha", "Beta", "[Italian] Gamma ray", "[Italian] Gamma ray"]
    );
}

#[tokio::test]
async fn test_run_with_identity_translator_should_change_nothing() {
    let store = Arc::new(MemoryDeckStore::new());
    store.insert(quarterly_review_deck());
    let before = store.get("q3-review").unwrap();
    let pipeline = TranslationPipeline::new(store.clone(), Arc::new(MockTranslator::identity()), options(10, 50));

    let outcome = pipeline.run("q3-review", "English", None).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.report.text_occurrences_changed, 0);
    assert_eq!(outcome.report.text_runs_translated, 11);
    assert_eq!(store.get("q3-review").unwrap(), before);
}

#[tokio::test]
async fn test_run_should_translate_each_fragment_once_regardless_of_repeats() {
    let store = Arc::new(MemoryDeckStore::new());
    store.insert(quarterly_review_deck());
    let translator = Arc::new(MockTranslator::working());
    let pipeline = TranslationPipeline::new(store.clone(), translator.clone(), options(4, 50));

    let outcome = pipeline.run("q3-review", "French", None).await.unwrap();

    assert_eq!(translator.call_count(), 11);
    assert!(translator.max_in_flight() <= 4);
    // "Revenue" appears three times, "Next steps" twice
    assert_eq!(outcome.report.text_occurrences_changed, 14);

    let deck = store.get("q3-review").unwrap();
    let mut table_cells = Vec::new();
    for element in &deck.slides[2].elements {
        if let PageElement::Table { rows } = element {
            for cell in rows.iter().flat_map(|r| r.cells.iter()) {
                table_cells.extend(cell.text_runs.iter().cloned());
            }
        }
    }
    assert_eq!(
        table_cells,
        vec!["[French] Region", "[French] Revenue", "[French] EMEA", "1,200", "[French] APAC", "950"]
    );
}

#[tokio::test]
async fn test_run_when_every_translation_fails_should_apply_nothing() {
    let service = Arc::new(FlakyDeck::recording(quarterly_review_deck()));
    let pipeline = TranslationPipeline::new(service.clone(), Arc::new(MockTranslator::failing()), options(10, 50));

    let outcome = pipeline.run("q3-review", "Spanish", None).await.unwrap();

    assert!(outcome.is_success());
    assert_eq!(outcome.report.text_runs_translated, 0);
    assert_eq!(outcome.report.failed_fragments.len(), 11);
    assert_eq!(outcome.report.batches_total, 0);
    assert!(service.submitted_batches().is_empty());
}

#[tokio::test]
async fn test_run_with_empty_translations_should_report_them_as_failures() {
    let store = Arc::new(MemoryDeckStore::new());
    store.insert(deck_with_runs("d", &[("s1", &["Hello"])]));
    let pipeline = TranslationPipeline::new(store.clone(), Arc::new(MockTranslator::empty()), options(1, 50));

    let outcome = pipeline.run("d", "Spanish", None).await.unwrap();

    assert_eq!(outcome.report.failed_fragments, vec!["Hello"]);
    assert_eq!(store.text_runs("d").unwrap(), vec!["Hello"]);
}
