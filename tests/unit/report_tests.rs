/*!
 * Tests for the run report
 */

use std::sync::Arc;

use slides_translator::deck::MemoryDeckStore;
use slides_translator::providers::mock::MockTranslator;
use slides_translator::translation::{PipelineOptions, TokenUsage, TranslationPipeline, TranslationReport};

use crate::common::quarterly_review_deck;

#[test]
fn test_report_json_should_expose_documented_keys() {
    let json = serde_json::to_value(TranslationReport::default()).unwrap();
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();

    for key in [
        "presentation_id",
        "presentation_url",
        "presentation_title",
        "slides_count",
        "unique_text_runs_found",
        "text_runs_translated",
        "text_occurrences_changed",
        "estimated_words_translated",
        "total_input_tokens",
        "total_output_tokens",
        "total_cost_usd",
        "batches_applied",
        "batches_total",
        "failed_fragments",
    ] {
        assert!(keys.iter().any(|k| k == key), "missing {}", key);
    }
}

#[tokio::test]
async fn test_report_should_sum_tokens_and_leave_unknown_models_unpriced() {
    let store = MemoryDeckStore::new();
    store.insert(quarterly_review_deck());
    // 11 fragments, 100k input and 50k output tokens each
    let translator = MockTranslator::working().with_usage(TokenUsage::new(100_000, 50_000));
    let pipeline = TranslationPipeline::new(Arc::new(store), Arc::new(translator), PipelineOptions::default());

    let report = pipeline.run("q3-review", "French", None).await.unwrap().report;

    assert_eq!(report.total_input_tokens, 1_100_000);
    assert_eq!(report.total_output_tokens, 550_000);
    assert_eq!(report.total_cost_usd, 0.0);
    assert_eq!(
        report.presentation_url,
        "https://docs.google.com/presentation/d/q3-review/edit"
    );
    assert_eq!(report.slides_count, 4);
}
