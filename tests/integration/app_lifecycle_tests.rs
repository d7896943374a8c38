/*!
 * Tests for full application runs through the controller
 */

use std::sync::Arc;

use slides_translator::app_controller::{Controller, RunOutcome};
use slides_translator::auth::PENDING_MESSAGE;
use slides_translator::deck::MemoryDeckStore;
use slides_translator::errors::{AppError, AuthError, DeckError};
use slides_translator::providers::mock::MockTranslator;

use crate::common::{FlakyDeck, create_temp_dir, deck_with_runs, init_test_logging, quarterly_review_deck, test_config, write_deck_file};

#[tokio::test]
async fn test_run_local_should_write_translated_deck() {
    init_test_logging();
    let dir = create_temp_dir().unwrap();
    let input = write_deck_file(dir.path(), "deck.json", &quarterly_review_deck()).unwrap();
    let output = dir.path().join("out").join("deck.es.json");
    let controller = Controller::with_config(test_config(dir.path())).unwrap();

    let outcome = controller
        .run_local(Arc::new(MockTranslator::working()), &input, &output, None)
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Completed(_)));
    let translated = MemoryDeckStore::load_deck(&output).unwrap();
    assert_eq!(translated.slides.len(), 4);
    let mut runs = Vec::new();
    for element in &translated.slides[1].elements {
        element.for_each_text_run(&mut |run| runs.push(run.to_string()));
    }
    assert_eq!(
        runs,
        vec!["[Spanish] Agenda", "[Spanish] Revenue", "[Spanish] Customers", "[Spanish] Next steps"]
    );
    // The input file is left as it was
    assert_eq!(MemoryDeckStore::load_deck(&input).unwrap(), quarterly_review_deck());
}

#[test]
fn test_run_local_with_missing_input_should_fail() {
    let dir = create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(dir.path())).unwrap();

    let result = tokio_test::block_on(controller.run_local(
        Arc::new(MockTranslator::working()),
        &dir.path().join("nope.json"),
        &dir.path().join("out.json"),
        None,
    ));

    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_google_without_cached_token_should_be_pending() {
    init_test_logging();
    let dir = create_temp_dir().unwrap();
    let controller = Controller::with_config(test_config(dir.path())).unwrap();

    let outcome = controller.run_google("any-presentation", None, None).await.unwrap();

    match outcome {
        RunOutcome::AuthPending(pending) => {
            assert_eq!(pending.message, PENDING_MESSAGE);
            assert!(pending.authorization_url.starts_with("https://accounts.google.com/o/oauth2/auth?"));
            assert!(pending.authorization_url.contains("client_id=test-client"));
        }
        other => panic!("expected pending authorization, got {:?}", other),
    }
}

#[tokio::test]
async fn test_run_google_without_oauth_client_should_fail() {
    let dir = create_temp_dir().unwrap();
    let mut config = test_config(dir.path());
    config.auth.client_secret.clear();
    let controller = Controller::with_config(config).unwrap();

    let result = controller.run_google("any-presentation", None, None).await;

    assert!(matches!(
        result,
        Err(AppError::Auth(AuthError::MissingClient(message))) if message.contains("OAuth client id and secret")
    ));
}

#[tokio::test]
async fn test_translate_copy_with_rejected_batch_should_abort_with_partial_report() {
    let dir = create_temp_dir().unwrap();
    let mut config = test_config(dir.path());
    config.replacement.batch_size = 1;
    let controller = Controller::with_config(config).unwrap();
    let deck = deck_with_runs("orig", &[("s1", &["Welcome everyone", "Goodbye"])]);
    let service = Arc::new(FlakyDeck::failing_on_call(deck, 2));

    let outcome = controller
        .translate_copy(service.clone(), Arc::new(MockTranslator::working()), "orig", None)
        .await
        .unwrap();

    match outcome {
        RunOutcome::Aborted { report, error } => {
            assert!(matches!(error, DeckError::Apply { batch_number: 2, .. }));
            assert_eq!(report.batches_applied, 1);
            assert_eq!(report.text_occurrences_changed, 1);
            assert_eq!(report.presentation_title, "Test deck (Spanish)");
            assert_eq!(
                service.store().text_runs(&report.presentation_id).unwrap(),
                vec!["[Spanish] Welcome everyone", "Goodbye"]
            );
        }
        other => panic!("expected aborted run, got {:?}", other),
    }
}
