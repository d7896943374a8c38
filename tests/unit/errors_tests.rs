/*!
 * Tests for error types
 */

use slides_translator::errors::{AppError, AuthError, DeckError, ProviderError, TranslationError};

#[test]
fn test_from_status_should_classify_auth_and_rate_limit() {
    assert!(matches!(
        ProviderError::from_status(401, "bad key"),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(403, "forbidden"),
        ProviderError::AuthenticationError(_)
    ));
    assert!(matches!(
        ProviderError::from_status(429, "slow down"),
        ProviderError::RateLimitExceeded(_)
    ));
    assert!(matches!(
        ProviderError::from_status(500, "boom"),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

#[test]
fn test_deck_errors_should_name_presentation_and_batch() {
    let access = DeckError::access("abc", "404 Not Found");
    assert_eq!(
        access.to_string(),
        "Cannot access presentation 'abc': 404 Not Found"
    );

    let apply = DeckError::apply("abc", 2, "invalid request");
    assert_eq!(
        apply.to_string(),
        "Failed to apply batch 2 to presentation 'abc': invalid request"
    );
}

#[test]
fn test_app_error_should_wrap_component_errors() {
    let from_deck: AppError = DeckError::access("abc", "gone").into();
    assert!(matches!(from_deck, AppError::Deck(DeckError::Access { .. })));

    let from_auth: AppError = AuthError::Exchange("invalid_grant".to_string()).into();
    assert!(from_auth.to_string().contains("invalid_grant"));

    let from_provider: AppError = ProviderError::AuthenticationError("API key not valid".to_string()).into();
    assert!(matches!(from_provider, AppError::Provider(ProviderError::AuthenticationError(_))));

    let from_translation = TranslationError::from(ProviderError::ConnectionError("timeout".to_string()));
    assert!(from_translation.to_string().contains("timeout"));

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "deck.json").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_anyhow: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(from_anyhow, AppError::Unknown(_)));
}
