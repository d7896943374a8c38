/*!
 * Tests for text discovery over whole decks
 */

use slides_translator::deck::{Deck, PageElement, Slide};
use slides_translator::translation::index::normalize_fragment;
use slides_translator::translation::index_deck;

use crate::common::{deck_with_runs, quarterly_review_deck};

#[test]
fn test_index_deck_with_quarterly_review_should_find_distinct_texts() {
    let deck = quarterly_review_deck();
    let index = index_deck(&deck);

    let fragments: Vec<_> = index.fragments().collect();
    assert_eq!(
        fragments,
        vec![
            "APAC",
            "Agenda",
            "Customers",
            "EMEA",
            "Next steps",
            "Q3 2024",
            "Quarterly Business Review",
            "Region",
            "Revenue",
            "Source: finance team",
            "Thank you",
        ]
    );
    assert!(index.len() <= deck.non_empty_text_run_count());
}

#[test]
fn test_index_deck_should_record_every_slide_a_fragment_appears_on() {
    let index = index_deck(&quarterly_review_deck());

    let revenue: Vec<_> = index.locations("Revenue").unwrap().iter().cloned().collect();
    assert_eq!(revenue, vec!["agenda", "numbers"]);

    let next_steps: Vec<_> = index.locations("Next steps").unwrap().iter().cloned().collect();
    assert_eq!(next_steps, vec!["agenda", "closing"]);
}

#[test]
fn test_index_deck_with_hello_world_scenario_should_match_expected_index() {
    let deck = deck_with_runs("d", &[("s1", &["Hello"]), ("s2", &["Hello", "World"])]);
    let index = index_deck(&deck);

    let entries: Vec<(String, Vec<String>)> = index
        .iter()
        .map(|(fragment, slides)| (fragment.to_string(), slides.iter().cloned().collect()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("Hello".to_string(), vec!["s1".to_string(), "s2".to_string()]),
            ("World".to_string(), vec!["s2".to_string()]),
        ]
    );
}

#[test]
fn test_index_deck_should_give_n_locations_for_n_slides() {
    let slides: Vec<Slide> = (0..7)
        .map(|i| {
            Slide::new(
                format!("s{}", i),
                vec![PageElement::shape(["Confidential", "Confidential"])],
            )
        })
        .collect();
    let deck = slides.into_iter().fold(Deck::new("d", ""), Deck::with_slide);

    let index = index_deck(&deck);

    assert_eq!(index.len(), 1);
    assert_eq!(index.locations("Confidential").unwrap().len(), 7);
}

#[test]
fn test_index_deck_should_never_index_runs_without_letters() {
    let noise = ["", " ", "\n", "\t\t", "2024", "3.14", "-", "•", "(1)", "100%", "$ 1,000", "→"];
    let deck = deck_with_runs("d", &[("s1", &noise)]);

    assert!(index_deck(&deck).is_empty());
    for run in noise {
        assert_eq!(normalize_fragment(run), None, "{:?} should be rejected", run);
    }
}

#[test]
fn test_normalize_fragment_should_accept_non_latin_scripts() {
    assert_eq!(normalize_fragment("  こんにちは "), Some("こんにちは"));
    assert_eq!(normalize_fragment("Привет"), Some("Привет"));
    assert_eq!(normalize_fragment("Ω 1"), Some("Ω 1"));
}

#[test]
fn test_index_deck_should_keep_fragments_case_sensitive() {
    let deck = deck_with_runs("d", &[("s1", &["Sales", "sales", "SALES"])]);
    assert_eq!(index_deck(&deck).len(), 3);
}
