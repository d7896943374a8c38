/*!
 * Tests for replacement ordering and batching
 */

use slides_translator::translation::{ReplacementPlanner, Translations, index_deck};

use crate::common::{deck_with_runs, quarterly_review_deck};

fn translate_all(fragments: impl Iterator<Item = String>) -> Translations {
    fragments.map(|f| (f.clone(), format!("<{}>", f))).collect()
}

#[test]
fn test_plan_should_cover_every_translated_fragment_once() {
    let index = index_deck(&quarterly_review_deck());
    let translations = translate_all(index.fragments().map(str::to_string));

    let batches = ReplacementPlanner::new(4).plan(&translations, &index);

    let mut planned: Vec<_> = batches
        .iter()
        .flat_map(|b| b.requests.iter().map(|r| r.original.clone()))
        .collect();
    planned.sort();
    let mut expected: Vec<_> = index.fragments().map(str::to_string).collect();
    expected.sort();
    assert_eq!(planned, expected);
    assert!(batches.iter().all(|b| b.len() <= 4));
    assert_eq!(batches.len(), 3);
}

#[test]
fn test_plan_should_order_by_character_count_not_bytes() {
    // "Überblick" is 9 characters but 10 bytes
    let deck = deck_with_runs("d", &[("s1", &["Überblick", "Zusammenf"])]);
    let index = index_deck(&deck);
    let translations = translate_all(index.fragments().map(str::to_string));

    let requests = ReplacementPlanner::new(10).order_requests(&translations, &index);

    let originals: Vec<_> = requests.iter().map(|r| r.original.as_str()).collect();
    assert_eq!(originals, vec!["Zusammenf", "Überblick"]);
}

#[test]
fn test_plan_should_scope_each_request_to_its_slides() {
    let deck = deck_with_runs("d", &[("s1", &["Hello"]), ("s2", &["Hello", "World"])]);
    let index = index_deck(&deck);
    let translations = translate_all(["Hello".to_string(), "World".to_string()].into_iter());

    let batches = ReplacementPlanner::new(50).plan(&translations, &index);

    assert_eq!(batches.len(), 1);
    let hello = batches[0].requests.iter().find(|r| r.original == "Hello").unwrap();
    assert_eq!(hello.slide_ids, vec!["s1", "s2"]);
    let world = batches[0].requests.iter().find(|r| r.original == "World").unwrap();
    assert_eq!(world.slide_ids, vec!["s2"]);
}

#[test]
fn test_plan_with_substring_chain_should_apply_longest_first() {
    let deck = deck_with_runs(
        "d",
        &[("s1", &["Sales", "Sales report", "Sales report 2024 draft", "report"])],
    );
    let index = index_deck(&deck);
    let translations = translate_all(index.fragments().map(str::to_string));

    let batches = ReplacementPlanner::new(1).plan(&translations, &index);

    let order: Vec<_> = batches.iter().map(|b| b.requests[0].original.as_str()).collect();
    assert_eq!(order, vec!["Sales report 2024 draft", "Sales report", "report", "Sales"]);
    assert_eq!(batches.iter().map(|b| b.number).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
}
