/*!
 * Deck walker: builds the text index from a presentation's element tree.
 */

use log::debug;

use crate::deck::{Deck, PageElement};

use super::index::{TextIndex, normalize_fragment};

/// Scan every slide depth first and index the translatable text runs
///
/// Text inside groups and tables is attributed to the slide that owns the
/// element, since replacements are later scoped per slide.
pub fn index_deck(deck: &Deck) -> TextIndex {
    let mut index = TextIndex::new();

    for slide in &deck.slides {
        for element in &slide.elements {
            walk_element(element, &slide.id, &mut index);
        }
    }

    debug!(
        "[{}] Indexed {} unique texts across {} slides",
        deck.id,
        index.len(),
        index.slide_count()
    );
    index
}

fn walk_element(element: &PageElement, slide_id: &str, index: &mut TextIndex) {
    match element {
        PageElement::Shape { text_runs } => index_runs(text_runs, slide_id, index),
        PageElement::Group { children } => {
            for child in children {
                walk_element(child, slide_id, index);
            }
        }
        PageElement::Table { rows } => {
            for cell in rows.iter().flat_map(|row| row.cells.iter()) {
                index_runs(&cell.text_runs, slide_id, index);
            }
        }
        PageElement::Other => {}
    }
}

fn index_runs(runs: &[String], slide_id: &str, index: &mut TextIndex) {
    for fragment in runs.iter().filter_map(|run| normalize_fragment(run)) {
        index.insert(fragment, slide_id);
    }
}
