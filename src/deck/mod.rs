/*!
 * Presentation model and the service seam used to read and update decks.
 *
 * - `Deck`, `Slide`, `PageElement`: the element tree the walker indexes
 * - `DeckService`: fetch / copy / apply-batch operations
 * - `google`: Google Slides + Drive REST implementation
 * - `memory`: in-memory implementation for offline runs and tests
 */

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::DeckError;
use crate::translation::planner::ReplacementBatch;

pub mod google;
pub mod memory;

pub use self::google::GoogleSlidesClient;
pub use self::memory::MemoryDeckStore;

/// A presentation: an ordered list of slides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Presentation identifier
    pub id: String,

    /// Presentation title
    #[serde(default)]
    pub title: String,

    /// Slides in presentation order
    #[serde(default)]
    pub slides: Vec<Slide>,
}

/// A single slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide object id, unique within the deck
    pub id: String,

    /// Page elements in z-order
    #[serde(default)]
    pub elements: Vec<PageElement>,
}

/// An element placed on a slide
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageElement {
    /// Text box or any shape carrying text
    Shape {
        #[serde(default)]
        text_runs: Vec<String>,
    },

    /// Grouped elements
    Group {
        #[serde(default)]
        children: Vec<PageElement>,
    },

    /// Table made of rows of cells
    Table {
        #[serde(default)]
        rows: Vec<TableRow>,
    },

    /// Image, line, video or anything else without text
    Other,
}

/// A table row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub cells: Vec<TableCell>,
}

/// A table cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub text_runs: Vec<String>,
}

/// Result of copying a presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckCopy {
    /// Identifier of the new presentation
    pub id: String,
    /// Title given to the copy
    pub title: String,
    /// Edit URL of the copy
    pub url: String,
}

impl Deck {
    /// Create an empty deck
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Append a slide and return self, for building fixtures
    pub fn with_slide(mut self, slide: Slide) -> Self {
        self.slides.push(slide);
        self
    }

    /// Number of text runs in the deck that are non-empty after trimming
    pub fn non_empty_text_run_count(&self) -> usize {
        let mut count = 0;
        for slide in &self.slides {
            for element in &slide.elements {
                element.for_each_text_run(&mut |run| {
                    if !run.trim().is_empty() {
                        count += 1;
                    }
                });
            }
        }
        count
    }
}

impl Slide {
    /// Create a slide from its elements
    pub fn new(id: impl Into<String>, elements: Vec<PageElement>) -> Self {
        Self {
            id: id.into(),
            elements,
        }
    }
}

impl PageElement {
    /// Shape holding the given text runs
    pub fn shape<I, S>(runs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Shape {
            text_runs: runs.into_iter().map(Into::into).collect(),
        }
    }

    /// Group holding the given children
    pub fn group(children: Vec<PageElement>) -> Self {
        Self::Group { children }
    }

    /// Table built from rows of cell texts, one run per cell
    pub fn table<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Table {
            rows: rows
                .into_iter()
                .map(|cells| TableRow {
                    cells: cells
                        .into_iter()
                        .map(|text| TableCell {
                            text_runs: vec![text.into()],
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Visit every text run under this element, depth first
    pub fn for_each_text_run(&self, visit: &mut dyn FnMut(&str)) {
        match self {
            PageElement::Shape { text_runs } => text_runs.iter().for_each(|run| visit(run.as_str())),
            PageElement::Group { children } => {
                for child in children {
                    child.for_each_text_run(visit);
                }
            }
            PageElement::Table { rows } => {
                for cell in rows.iter().flat_map(|row| row.cells.iter()) {
                    cell.text_runs.iter().for_each(|run| visit(run.as_str()));
                }
            }
            PageElement::Other => {}
        }
    }

    /// Visit every text run under this element mutably, depth first
    pub fn for_each_text_run_mut(&mut self, visit: &mut dyn FnMut(&mut String)) {
        match self {
            PageElement::Shape { text_runs } => text_runs.iter_mut().for_each(|run| visit(run)),
            PageElement::Group { children } => {
                for child in children {
                    child.for_each_text_run_mut(visit);
                }
            }
            PageElement::Table { rows } => {
                for cell in rows.iter_mut().flat_map(|row| row.cells.iter_mut()) {
                    cell.text_runs.iter_mut().for_each(|run| visit(run));
                }
            }
            PageElement::Other => {}
        }
    }
}

/// Edit URL of a Google Slides presentation
pub fn presentation_url(presentation_id: &str) -> String {
    format!("https://docs.google.com/presentation/d/{}/edit", presentation_id)
}

/// Presentation id from a bare id or a pasted presentation URL
///
/// `https://docs.google.com/presentation/d/<id>/edit#slide=id.p` → `<id>`
pub fn presentation_id_from_input(input: &str) -> String {
    let input = input.trim();
    let Ok(url) = Url::parse(input) else {
        return input.to_string();
    };
    let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
    segments
        .windows(2)
        .find(|pair| pair[0] == "d" && !pair[1].is_empty())
        .map(|pair| pair[1].to_string())
        .unwrap_or_else(|| input.to_string())
}

/// Title given to a translated copy
pub fn copy_title(original_title: &str, target_language: &str) -> String {
    let original = if original_title.trim().is_empty() {
        "Untitled"
    } else {
        original_title
    };
    format!("{} ({})", original, target_language)
}

/// Operations the pipeline needs from a presentation backend
#[async_trait]
pub trait DeckService: Send + Sync {
    /// Retrieve the full element tree of a presentation
    async fn fetch(&self, deck_id: &str) -> Result<Deck, DeckError>;

    /// Copy a presentation under a new title
    async fn copy(&self, deck_id: &str, title: &str) -> Result<DeckCopy, DeckError>;

    /// Submit one replacement batch, returning occurrences changed per request
    async fn apply_batch(&self, deck_id: &str, batch: &ReplacementBatch) -> Result<Vec<u64>, DeckError>;
}
