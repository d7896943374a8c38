/*!
 * Replacement planning.
 *
 * Turns the translation map into ordered, fixed-size batches of
 * replace-all requests. Longer fragments are replaced first so that a short
 * fragment which is a substring of a longer one cannot clobber it before the
 * longer one has been handled. This reduces, but does not rule out,
 * interference between overlapping fragments: a translated text may itself
 * contain a shorter source fragment that is replaced later.
 */

use log::debug;
use serde::Serialize;

use super::dispatcher::Translations;
use super::index::TextIndex;

/// Replace every occurrence of `original` with `translated` on the given slides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementRequest {
    /// Source fragment, matched case-sensitively
    pub original: String,
    /// Replacement text
    pub translated: String,
    /// Slides the substitution is restricted to
    pub slide_ids: Vec<String>,
}

/// Requests submitted together in one apply call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementBatch {
    /// 1-based position of the batch in the plan
    pub number: usize,
    /// Requests in application order
    pub requests: Vec<ReplacementRequest>,
}

impl ReplacementBatch {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Orders translated fragments and groups them into batches
#[derive(Debug, Clone)]
pub struct ReplacementPlanner {
    batch_size: usize,
}

impl ReplacementPlanner {
    /// Create a planner emitting batches of at most `batch_size` requests
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Build the ordered request list, longest source fragment first
    ///
    /// A fragment is skipped when its translation is blank, identical to the
    /// source, or when the index holds no location for it.
    pub fn order_requests(&self, translations: &Translations, index: &TextIndex) -> Vec<ReplacementRequest> {
        let mut ordered: Vec<(&String, &String)> = translations.iter().collect();
        ordered.sort_by(|(a, _), (b, _)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });

        let mut requests = Vec::with_capacity(ordered.len());
        for (original, translated) in ordered {
            if translated.trim().is_empty() || translated == original {
                continue;
            }
            let slide_ids: Vec<String> = match index.locations(original) {
                Some(slides) if !slides.is_empty() => slides.iter().cloned().collect(),
                _ => {
                    debug!("Skipping '{}': no known location", original);
                    continue;
                }
            };
            requests.push(ReplacementRequest {
                original: original.clone(),
                translated: translated.clone(),
                slide_ids,
            });
        }
        requests
    }

    /// Build the ordered batches for a run
    pub fn plan(&self, translations: &Translations, index: &TextIndex) -> Vec<ReplacementBatch> {
        let requests = self.order_requests(translations, index);
        let batches = self.chunk(requests);
        debug!(
            "Planned {} batches of up to {} requests",
            batches.len(),
            self.batch_size
        );
        batches
    }

    /// Split ordered requests into consecutive batches
    pub fn chunk(&self, requests: Vec<ReplacementRequest>) -> Vec<ReplacementBatch> {
        let mut batches = Vec::with_capacity(requests.len().div_ceil(self.batch_size));
        let mut current = Vec::with_capacity(self.batch_size);

        for request in requests {
            current.push(request);
            if current.len() == self.batch_size {
                batches.push(ReplacementBatch {
                    number: batches.len() + 1,
                    requests: std::mem::take(&mut current),
                });
            }
        }
        if !current.is_empty() {
            batches.push(ReplacementBatch {
                number: batches.len() + 1,
                requests: current,
            });
        }
        batches
    }
}
