/*!
 * Sequential application of replacement batches.
 */

use log::{debug, error, info};
use std::sync::Arc;

use crate::deck::DeckService;
use crate::errors::DeckError;

use super::planner::ReplacementBatch;

/// Result of applying a plan
#[derive(Debug, Default)]
pub struct ApplyOutcome {
    /// Occurrences changed by the batches that succeeded
    pub occurrences_changed: u64,

    /// Batches acknowledged by the service
    pub batches_applied: usize,

    /// Batches in the plan
    pub batches_total: usize,

    /// First apply error; later batches were not submitted
    pub error: Option<DeckError>,
}

/// Submits batches one at a time, in plan order
pub struct BatchApplier {
    service: Arc<dyn DeckService>,
}

impl BatchApplier {
    pub fn new(service: Arc<dyn DeckService>) -> Self {
        Self { service }
    }

    /// Apply every batch, stopping at the first failure
    ///
    /// Batches applied before a failure stay applied.
    pub async fn apply(
        &self,
        deck_id: &str,
        batches: &[ReplacementBatch],
        progress: impl Fn(usize, usize),
    ) -> ApplyOutcome {
        let mut outcome = ApplyOutcome {
            batches_total: batches.len(),
            ..Default::default()
        };

        for batch in batches {
            debug!(
                "[{}] Applying batch {}/{} ({} requests)",
                deck_id,
                batch.number,
                batches.len(),
                batch.len()
            );
            match self.service.apply_batch(deck_id, batch).await {
                Ok(counts) => {
                    outcome.occurrences_changed += counts.iter().sum::<u64>();
                    outcome.batches_applied += 1;
                    progress(outcome.batches_applied, outcome.batches_total);
                }
                Err(err) => {
                    error!("[{}] {}", deck_id, err);
                    outcome.error = Some(err);
                    return outcome;
                }
            }
        }

        info!(
            "[{}] Applied {} batches, {} occurrences changed",
            deck_id, outcome.batches_applied, outcome.occurrences_changed
        );
        outcome
    }
}
