/*!
 * Translation pipeline for slide decks using AI providers.
 *
 * It is split into several submodules, one per stage:
 *
 * - `walker`: Builds the text index from a deck's element tree
 * - `index`: Distinct fragments and the slides they occur on
 * - `core`: The `Translator` seam and the provider-backed service
 * - `dispatcher`: Bounded concurrent translation of every fragment
 * - `usage`: Token usage accounting and cost estimation
 * - `planner`: Longest-first ordering and batching of replacements
 * - `applier`: Sequential application of replacement batches
 * - `pipeline`: The stages wired together into one run
 */

// Re-export main types for easier usage
pub use self::applier::{ApplyOutcome, BatchApplier};
pub use self::core::{Translated, TranslationService, Translator};
pub use self::dispatcher::{DispatchOutcome, FragmentFailure, TranslationDispatcher, Translations};
pub use self::index::TextIndex;
pub use self::pipeline::{PipelineOptions, PipelineOutcome, TranslationPipeline, TranslationReport};
pub use self::planner::{ReplacementBatch, ReplacementPlanner, ReplacementRequest};
pub use self::usage::{TokenUsage, UsageTotals};
pub use self::walker::index_deck;

// Submodules
pub mod applier;
pub mod core;
pub mod dispatcher;
pub mod index;
pub mod pipeline;
pub mod planner;
pub mod usage;
pub mod walker;
