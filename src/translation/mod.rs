/*!
 * Sequential batch translation pipeline.
 *
 * This module owns the batched request/response reconciliation flow:
 *
 * - `batch`: partitioning the entry list into contiguous batch ranges
 * - `codec`: encoding batches into tagged prompts and decoding replies
 * - `pipeline`: the per-batch retry controller and the run loop
 * - `progress`: persisting the whole collection after every batch
 */

// Re-export main types for easier usage
pub use self::batch::{BatchPlan, BatchRange};
pub use self::pipeline::{PipelineOptions, QuotaStop, RunReport, TranslationPipeline};
pub use self::progress::ProgressWriter;

// Submodules
pub mod batch;
pub mod codec;
pub mod pipeline;
pub mod progress;
