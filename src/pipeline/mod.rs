//! Pipeline components: tuning, worker pool, aggregation, error reporting, orchestration.

pub mod aggregate;
pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod scheduler;

pub use aggregate::{aggregate, merge_into};
pub use context::{PipelineTuning, ReadStats};
pub use error_handler::report_chunk_failures;
pub use orchestrator::{collect_results, run_pipeline, run_pipeline_with};
pub use scheduler::{ChunkHandle, ChunkOutcome, Scheduler};
