//! Merge per-chunk outcomes into one [`CombinedResult`].

use log::warn;

use crate::{CombinedResult, PartitionedResult};

use super::scheduler::ChunkOutcome;

/// Fold outcomes in iteration order. Callers pass them in submission order, which keeps
/// output layout stable no matter which chunk finished first. Failed chunks are recorded and skipped.
pub fn aggregate<I>(outcomes: I) -> CombinedResult
where
    I: IntoIterator<Item = ChunkOutcome>,
{
    let mut combined = CombinedResult::default();
    for outcome in outcomes {
        match outcome {
            Ok(result) => merge_into(&mut combined, result),
            Err(failure) => {
                warn!(
                    "Chunk {} (lines {}..{}) failed: {}",
                    failure.index,
                    failure.first_line,
                    failure.first_line + failure.line_count.saturating_sub(1),
                    failure.message
                );
                combined.failures.push(failure);
            }
        }
    }
    combined
}

/// Append lists, union sets.
pub fn merge_into(combined: &mut CombinedResult, result: PartitionedResult) {
    combined.valid.extend(result.valid);
    combined.invalid.extend(result.invalid);
    combined.phones.extend(result.phones);
    combined.emails.extend(result.emails);
}
