use crate::CombinedResult;

/// Log a summary of chunks that produced no result. Call after the join barrier.
/// Per-chunk detail goes to stderr when verbose.
pub fn report_chunk_failures(combined: &CombinedResult, verbose: bool) {
    if combined.failures.is_empty() {
        return;
    }
    log::warn!(
        "{} chunk(s) failed; {} input lines are missing from the outputs",
        combined.failures.len(),
        combined.failed_line_count()
    );
    if verbose {
        for f in &combined.failures {
            eprintln!(
                "  chunk {}: lines {}..{}: {}",
                f.index,
                f.first_line,
                f.first_line + f.line_count.saturating_sub(1),
                f.message
            );
        }
    }
}
