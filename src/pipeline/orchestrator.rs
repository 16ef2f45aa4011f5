use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::engine::chunk::process_chunk;
use crate::engine::db_ops::CustomerStore;
use crate::engine::export::{export_invalid, export_valid};
use crate::engine::progress::{
    ProgressBar, chunk_done_callback, create_chunk_bar, finish_bar, set_bar_total,
};
use crate::pipeline::{self, PipelineTuning, ReadStats, Scheduler};
use crate::{CombinedResult, CustOpts, PartitionedResult, RunReport};

/// Read one line (without `\n` / `\r\n`) into `out`. Invalid UTF-8 is replaced, not rejected.
/// Returns false at end of input.
fn read_line_lossy<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    out: &mut String,
) -> std::io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    *out = String::from_utf8_lossy(buf).into_owned();
    Ok(true)
}

/// Producer + join barrier: read `reader` sequentially, submit every full chunk (and the final
/// partial one) to a run-scoped pool, then await all handles in submission order.
pub fn collect_results<R, P>(
    mut reader: R,
    tuning: &PipelineTuning,
    processor: P,
    bar: Option<&ProgressBar>,
) -> Result<(CombinedResult, ReadStats)>
where
    R: BufRead,
    P: Fn(&[String]) -> PartitionedResult + Send + Sync + 'static,
{
    let processor = Arc::new(processor);
    let mut scheduler =
        Scheduler::new(tuning.workers)?.with_chunk_done(chunk_done_callback(&bar.cloned()));
    let mut handles = Vec::new();
    let mut stats = ReadStats::default();

    let submit = |scheduler: &mut Scheduler, lines: Vec<String>| {
        let p = Arc::clone(&processor);
        scheduler.submit(lines, move |lines| (*p)(lines))
    };

    let mut chunk: Vec<String> = Vec::with_capacity(tuning.chunk_size);
    let mut buf = Vec::new();
    let mut line = String::new();
    while read_line_lossy(&mut reader, &mut buf, &mut line)
        .with_context(|| format!("read input line {}", stats.lines_read + 1))?
    {
        stats.lines_read += 1;
        chunk.push(std::mem::take(&mut line));
        if chunk.len() == tuning.chunk_size {
            let full = std::mem::replace(&mut chunk, Vec::with_capacity(tuning.chunk_size));
            handles.push(submit(&mut scheduler, full));
        }
    }
    if !chunk.is_empty() {
        handles.push(submit(&mut scheduler, chunk));
    }
    stats.chunks = scheduler.submitted();
    debug!(
        "Read {} lines into {} chunks",
        stats.lines_read, stats.chunks
    );
    if let Some(bar) = bar {
        set_bar_total(bar, stats.chunks);
    }

    let combined = scheduler.finish(handles);
    if let Some(bar) = bar {
        finish_bar(bar, stats.chunks);
    }
    Ok((combined, stats))
}

/// Main orchestrator with the standard chunk processor. See [`run_pipeline_with`].
pub fn run_pipeline(
    input: &Path,
    opts: &CustOpts,
    store: Option<&mut dyn CustomerStore>,
) -> Result<RunReport> {
    run_pipeline_with(input, opts, store, process_chunk)
}

/// Read → chunk → dispatch → await → aggregate → persist → export, with a caller-supplied processor.
///
/// Hard failures (input I/O, persistence, export I/O) return `Err`. Failed chunks do not: they are
/// listed in the report and the rest of the run completes.
pub fn run_pipeline_with<P>(
    input: &Path,
    opts: &CustOpts,
    store: Option<&mut dyn CustomerStore>,
    processor: P,
) -> Result<RunReport>
where
    P: Fn(&[String]) -> PartitionedResult + Send + Sync + 'static,
{
    let start_time = Instant::now();
    let tuning = PipelineTuning::from_opts(opts)?;

    let file = File::open(input).with_context(|| format!("open input {}", input.display()))?;
    let bar = opts.verbose.then(|| create_chunk_bar("Validating"));
    let (combined, stats) =
        collect_results(BufReader::new(file), &tuning, processor, bar.as_ref())?;
    pipeline::report_chunk_failures(&combined, opts.verbose);

    let persisted = match store {
        Some(store) => {
            let n_valid = store.save_valid(&combined.valid)?;
            let n_invalid = store.save_invalid(&combined.invalid)?;
            debug!("Persisted {} valid, {} invalid", n_valid, n_invalid);
            true
        }
        None => false,
    };

    let export_start = Instant::now();
    std::fs::create_dir_all(&opts.output_dir)
        .with_context(|| format!("create output dir {}", opts.output_dir.display()))?;
    let valid_files = export_valid(&opts.output_dir, &combined.valid, tuning.export_batch_size)?;
    let invalid_file = export_invalid(&opts.output_dir, &combined.invalid)?;
    let export_elapsed = export_start.elapsed();

    let elapsed = start_time.elapsed();
    info!("Total execution time: {} ms", elapsed.as_millis());

    Ok(RunReport {
        lines_read: stats.lines_read,
        chunks: stats.chunks,
        valid: combined.valid.len(),
        invalid: combined.invalid.len(),
        malformed: combined.malformed_count(),
        failed_lines: combined.failed_line_count(),
        distinct_phones: combined.phones.len(),
        distinct_emails: combined.emails.len(),
        failed_chunks: combined.failures,
        persisted,
        valid_files,
        invalid_file,
        elapsed,
        export_elapsed,
    })
}
