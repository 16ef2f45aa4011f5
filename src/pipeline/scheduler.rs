//! Bounded worker pool for chunk tasks. One pool per run; handles are awaited in submission order.

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, bounded};
use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::{ChunkFailure, CombinedResult, PartitionedResult};

use super::aggregate::aggregate;

/// Result of awaiting one chunk: its partition, or why it produced none.
pub type ChunkOutcome = std::result::Result<PartitionedResult, ChunkFailure>;

type TaskResult = std::thread::Result<PartitionedResult>;

/// Handle to one submitted chunk. Receives exactly one message from its task.
pub struct ChunkHandle {
    index: usize,
    first_line: usize,
    line_count: usize,
    rx: Receiver<TaskResult>,
}

impl ChunkHandle {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Block until the task finishes. A panic or a vanished task becomes a [`ChunkFailure`].
    pub fn wait(self) -> ChunkOutcome {
        match self.rx.recv() {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(payload)) => Err(self.failure(panic_message(payload.as_ref()))),
            Err(_) => Err(self.failure("worker exited without a result".to_string())),
        }
    }

    fn failure(&self, message: String) -> ChunkFailure {
        ChunkFailure {
            index: self.index,
            first_line: self.first_line,
            line_count: self.line_count,
            message,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("chunk task panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("chunk task panicked: {s}")
    } else {
        "chunk task panicked".to_string()
    }
}

/// Run-scoped pool of exactly `workers` threads. [`Scheduler::finish`] consumes it, so nothing
/// can be submitted once the driver starts waiting.
pub struct Scheduler {
    pool: ThreadPool,
    submitted: usize,
    lines_submitted: usize,
    on_chunk_done: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl Scheduler {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            anyhow::bail!("worker count must be at least 1");
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("{}-worker-{i}", env!("CARGO_PKG_NAME")))
            .build()
            .context("build worker pool")?;
        debug!("Worker pool: {} threads", workers);
        Ok(Self {
            pool,
            submitted: 0,
            lines_submitted: 0,
            on_chunk_done: None,
        })
    }

    /// Call `cb` from the worker each time a chunk task ends (success or panic).
    pub fn with_chunk_done(mut self, cb: Option<Arc<dyn Fn() + Send + Sync>>) -> Self {
        self.on_chunk_done = cb;
        self
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }

    /// Queue `f(lines)` on the pool and return its handle. Tasks may finish in any order.
    pub fn submit<F>(&mut self, lines: Vec<String>, f: F) -> ChunkHandle
    where
        F: FnOnce(&[String]) -> PartitionedResult + Send + 'static,
    {
        let (tx, rx) = bounded::<TaskResult>(1);
        let handle = ChunkHandle {
            index: self.submitted,
            first_line: self.lines_submitted + 1,
            line_count: lines.len(),
            rx,
        };
        self.submitted += 1;
        self.lines_submitted += lines.len();

        let on_done = self.on_chunk_done.clone();
        self.pool.spawn(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(&lines)));
            if let Some(cb) = on_done {
                cb();
            }
            let _ = tx.send(outcome);
        });
        handle
    }

    /// Join barrier: await every handle in the order given (submission order), merge, then drop the pool.
    pub fn finish(self, handles: Vec<ChunkHandle>) -> CombinedResult {
        debug!(
            "Awaiting {} chunk tasks ({} lines)",
            handles.len(),
            self.lines_submitted
        );
        let combined = aggregate(handles.into_iter().map(ChunkHandle::wait));
        drop(self.pool);
        combined
    }
}
