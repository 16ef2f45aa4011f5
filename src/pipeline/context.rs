//! Pipeline tuning and per-run read statistics.

use anyhow::Result;

use crate::CustOpts;

/// Sizing for one run, validated from [`CustOpts`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PipelineTuning {
    /// Lines per chunk task.
    pub chunk_size: usize,
    /// Worker threads in the run's pool.
    pub workers: usize,
    /// Max lines per valid export file.
    pub export_batch_size: usize,
}

impl PipelineTuning {
    /// Reject zero sizes up front so no chunk is ever submitted with a bad configuration.
    pub fn from_opts(opts: &CustOpts) -> Result<Self> {
        for (name, v) in [
            ("chunk size", opts.chunk_size),
            ("worker count", opts.workers),
            ("export batch size", opts.export_batch_size),
        ] {
            if v == 0 {
                anyhow::bail!("{name} must be at least 1");
            }
        }
        Ok(Self {
            chunk_size: opts.chunk_size,
            workers: opts.workers,
            export_batch_size: opts.export_batch_size,
        })
    }
}

/// What the producer saw while reading and dispatching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub lines_read: usize,
    pub chunks: usize,
}
