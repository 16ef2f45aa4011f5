//! Progress bar utilities for chunk completion

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a chunk counter. Total is unknown until the input is fully read; see [`set_bar_total`].
pub fn create_chunk_bar(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " chunks"
    )))
}

/// Update the bar's total once every chunk has been submitted. Refreshes the display.
pub fn set_bar_total(pb: &ProgressBar, total: usize) {
    if let Ok(mut bar) = pb.lock() {
        bar.total = total;
        let _ = bar.refresh();
    }
}

/// Advance by `n`. Uses try_lock so a worker never blocks on the bar; a skipped tick is caught up by [`finish_bar`].
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Snap the bar to `done` and end the line.
pub fn finish_bar(pb: &ProgressBar, done: usize) {
    if let Ok(mut bar) = pb.lock() {
        let _ = bar.update_to(done);
        let _ = bar.refresh();
        eprintln!();
    }
}

/// Create a callback that advances the bar by one per call (handed to chunk tasks).
pub fn chunk_done_callback(bar: &Option<ProgressBar>) -> Option<Arc<dyn Fn() + Send + Sync>> {
    bar.as_ref().map(|bar| {
        let bar = Arc::clone(bar);
        Arc::new(move || update_progress_bar(&bar, 1)) as Arc<dyn Fn() + Send + Sync>
    })
}
