//! Batch export of the combined result to delimited text files.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::utils::config::ExportFiles;
use crate::{Customer, InvalidCustomer, ValidCustomer};

/// Number of files `total` valid records produce at `batch_size` per file.
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    total.div_ceil(batch_size)
}

/// Write one customer as 8 comma-joined fields. Absent IP is an empty token.
fn write_customer<W: Write>(w: &mut W, customer: &Customer) -> std::io::Result<()> {
    writeln!(w, "{}", customer.fields().join(","))
}

/// Malformed lines go out as read; everything else in the 8-field layout.
fn write_invalid<W: Write>(w: &mut W, invalid: &InvalidCustomer) -> std::io::Result<()> {
    match &invalid.raw_line {
        Some(raw) => writeln!(w, "{raw}"),
        None => write_customer(w, &invalid.customer),
    }
}

/// Truncate/create `path` and write every row in order.
fn write_rows<T, F>(path: &Path, rows: &[T], mut write_row: F) -> Result<usize>
where
    F: FnMut(&mut BufWriter<File>, &T) -> std::io::Result<()>,
{
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    for row in rows {
        write_row(&mut w, row).with_context(|| format!("write {}", path.display()))?;
    }
    w.flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(rows.len())
}

fn remove_export(path: &Path) -> Result<()> {
    std::fs::remove_file(path).with_context(|| format!("remove stale {}", path.display()))?;
    debug!("Removed stale export {}", path.display());
    Ok(())
}

/// Delete `valid_customers_<N>.txt` files in `dir` with N above `written`, left over from an
/// earlier, larger run.
fn remove_stale_valid(dir: &Path, written: usize) -> Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).with_context(|| format!("read {}", dir.display())),
    };
    for entry in entries {
        let entry = entry.with_context(|| format!("read {}", dir.display()))?;
        let name = entry.file_name();
        let stale = name
            .to_str()
            .and_then(ExportFiles::valid_index)
            .is_some_and(|n| n > written);
        if stale {
            remove_export(&entry.path())?;
        }
    }
    Ok(())
}

/// Split `valid` into batches of up to `batch_size` (order kept) and write each to
/// `valid_customers_<N>.txt` in `dir`, N 1-based. Empty input writes nothing. Valid files from
/// an earlier run beyond the last batch are removed. Returns written paths.
pub fn export_valid(dir: &Path, valid: &[ValidCustomer], batch_size: usize) -> Result<Vec<PathBuf>> {
    if batch_size == 0 {
        anyhow::bail!("export batch size must be at least 1");
    }
    let start = Instant::now();
    let mut paths = Vec::with_capacity(batch_count(valid.len(), batch_size));
    for (i, batch) in valid.chunks(batch_size).enumerate() {
        let path = dir.join(ExportFiles::valid(i + 1));
        let n = write_rows(&path, batch, |w, v| write_customer(w, &v.0))?;
        debug!("Wrote {} valid customers to {}", n, path.display());
        paths.push(path);
    }
    remove_stale_valid(dir, paths.len())?;
    info!(
        "Total valid customers exported time: {} ms",
        start.elapsed().as_millis()
    );
    Ok(paths)
}

/// Write all of `invalid` to `invalid_customers.txt` in `dir`, unbatched. Empty input writes
/// nothing and removes an invalid file left by an earlier run.
pub fn export_invalid(dir: &Path, invalid: &[InvalidCustomer]) -> Result<Option<PathBuf>> {
    let start = Instant::now();
    let path = dir.join(ExportFiles::INVALID);
    if invalid.is_empty() {
        if path.exists() {
            remove_export(&path)?;
        }
        return Ok(None);
    }
    let n = write_rows(&path, invalid, write_invalid)?;
    debug!("Wrote {} invalid customers to {}", n, path.display());
    info!(
        "Total invalid customers exported time: {} ms",
        start.elapsed().as_millis()
    );
    Ok(Some(path))
}
