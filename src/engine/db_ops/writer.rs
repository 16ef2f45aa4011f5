//! Bulk writer: save a whole partition in one transaction, then checkpoint the WAL.

use anyhow::{Context, Result};
use log::debug;
use rusqlite::{Connection, Statement};
use std::path::Path;

use crate::utils::config::DB_INSERT_BATCH_SIZE;
use crate::{Customer, InvalidCustomer, ValidCustomer};

use super::{INSERT_INVALID_SQL, INSERT_VALID_SQL};

/// Durable sink for the two partitions. Called once per partition per run, after the join barrier.
pub trait CustomerStore {
    fn save_valid(&mut self, valid: &[ValidCustomer]) -> Result<usize>;
    fn save_invalid(&mut self, invalid: &[InvalidCustomer]) -> Result<usize>;
}

/// [`CustomerStore`] backed by a SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: super::open_db(path)?,
        })
    }

    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: super::open_db_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl CustomerStore for SqliteStore {
    fn save_valid(&mut self, valid: &[ValidCustomer]) -> Result<usize> {
        save_valid(&mut self.conn, valid)
    }

    fn save_invalid(&mut self, invalid: &[InvalidCustomer]) -> Result<usize> {
        save_invalid(&mut self.conn, invalid)
    }
}

/// Execute one insert for the 8 customer columns plus any trailing extra (the invalid reason).
fn execute_insert(stmt: &mut Statement<'_>, c: &Customer, reason: Option<&str>) -> Result<()> {
    let base = (
        c.first_name.as_str(),
        c.last_name.as_str(),
        c.city.as_str(),
        c.state.as_str(),
        c.zip_code.as_str(),
        c.phone.as_str(),
        c.email.as_str(),
        c.ip_address.as_deref(),
    );
    let inserted = match reason {
        None => stmt.execute(base),
        Some(r) => stmt.execute((
            base.0, base.1, base.2, base.3, base.4, base.5, base.6, base.7, r,
        )),
    };
    inserted.context("insert customer")?;
    Ok(())
}

/// Insert every row in one transaction, logging progress per DB_INSERT_BATCH_SIZE rows, then
/// checkpoint (TRUNCATE) so the data is flushed to the main DB file.
fn save_all_and_flush<T>(
    conn: &mut Connection,
    sql: &str,
    rows: &[T],
    row: impl Fn(&T) -> (&Customer, Option<&str>),
) -> Result<usize> {
    let tx = conn.transaction().context("begin transaction")?;
    let mut stmt = tx.prepare(sql).context("prepare insert")?;
    let mut written = 0_usize;
    for batch in rows.chunks(DB_INSERT_BATCH_SIZE) {
        for r in batch {
            let (customer, reason) = row(r);
            execute_insert(&mut stmt, customer, reason)?;
        }
        written += batch.len();
        debug!("inserted {}/{} rows", written, rows.len());
    }
    drop(stmt);
    tx.commit().context("commit transaction")?;

    conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))
        .context("WAL checkpoint")?;
    Ok(written)
}

/// Save and flush the valid partition. Returns rows written.
pub fn save_valid(conn: &mut Connection, valid: &[ValidCustomer]) -> Result<usize> {
    save_all_and_flush(conn, INSERT_VALID_SQL, valid, |v| (&v.0, None))
        .context("save valid customers")
}

/// Save and flush the invalid partition (with reason). Returns rows written.
pub fn save_invalid(conn: &mut Connection, invalid: &[InvalidCustomer]) -> Result<usize> {
    save_all_and_flush(conn, INSERT_INVALID_SQL, invalid, |c| {
        (&c.customer, Some(c.reason.as_str()))
    })
    .context("save invalid customers")
}
