//! Open the customer store database.

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use super::{SCHEMA, WAL_PRAGMAS};

/// Enable WAL and apply schema to an open connection (idempotent).
fn apply_wal_and_schema(conn: &Connection) -> Result<()> {
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .context("enable WAL")?;
    conn.execute_batch(WAL_PRAGMAS).context("set WAL pragmas")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(())
}

/// Open or create the store DB and ensure schema + WAL.
pub fn open_db(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("open database {}", path.display()))?;
    apply_wal_and_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory DB with the same schema (tests and dry runs; no WAL pragmas needed).
pub fn open_db_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory database")?;
    conn.execute_batch(SCHEMA).context("create schema")?;
    Ok(conn)
}

/// Row count of `table` (`valid_customers` or `invalid_customers`).
pub fn count_rows(conn: &Connection, table: &str) -> Result<usize> {
    let sql = match table {
        "valid_customers" => "SELECT COUNT(*) FROM valid_customers",
        "invalid_customers" => "SELECT COUNT(*) FROM invalid_customers",
        other => anyhow::bail!("unknown table: {other}"),
    };
    let n: i64 = conn
        .query_row(sql, [], |row| row.get(0))
        .with_context(|| format!("count {table}"))?;
    Ok(n.max(0) as usize)
}
