//! Database operations: schema, open, and bulk "save all and flush" of both partitions.

mod connection;
mod writer;

pub use connection::{count_rows, open_db, open_db_in_memory};
pub use writer::{CustomerStore, SqliteStore, save_invalid, save_valid};

/// WAL tuning pragmas (synchronous, autocheckpoint, size limit). Use after PRAGMA journal_mode = WAL.
pub(crate) const WAL_PRAGMAS: &str = r#"
        PRAGMA synchronous = NORMAL;
        PRAGMA wal_autocheckpoint = 10000;
        PRAGMA journal_size_limit = 67108864;
        "#;

/// Insert statement for the valid partition.
pub(crate) const INSERT_VALID_SQL: &str = "INSERT INTO valid_customers \
     (first_name, last_name, city, state, zip_code, phone, email, ip_address) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Insert statement for the invalid partition (adds the reason column).
pub(crate) const INSERT_INVALID_SQL: &str = "INSERT INTO invalid_customers \
     (first_name, last_name, city, state, zip_code, phone, email, ip_address, reason) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

/// Schema for both partitions. Rows are appended per run.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS valid_customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    zip_code TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT NOT NULL,
    ip_address TEXT
);

CREATE TABLE IF NOT EXISTS invalid_customers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    zip_code TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT NOT NULL,
    ip_address TEXT,
    reason TEXT NOT NULL
);
"#;
