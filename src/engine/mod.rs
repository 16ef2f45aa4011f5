//! Engine module: record-level operations, persistence, export, and the CLI surface

pub mod arg_parser;
pub mod chunk;
pub mod db_ops;
pub mod export;
pub mod handlers;
pub mod parser;
pub mod progress;
pub mod validator;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use chunk::process_chunk;
pub use db_ops::{
    CustomerStore, SqliteStore, count_rows, open_db, open_db_in_memory, save_invalid, save_valid,
};
pub use export::{batch_count, export_invalid, export_valid};
pub use handlers::{handle_run, setup_opts};
pub use parser::{ParsedLine, parse_line};
pub use validator::{classify, is_valid_customer, is_valid_email, is_valid_phone};
