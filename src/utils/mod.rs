pub mod config;
pub mod custsift_toml;
pub mod env;
pub mod logger;

pub use config::*;
pub use env::db_path_from_env;
pub use logger::{Colors, setup_logging};
