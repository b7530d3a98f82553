//! Database access shared across the engine

pub mod init;
pub mod models;

pub use init::init_database;
