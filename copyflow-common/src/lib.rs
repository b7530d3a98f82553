//! Shared types for the Copyflow content-production pipeline
//!
//! Holds the error taxonomy, configuration loading, and database
//! initialization/models used by the workflow engine.

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
