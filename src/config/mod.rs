//! Configuration management.

/// Catalog ingestion from a TOML seed file
pub mod catalog;
/// Database connection and table creation
pub mod database;
