//! Catalog trait and error types
//!
//! The monitoring engine consumes the catalog through this trait; the
//! shipped implementation is SQLite, but anything that can answer
//! fingerprint lookups and accept inserts will do.

use crate::catalog::CatalogEntry;
use crate::paper::{Fingerprint, Paper};
use thiserror::Error;

/// Errors that can occur during catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid stored value: {0}")]
    InvalidValue(String),

    #[error("Paper not found: {0}")]
    NotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Outcome of an insert attempt
///
/// A uniqueness violation on the fingerprint column is reported as
/// `AlreadyPresent`, not as an error: concurrent writers and re-crawled
/// snapshots make it an expected condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Row was written; carries the new row id
    Inserted(i64),

    /// A row with the same fingerprint already exists
    AlreadyPresent,
}

/// Trait for catalog backend implementations
pub trait Catalog {
    /// Checks whether a paper with this fingerprint has been ingested
    fn exists(&self, fingerprint: &Fingerprint) -> CatalogResult<bool>;

    /// Inserts a paper, marking it unread and stamping first_seen_at
    fn insert(&mut self, paper: &Paper) -> CatalogResult<InsertOutcome>;

    /// Lists all catalog entries, newest publication date first
    fn list_all(&self) -> CatalogResult<Vec<CatalogEntry>>;

    /// Clears the is_new flag on one entry
    fn mark_read(&mut self, id: i64) -> CatalogResult<()>;

    /// Total number of ingested papers
    fn count_papers(&self) -> CatalogResult<u64>;

    /// Number of papers still flagged as new
    fn count_unread(&self) -> CatalogResult<u64>;
}
