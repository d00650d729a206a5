//! Catalog module: durable record of previously ingested papers
//!
//! The engine consults the catalog to decide which extracted records are
//! new, and writes the delta one record at a time. A UI reading the same
//! database concurrently is expected; WAL mode keeps readers unblocked.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteCatalog;
pub use traits::{Catalog, CatalogError, CatalogResult, InsertOutcome};

use crate::paper::Paper;
use crate::PaperwatchError;
use std::path::Path;

/// A persisted paper plus catalog bookkeeping
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub id: i64,
    pub paper: Paper,

    /// RFC 3339 timestamp of the cycle that first ingested this paper
    pub first_seen_at: String,

    /// Set on insert; the owning application clears it independently
    pub is_new: bool,
}

/// Opens or creates a catalog database at the given path
pub fn open_catalog(path: &Path) -> Result<SqliteCatalog, PaperwatchError> {
    SqliteCatalog::new(path)
}
