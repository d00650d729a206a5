//! Database schema definitions
//!
//! This module contains the SQL schema for the paper catalog.

/// SQL schema for the catalog database
///
/// The UNIQUE constraint on fingerprint is the durable half of the
/// deduplication invariant; the in-memory pre-check in the engine only
/// avoids unnecessary write attempts.
pub const SCHEMA_SQL: &str = r#"
-- Ingested papers
CREATE TABLE IF NOT EXISTS papers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    fingerprint TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    authors TEXT NOT NULL,
    issue TEXT NOT NULL,
    pages TEXT NOT NULL,
    publication_date TEXT NOT NULL,
    keywords TEXT NOT NULL,
    abstract TEXT,
    source_url TEXT,
    first_seen_at TEXT NOT NULL,
    is_new INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_papers_publication_date ON papers(publication_date);
CREATE INDEX IF NOT EXISTS idx_papers_is_new ON papers(is_new);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
