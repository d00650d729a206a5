//! SQLite catalog implementation
//!
//! This module provides a SQLite-based implementation of the Catalog trait.

use crate::catalog::schema::initialize_schema;
use crate::catalog::traits::{Catalog, CatalogError, CatalogResult, InsertOutcome};
use crate::catalog::CatalogEntry;
use crate::paper::{Fingerprint, Paper};
use crate::PaperwatchError;
use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

/// SQLite catalog backend
pub struct SqliteCatalog {
    conn: Connection,
}

impl SqliteCatalog {
    /// Opens or creates a catalog database at the given path
    pub fn new(path: &Path) -> Result<Self, PaperwatchError> {
        let conn = Connection::open(path).map_err(CatalogError::from)?;

        // Configure SQLite for concurrent reader friendliness
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )
        .map_err(CatalogError::from)?;

        initialize_schema(&conn).map_err(CatalogError::from)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory catalog (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, PaperwatchError> {
        let conn = Connection::open_in_memory().map_err(CatalogError::from)?;
        initialize_schema(&conn).map_err(CatalogError::from)?;
        Ok(Self { conn })
    }

    fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, RawPaperRow)> {
        Ok((
            row.get(0)?,
            RawPaperRow {
                title: row.get(1)?,
                authors: row.get(2)?,
                issue: row.get(3)?,
                pages: row.get(4)?,
                publication_date: row.get(5)?,
                keywords: row.get(6)?,
                abstract_text: row.get(7)?,
                source_url: row.get(8)?,
                first_seen_at: row.get(9)?,
                is_new: row.get(10)?,
            },
        ))
    }
}

/// Column values as stored, before JSON/date decoding
struct RawPaperRow {
    title: String,
    authors: String,
    issue: String,
    pages: String,
    publication_date: String,
    keywords: String,
    abstract_text: Option<String>,
    source_url: Option<String>,
    first_seen_at: String,
    is_new: bool,
}

impl RawPaperRow {
    fn decode(self, id: i64) -> CatalogResult<CatalogEntry> {
        let authors: Vec<String> = serde_json::from_str(&self.authors)?;
        let keywords: Vec<String> = serde_json::from_str(&self.keywords)?;
        let publication_date = NaiveDate::parse_from_str(&self.publication_date, "%Y-%m-%d")
            .map_err(|e| {
                CatalogError::InvalidValue(format!(
                    "publication_date '{}': {}",
                    self.publication_date, e
                ))
            })?;

        Ok(CatalogEntry {
            id,
            paper: Paper {
                title: self.title,
                authors,
                issue: self.issue,
                pages: self.pages,
                publication_date,
                keywords,
                abstract_text: self.abstract_text,
                source_url: self.source_url,
            },
            first_seen_at: self.first_seen_at,
            is_new: self.is_new,
        })
    }
}

/// Returns true when the error is a UNIQUE constraint violation
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

impl Catalog for SqliteCatalog {
    fn exists(&self, fingerprint: &Fingerprint) -> CatalogResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM papers WHERE fingerprint = ?1",
                params![fingerprint.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        Ok(found.is_some())
    }

    fn insert(&mut self, paper: &Paper) -> CatalogResult<InsertOutcome> {
        let fingerprint = paper.fingerprint();
        let authors = serde_json::to_string(&paper.authors)?;
        let keywords = serde_json::to_string(&paper.keywords)?;
        let publication_date = paper.publication_date.format("%Y-%m-%d").to_string();
        let now = Utc::now().to_rfc3339();

        let result = self.conn.execute(
            "INSERT INTO papers (fingerprint, title, authors, issue, pages,
             publication_date, keywords, abstract, source_url, first_seen_at, is_new)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1)",
            params![
                fingerprint.as_str(),
                paper.title,
                authors,
                paper.issue,
                paper.pages,
                publication_date,
                keywords,
                paper.abstract_text,
                paper.source_url,
                now
            ],
        );

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted(self.conn.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Ok(InsertOutcome::AlreadyPresent),
            Err(e) => Err(e.into()),
        }
    }

    fn list_all(&self) -> CatalogResult<Vec<CatalogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, authors, issue, pages, publication_date, keywords,
             abstract, source_url, first_seen_at, is_new
             FROM papers ORDER BY publication_date DESC, id DESC",
        )?;

        let rows = stmt.query_map([], Self::row_to_entry)?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, raw) = row?;
            entries.push(raw.decode(id)?);
        }

        Ok(entries)
    }

    fn mark_read(&mut self, id: i64) -> CatalogResult<()> {
        let changed = self
            .conn
            .execute("UPDATE papers SET is_new = 0 WHERE id = ?1", params![id])?;

        if changed == 0 {
            return Err(CatalogError::NotFound(id));
        }

        Ok(())
    }

    fn count_papers(&self) -> CatalogResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM papers", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_unread(&self) -> CatalogResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM papers WHERE is_new = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
