//! Paper records and their derived identity
//!
//! The source index assigns no canonical IDs, so identity is a content
//! fingerprint over the normalized (title, authors, issue) tuple. Two
//! records with the same fingerprint are the same logical paper no matter
//! how their abstract or keywords differ between snapshots.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

/// A paper extracted from the publication index page
#[derive(Debug, Clone, PartialEq)]
pub struct Paper {
    /// Full title as it appears on the index
    pub title: String,

    /// Authors in listing order
    pub authors: Vec<String>,

    /// Issue label, e.g. "2024年第2期"
    pub issue: String,

    /// Page range label, e.g. "1-8"
    pub pages: String,

    /// Publication date; entries without one carry the crawl date
    pub publication_date: NaiveDate,

    /// Keywords, empty when the index does not list any
    pub keywords: Vec<String>,

    /// Abstract text, when the index exposes one
    pub abstract_text: Option<String>,

    /// Absolute URL of the article page, when linked
    pub source_url: Option<String>,
}

impl Paper {
    /// Derives the deduplication fingerprint for this paper
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(&self.title, &self.authors, &self.issue)
    }
}

/// Derived identity of a paper, used as the catalog uniqueness key
///
/// Hex-encoded SHA-256 over the normalized identity tuple. Stored verbatim
/// in the catalog's fingerprint column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes a fingerprint from the identity fields
    ///
    /// Fields are normalized (whitespace collapsed, trimmed, lowercased)
    /// and fed to the digest separated by a 0x1F byte so that field
    /// boundaries stay unambiguous. Author order is significant.
    pub fn derive(title: &str, authors: &[String], issue: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalize_field(title).as_bytes());
        for author in authors {
            hasher.update([0x1f]);
            hasher.update(normalize_field(author).as_bytes());
        }
        hasher.update([0x1f]);
        hasher.update(normalize_field(issue).as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Wraps a fingerprint read back from the catalog
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalizes one identity field: collapse runs of whitespace to a single
/// space, trim, and lowercase.
fn normalize_field(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
