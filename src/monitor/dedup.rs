//! Deduplication of extracted records against the catalog
//!
//! The batch is treated as one logical check: duplicates within the batch
//! keep their first occurrence, and anything the catalog already knows is
//! dropped. Nothing here writes; persistence stays in the scheduler's
//! post-processing step so a partial failure cannot lose earlier inserts.

use crate::catalog::CatalogResult;
use crate::paper::{Fingerprint, Paper};
use std::collections::HashSet;

/// Filters a candidate batch down to records not yet ingested
///
/// `already_ingested` answers "does this fingerprint exist" against the
/// catalog. The output preserves input order and contains each fingerprint
/// at most once.
pub fn filter_new<F>(candidates: Vec<Paper>, mut already_ingested: F) -> CatalogResult<Vec<Paper>>
where
    F: FnMut(&Fingerprint) -> CatalogResult<bool>,
{
    let mut seen: HashSet<Fingerprint> = HashSet::new();
    let mut fresh = Vec::new();

    for paper in candidates {
        let fingerprint = paper.fingerprint();

        // Extractor artifact: same entry appearing twice in one snapshot
        if !seen.insert(fingerprint.clone()) {
            tracing::debug!("Duplicate fingerprint within batch: {}", paper.title);
            continue;
        }

        if already_ingested(&fingerprint)? {
            continue;
        }

        fresh.push(paper);
    }

    Ok(fresh)
}
