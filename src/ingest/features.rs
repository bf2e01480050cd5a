//! Subject-matter feature ingestor.
//!
//! The file's header row is `EPISODE,TITLE,<one uppercase-underscored column
//! per feature>`. Feature names are reconciled up front and their ids cached
//! for the run; each data row then upserts one boolean per feature for the
//! named painting, with compare-then-write skipping unchanged values.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use tracing::{debug, info, warn};

use crate::ingest::IngestSummary;
use crate::normalization::feature::{clean_feature_name, clean_painting_title};
use crate::store::{reconcile, Db};

/// Leading non-feature columns (episode code, title).
const FEATURE_COLUMNS_START: usize = 2;

/// Pairs each cleaned feature name with the column index it was read from.
/// Resolving values by the header's own position keeps padded or oddly-cased
/// headers pointing at the right cells.
fn feature_columns(headers: &StringRecord) -> Vec<(String, usize)> {
    headers
        .iter()
        .enumerate()
        .skip(FEATURE_COLUMNS_START)
        .map(|(i, h)| (clean_feature_name(h), i))
        .collect()
}

pub async fn run(db: &Db, path: &Path) -> Result<IngestSummary> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr.headers()?.clone();

    let title_idx = headers
        .iter()
        .position(|h| h == "TITLE")
        .ok_or_else(|| anyhow!("feature file {} has no TITLE column", path.display()))?;
    let columns = feature_columns(&headers);

    let mut summary = IngestSummary::default();
    let mut tx = db.pool.begin().await?;

    // Features are global; reconcile the catalog once and cache ids.
    let mut feature_ids: HashMap<String, i64> = HashMap::new();
    for (name, _) in &columns {
        let id = reconcile::find_or_create_feature(&mut tx, name).await?;
        feature_ids.insert(name.clone(), id);
    }
    info!(features = feature_ids.len(), "feature catalog reconciled");

    let mut processed: HashSet<String> = HashSet::new();

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        summary.rows_seen += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "unreadable row; skipping");
                summary.rows_skipped += 1;
                summary.warnings += 1;
                continue;
            }
        };

        let title = clean_painting_title(record.get(title_idx).unwrap_or(""));
        if title.is_empty() {
            warn!(line, "row has no painting title; skipping");
            summary.rows_skipped += 1;
            summary.warnings += 1;
            continue;
        }
        if processed.contains(&title) {
            debug!(line, %title, "duplicate title within run; skipping");
            summary.rows_skipped += 1;
            continue;
        }

        let Some(painting_id) = reconcile::find_painting_by_title_ci(&mut tx, &title).await? else {
            warn!(line, %title, "no painting found for feature row");
            summary.rows_skipped += 1;
            summary.warnings += 1;
            continue;
        };
        processed.insert(title.clone());

        for (name, col) in &columns {
            let value = record.get(*col).map(|cell| cell == "1").unwrap_or(false);
            reconcile::upsert_painting_feature(&mut tx, painting_id, feature_ids[name], value)
                .await?;
        }
        summary.rows_processed += 1;
    }

    tx.commit().await?;
    info!(
        rows_seen = summary.rows_seen,
        rows_processed = summary.rows_processed,
        rows_skipped = summary.rows_skipped,
        warnings = summary.warnings,
        "feature ingestion committed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_feature_headers_to_their_own_columns() {
        let headers = StringRecord::from(vec!["EPISODE", "TITLE", "SNOWY_MOUNTAIN", "CABIN"]);
        let columns = feature_columns(&headers);
        assert_eq!(
            columns,
            vec![
                ("snowy mountain".to_string(), 2),
                ("cabin".to_string(), 3),
            ]
        );
    }

    #[test]
    fn padded_headers_keep_their_column_index() {
        // Cleaning trims the name; the index must still point at the cell
        // under the original (padded) header.
        let headers = StringRecord::from(vec!["EPISODE", "TITLE", " STEVE_ROSS ", "CABIN"]);
        let columns = feature_columns(&headers);
        assert_eq!(columns[0], ("steve ross".to_string(), 2));

        let row = StringRecord::from(vec!["S01E01", "\"A Walk in the Woods\"", "1", "0"]);
        let (_, col) = &columns[0];
        assert_eq!(row.get(*col), Some("1"));
    }
}
