//! Paintings + episodes + colors ingestor.
//!
//! One transaction covers the whole file: a parse failure skips its row and
//! the run continues, but any database error rolls everything back.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::error::IngestError;
use crate::ingest::records::PaintingRecord;
use crate::ingest::IngestSummary;
use crate::normalization::cell::{clean_string_array, normalize_hex};
use crate::store::{reconcile, Db};

/// Cleans the row's two array cells and applies within-run dedup, where the
/// first well-formed occurrence of a title wins. The title is claimed only
/// after both cells parse, so a malformed row does not suppress a later
/// valid row for the same painting.
fn screen_row(
    record: &PaintingRecord,
    line: usize,
    processed: &mut HashSet<String>,
    summary: &mut IngestSummary,
) -> Option<(Vec<String>, Vec<String>)> {
    if processed.contains(&record.painting_title) {
        debug!(line, title = %record.painting_title, "duplicate title within run; skipping");
        summary.rows_skipped += 1;
        return None;
    }

    let colors = match clean_string_array(&record.colors) {
        Ok(v) => v,
        Err(e) => {
            warn!(line, title = %record.painting_title, error = %e, "bad colors cell; skipping row");
            summary.rows_skipped += 1;
            summary.warnings += 1;
            return None;
        }
    };
    let hexes = match clean_string_array(&record.color_hex) {
        Ok(v) => v,
        Err(e) => {
            warn!(line, title = %record.painting_title, error = %e, "bad color_hex cell; skipping row");
            summary.rows_skipped += 1;
            summary.warnings += 1;
            return None;
        }
    };

    processed.insert(record.painting_title.clone());
    Some((colors, hexes))
}

pub async fn run(db: &Db, path: &Path) -> Result<IngestSummary> {
    let mut rdr =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let mut summary = IngestSummary::default();
    // Within-run dedup state. Scoped to this call; discarded when the run
    // ends.
    let mut processed: HashSet<String> = HashSet::new();

    let mut tx = db.pool.begin().await?;

    for (idx, result) in rdr.deserialize::<PaintingRecord>().enumerate() {
        let line = idx + 2; // 1-based, after the header row
        summary.rows_seen += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(line, error = %e, "row failed shape check; skipping");
                summary.rows_skipped += 1;
                summary.warnings += 1;
                continue;
            }
        };

        let Some((colors, hexes)) = screen_row(&record, line, &mut processed, &mut summary)
        else {
            continue;
        };

        let painting_id =
            reconcile::find_or_create_painting(&mut tx, &record.painting_title, &record.img_src)
                .await?;
        reconcile::find_or_create_episode(
            &mut tx,
            painting_id,
            record.season,
            record.episode,
            record.youtube_url(),
        )
        .await?;

        // Mismatched lists skip color insertion only; painting/episode stand.
        if colors.len() != hexes.len() {
            let mismatch = IngestError::ShapeMismatch {
                colors: colors.len(),
                hexes: hexes.len(),
            };
            warn!(
                line,
                title = %record.painting_title,
                error = %mismatch,
                "mismatched color/hex lists; skipping colors for this row"
            );
            summary.warnings += 1;
            summary.rows_processed += 1;
            continue;
        }

        for (color, hex) in colors.iter().zip(&hexes) {
            let hex = normalize_hex(hex);
            reconcile::find_or_create_color(&mut tx, painting_id, color, &hex).await?;
        }
        summary.rows_processed += 1;
    }

    tx.commit().await?;
    info!(
        rows_seen = summary.rows_seen,
        rows_processed = summary.rows_processed,
        rows_skipped = summary.rows_skipped,
        warnings = summary.warnings,
        "paintings ingestion committed"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, colors: &str, hexes: &str) -> PaintingRecord {
        PaintingRecord {
            painting_title: title.to_string(),
            img_src: "https://img/1.png".to_string(),
            colors: colors.to_string(),
            color_hex: hexes.to_string(),
            season: 1,
            episode: 1,
            youtube_src: None,
        }
    }

    #[test]
    fn malformed_first_occurrence_does_not_claim_the_title() {
        let mut processed = HashSet::new();
        let mut summary = IngestSummary::default();

        let bad = record("Winter Sun", "not an array", "['000000']");
        assert!(screen_row(&bad, 2, &mut processed, &mut summary).is_none());
        assert!(!processed.contains("Winter Sun"));

        // A later well-formed row for the same title still lands.
        let good = record("Winter Sun", "['Black']", "['000000']");
        let screened = screen_row(&good, 3, &mut processed, &mut summary);
        assert_eq!(
            screened,
            Some((vec!["Black".to_string()], vec!["000000".to_string()]))
        );
    }

    #[test]
    fn duplicate_of_processed_title_is_skipped() {
        let mut processed = HashSet::new();
        let mut summary = IngestSummary::default();

        let row = record("Mountain Lake", "['Black']", "['000000']");
        assert!(screen_row(&row, 2, &mut processed, &mut summary).is_some());
        assert!(screen_row(&row, 3, &mut processed, &mut summary).is_none());
        assert_eq!(summary.rows_skipped, 1);
        assert_eq!(summary.warnings, 0);
    }

    #[test]
    fn bad_cells_count_as_skips_with_warnings() {
        let mut processed = HashSet::new();
        let mut summary = IngestSummary::default();

        let bad_colors = record("A", "nope", "['000000']");
        let bad_hexes = record("B", "['Black']", "nope");
        assert!(screen_row(&bad_colors, 2, &mut processed, &mut summary).is_none());
        assert!(screen_row(&bad_hexes, 3, &mut processed, &mut summary).is_none());
        assert_eq!(summary.rows_skipped, 2);
        assert_eq!(summary.warnings, 2);
        assert!(processed.is_empty());
    }
}
