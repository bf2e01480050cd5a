//! Air-date ingestor over the free-text episode listing.
//!
//! Not CSV-structured: each line carries a quoted episode title and a
//! parenthesized broadcast date. Updates are compare-then-write so an
//! idempotent re-run issues no UPDATEs at all.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::ingest::IngestSummary;
use crate::normalization::airdate::{extract_title, parse_air_date};
use crate::store::reconcile::{self, AirDateOutcome};
use crate::store::Db;

pub async fn run(db: &Db, path: &Path) -> Result<IngestSummary> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut summary = IngestSummary::default();
    let mut processed: HashSet<String> = HashSet::new();

    let mut tx = db.pool.begin().await?;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        summary.rows_seen += 1;

        let Some(title) = extract_title(&line) else {
            warn!(line_no, "no quoted title in line; skipping");
            summary.rows_skipped += 1;
            summary.warnings += 1;
            continue;
        };
        let Some(date) = parse_air_date(&line) else {
            warn!(line_no, %title, "unparseable air date; skipping line");
            summary.rows_skipped += 1;
            summary.warnings += 1;
            continue;
        };

        if processed.contains(&title) {
            debug!(line_no, %title, "duplicate title within run; skipping");
            summary.rows_skipped += 1;
            continue;
        }

        let epoch = match date.epoch_seconds() {
            Ok(e) => e,
            Err(e) => {
                warn!(line_no, %title, error = %e, "invalid broadcast date; skipping line");
                summary.rows_skipped += 1;
                summary.warnings += 1;
                continue;
            }
        };
        // Claim the title only once the line is fully parsed, so a bad line
        // does not shadow a later valid one for the same episode.
        processed.insert(title.clone());

        match reconcile::set_air_date(&mut tx, &title, epoch).await? {
            AirDateOutcome::Unchanged => {
                debug!(%title, epoch, "air date already current");
            }
            AirDateOutcome::Updated { previous } => {
                info!(%title, previous, epoch, "air date updated");
            }
            AirDateOutcome::PaintingNotFound => {
                warn!(%title, "no painting with this title");
                summary.warnings += 1;
            }
            AirDateOutcome::EpisodeNotFound => {
                warn!(%title, "painting has no episode row");
                summary.warnings += 1;
            }
        }
        summary.rows_processed += 1;
    }

    tx.commit().await?;
    info!(
        rows_seen = summary.rows_seen,
        rows_processed = summary.rows_processed,
        rows_skipped = summary.rows_skipped,
        warnings = summary.warnings,
        unique_titles = processed.len(),
        "air-date ingestion committed"
    );
    Ok(summary)
}
