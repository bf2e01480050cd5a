pub mod air_dates;
pub mod features;
pub mod paintings;
pub mod records;

/// Per-file totals reported once the file's transaction commits.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestSummary {
    pub rows_seen: usize,
    pub rows_processed: usize,
    pub rows_skipped: usize,
    pub warnings: usize,
}
