use thiserror::Error;

/// Recoverable per-row ingestion failures. These are logged and the row (or
/// the offending field) is skipped; the run continues. Anything else is a
/// transaction-level failure that propagates as `anyhow::Error` and rolls the
/// whole file back.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed CSV cell, unparseable date, or missing quoted title.
    #[error("malformed input: {0}")]
    Parse(String),
    /// Color and hex lists for a row disagree in length; that row's colors
    /// are skipped but the painting/episode still land.
    #[error("{colors} colors vs {hexes} hex codes")]
    ShapeMismatch { colors: usize, hexes: usize },
}
