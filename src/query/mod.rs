//! Read path: stateless episode lookup over the ingested tables.

pub mod builder;
pub mod filter;

use anyhow::Result;
use sqlx::{PgPool, Row};

use filter::EpisodeFilter;

/// One matched (painting, episode) pair, arrays already deduplicated and
/// null-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeHit {
    pub painting_id: i64,
    pub title: String,
    pub season: i32,
    pub episode_number: i32,
    /// Epoch seconds; 0 when the air date is not yet known.
    pub air_date: i64,
    pub colors: Vec<String>,
    pub features: Vec<String>,
}

pub async fn fetch_episodes(pool: &PgPool, filter: &EpisodeFilter) -> Result<Vec<EpisodeHit>> {
    let mut qb = builder::build_episode_query(filter);
    let rows = qb.build().persistent(false).fetch_all(pool).await?;

    rows.into_iter()
        .map(|row| {
            Ok(EpisodeHit {
                painting_id: row.try_get("painting_id")?,
                title: row.try_get("title")?,
                season: row.try_get("season")?,
                episode_number: row.try_get("episode_number")?,
                air_date: row.try_get("air_date")?,
                colors: dense(row.try_get("colors")?),
                features: dense(row.try_get("features")?),
            })
        })
        .collect()
}

/// The LEFT JOINs leave a lone NULL inside the aggregate when a painting has
/// no colors or features; drop those.
fn dense(values: Vec<Option<String>>) -> Vec<String> {
    values.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_drops_left_join_nulls() {
        assert_eq!(
            dense(vec![None, Some("Black".into()), Some("White".into())]),
            vec!["Black".to_string(), "White".to_string()]
        );
        assert!(dense(vec![None]).is_empty());
    }
}
