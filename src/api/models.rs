// API request/response models (DTOs)

use serde::{Deserialize, Serialize};

use crate::normalization::airdate::format_air_date;
use crate::query::filter::EpisodeFilter;
use crate::query::EpisodeHit;

/// Raw query-string parameters for GET /api/episodes; each list value is
/// comma-separated. Parsed into an `EpisodeFilter` by the handler.
#[derive(Debug, Deserialize)]
pub struct EpisodesParams {
    pub colors: Option<String>,
    pub features: Option<String>,
    pub month: Option<String>,
    #[serde(rename = "matchType")]
    pub match_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FiltersApplied {
    pub colors: Vec<String>,
    pub features: Vec<String>,
    pub months: Vec<i32>,
    pub match_type: String,
}

#[derive(Debug, Serialize)]
pub struct EpisodesResponse {
    pub filters_applied: FiltersApplied,
    pub total_matches: usize,
    pub episodes: Vec<EpisodeEntry>,
}

#[derive(Debug, Serialize)]
pub struct EpisodeEntry {
    pub episode: EpisodeInfo,
    pub painting: PaintingInfo,
}

#[derive(Debug, Serialize)]
pub struct EpisodeInfo {
    pub season: i32,
    pub number: i32,
    /// Formatted broadcast date, null while unknown.
    pub air_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaintingInfo {
    pub id: i64,
    pub title: String,
    pub colors: Vec<String>,
    pub features: Vec<String>,
}

/// Generic error body; never carries internal detail.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

impl EpisodesResponse {
    pub fn new(filter: &EpisodeFilter, hits: Vec<EpisodeHit>) -> Self {
        let episodes: Vec<EpisodeEntry> = hits.into_iter().map(EpisodeEntry::from).collect();
        Self {
            filters_applied: FiltersApplied {
                colors: filter.colors.clone(),
                features: filter.features.clone(),
                months: filter.months.clone(),
                match_type: filter.match_mode.as_str().to_string(),
            },
            total_matches: episodes.len(),
            episodes,
        }
    }
}

impl From<EpisodeHit> for EpisodeEntry {
    fn from(hit: EpisodeHit) -> Self {
        Self {
            episode: EpisodeInfo {
                season: hit.season,
                number: hit.episode_number,
                air_date: format_air_date(hit.air_date),
            },
            painting: PaintingInfo {
                id: hit.painting_id,
                title: hit.title,
                colors: hit.colors,
                features: hit.features,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::filter::MatchMode;

    fn hit() -> EpisodeHit {
        EpisodeHit {
            painting_id: 17,
            title: "A Walk in the Woods".into(),
            season: 1,
            episode_number: 1,
            air_date: 411_091_200,
            colors: vec!["Black".into(), "White".into()],
            features: vec!["trees".into()],
        }
    }

    #[test]
    fn response_envelope_shape() {
        let filter = EpisodeFilter {
            colors: vec!["Black".into()],
            features: vec![],
            months: vec![1],
            match_mode: MatchMode::Any,
        };
        let body =
            serde_json::to_value(EpisodesResponse::new(&filter, vec![hit()])).unwrap();

        assert_eq!(body["filters_applied"]["match_type"], "any");
        assert_eq!(body["filters_applied"]["months"][0], 1);
        assert_eq!(body["total_matches"], 1);
        assert_eq!(body["episodes"][0]["episode"]["season"], 1);
        assert_eq!(
            body["episodes"][0]["episode"]["air_date"],
            "January 11, 1983"
        );
        assert_eq!(body["episodes"][0]["painting"]["id"], 17);
        assert_eq!(body["episodes"][0]["painting"]["colors"][1], "White");
    }

    #[test]
    fn unknown_air_date_serializes_as_null() {
        let mut h = hit();
        h.air_date = 0;
        let entry = serde_json::to_value(EpisodeEntry::from(h)).unwrap();
        assert!(entry["episode"]["air_date"].is_null());
    }
}
