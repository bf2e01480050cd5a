//! Typed filter parameters for the episode query, parsed from the raw
//! comma-separated query-string values.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Every non-empty filter must hold (conjunction). Default.
    #[default]
    All,
    /// At least one non-empty filter must hold (disjunction).
    Any,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::All => "all",
            MatchMode::Any => "any",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid month value {0:?}; expected integers 1-12")]
    InvalidMonth(String),
    #[error("invalid matchType {0:?}; expected \"all\" or \"any\"")]
    InvalidMatchMode(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeFilter {
    pub colors: Vec<String>,
    pub features: Vec<String>,
    pub months: Vec<i32>,
    pub match_mode: MatchMode,
}

impl EpisodeFilter {
    /// Build from raw query-string values. Absent or blank lists are empty
    /// (and later contribute no predicate); bad months and unknown match
    /// modes are rejected so the handler can answer 400.
    pub fn from_raw(
        colors: Option<&str>,
        features: Option<&str>,
        month: Option<&str>,
        match_type: Option<&str>,
    ) -> Result<Self, FilterError> {
        let colors = split_list(colors);
        let features = split_list(features);

        let mut months = Vec::new();
        for raw in split_list(month) {
            let m: i32 = raw
                .parse()
                .map_err(|_| FilterError::InvalidMonth(raw.clone()))?;
            if !(1..=12).contains(&m) {
                return Err(FilterError::InvalidMonth(raw));
            }
            months.push(m);
        }

        let match_mode = match match_type.map(str::trim) {
            None | Some("") => MatchMode::All,
            Some("all") => MatchMode::All,
            Some("any") => MatchMode::Any,
            Some(other) => return Err(FilterError::InvalidMatchMode(other.to_string())),
        };

        Ok(Self {
            colors,
            features,
            months,
            match_mode,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty() && self.features.is_empty() && self.months.is_empty()
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_trims_lists() {
        let f = EpisodeFilter::from_raw(
            Some("Black, White ,"),
            Some("cabin"),
            Some("1, 12"),
            None,
        )
        .unwrap();
        assert_eq!(f.colors, vec!["Black", "White"]);
        assert_eq!(f.features, vec!["cabin"]);
        assert_eq!(f.months, vec![1, 12]);
        assert_eq!(f.match_mode, MatchMode::All);
    }

    #[test]
    fn absent_params_mean_empty_filter() {
        let f = EpisodeFilter::from_raw(None, None, None, None).unwrap();
        assert!(f.is_empty());
        assert_eq!(f.match_mode, MatchMode::All);
    }

    #[test]
    fn match_mode_parses_and_validates() {
        assert_eq!(
            EpisodeFilter::from_raw(None, None, None, Some("any"))
                .unwrap()
                .match_mode,
            MatchMode::Any
        );
        assert_eq!(
            EpisodeFilter::from_raw(None, None, None, Some("all"))
                .unwrap()
                .match_mode,
            MatchMode::All
        );
        assert_eq!(
            EpisodeFilter::from_raw(None, None, None, Some("both")),
            Err(FilterError::InvalidMatchMode("both".into()))
        );
    }

    #[test]
    fn months_must_be_integers_in_range() {
        assert_eq!(
            EpisodeFilter::from_raw(None, None, Some("jan"), None),
            Err(FilterError::InvalidMonth("jan".into()))
        );
        assert_eq!(
            EpisodeFilter::from_raw(None, None, Some("13"), None),
            Err(FilterError::InvalidMonth("13".into()))
        );
        assert_eq!(
            EpisodeFilter::from_raw(None, None, Some("0"), None),
            Err(FilterError::InvalidMonth("0".into()))
        );
    }
}
