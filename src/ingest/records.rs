//! Typed rows for the fixed-shape CSV inputs. Shape is validated at this
//! boundary: a row that fails to deserialize is a parse failure for that row
//! only, logged and skipped by the driver.

use serde::Deserialize;

/// One row of the paintings/episodes/colors file. Column names are an
/// integration contract with the upstream dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct PaintingRecord {
    pub painting_title: String,
    pub img_src: String,
    /// Pseudo-JSON array cell, e.g. `['Alizarin Crimson', 'Titanium White']`.
    pub colors: String,
    /// Pseudo-JSON array cell, parallel to `colors`.
    pub color_hex: String,
    pub season: i32,
    pub episode: i32,
    #[serde(default)]
    pub youtube_src: Option<String>,
}

impl PaintingRecord {
    /// Empty-string URLs collapse to NULL in the store.
    pub fn youtube_url(&self) -> Option<&str> {
        self.youtube_src
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "painting_title,img_src,colors,color_hex,season,episode,youtube_src";

    fn parse(rows: &str) -> Vec<csv::Result<PaintingRecord>> {
        csv::Reader::from_reader(format!("{HEADER}\n{rows}").as_bytes())
            .deserialize()
            .collect()
    }

    #[test]
    fn deserializes_well_formed_row() {
        let rows = "A Walk in the Woods,https://img/1.png,\"['Black', 'White']\",\"['000000', 'FFFFFF']\",1,1,https://yt/abc";
        let parsed = parse(rows);
        assert_eq!(parsed.len(), 1);
        let rec = parsed[0].as_ref().unwrap();
        assert_eq!(rec.painting_title, "A Walk in the Woods");
        assert_eq!(rec.season, 1);
        assert_eq!(rec.episode, 1);
        assert_eq!(rec.youtube_url(), Some("https://yt/abc"));
    }

    #[test]
    fn non_numeric_season_fails_that_row() {
        let rows = "Title,https://img,\"[]\",\"[]\",one,1,";
        let parsed = parse(rows);
        assert!(parsed[0].is_err());
    }

    #[test]
    fn blank_youtube_src_becomes_none() {
        let rows = "Title,https://img,\"[]\",\"[]\",1,2,";
        let parsed = parse(rows);
        let rec = parsed[0].as_ref().unwrap();
        assert_eq!(rec.youtube_url(), None);
    }
}
