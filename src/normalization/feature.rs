//! Feature-name and title normalization for the subject-matter file.
//!
//! Header columns arrive uppercase-underscored (`SNOWY_MOUNTAIN`); the stored
//! feature name is the cleaned form (`snowy mountain`). Data cells are read
//! by the header's own column index, never by re-deriving the column name.

pub fn clean_feature_name(raw: &str) -> String {
    raw.replace('_', " ").to_lowercase().trim().to_string()
}

/// Titles in the feature file are quoted and inconsistently cased; strip the
/// surrounding quotes and lower-case for the case-insensitive lookup.
pub fn clean_painting_title(raw: &str) -> String {
    let t = raw.trim();
    let t = t.strip_prefix('"').unwrap_or(t);
    let t = t.strip_suffix('"').unwrap_or(t);
    t.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_header_into_feature_name() {
        assert_eq!(clean_feature_name("SNOWY_MOUNTAIN"), "snowy mountain");
        assert_eq!(clean_feature_name("CABIN"), "cabin");
        assert_eq!(clean_feature_name(" STEVE_ROSS "), "steve ross");
    }

    #[test]
    fn strips_quotes_and_lowercases_title() {
        assert_eq!(
            clean_painting_title("\"A Walk in the Woods\""),
            "a walk in the woods"
        );
        assert_eq!(clean_painting_title("  Mount McKinley "), "mount mckinley");
    }
}
