//! CSV cell cleanup for the paintings file.

use crate::error::IngestError;

/// Parse a pseudo-JSON array cell (`"['Alizarin Crimson', 'Van Dyke Brown']"`)
/// into trimmed strings. The source data quotes elements with single quotes,
/// so those are normalized to double quotes before structural parsing.
pub fn clean_string_array(cell: &str) -> Result<Vec<String>, IngestError> {
    let normalized = cell.trim().replace('\'', "\"");
    let parsed: Vec<String> = serde_json::from_str(&normalized)
        .map_err(|e| IngestError::Parse(format!("array cell {cell:?}: {e}")))?;
    Ok(parsed.into_iter().map(|s| s.trim().to_string()).collect())
}

/// Hex codes are stored with a leading `#`; prepend one when missing.
pub fn normalize_hex(hex: &str) -> String {
    if hex.starts_with('#') {
        hex.to_string()
    } else {
        format!("#{hex}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_quoted_array() {
        let cell = "['Alizarin Crimson', 'Van Dyke Brown', ' Titanium White ']";
        assert_eq!(
            clean_string_array(cell).unwrap(),
            vec!["Alizarin Crimson", "Van Dyke Brown", "Titanium White"]
        );
    }

    #[test]
    fn parses_already_double_quoted_array() {
        assert_eq!(
            clean_string_array(r#"["Black Gesso"]"#).unwrap(),
            vec!["Black Gesso"]
        );
    }

    #[test]
    fn empty_array_is_fine() {
        assert!(clean_string_array("[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_cell_is_a_parse_error() {
        for bad in ["not an array", "['unterminated'", "{'a': 1}", ""] {
            assert!(clean_string_array(bad).is_err(), "input {bad:?}");
        }
    }

    #[test]
    fn hex_gets_leading_hash() {
        assert_eq!(normalize_hex("ABC123"), "#ABC123");
        assert_eq!(normalize_hex("#ABC123"), "#ABC123");
    }
}
