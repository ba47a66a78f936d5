/// Normalize a label into a stable grouping key
///
/// Lower-cases the input, drops parentheses and hyphens, and joins the
/// remaining whitespace-separated words with a single underscore.
/// Leading and trailing whitespace disappears with the split.
///
/// ```
/// use crime_stats::core::normalize_label;
///
/// assert_eq!(normalize_label("Violence  (with injury)"), "violence_with_injury");
/// ```
pub fn normalize_label(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '-'))
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize_label("Violence  (with injury)"), "violence_with_injury");
        assert_eq!(normalize_label("  Under investigation "), "under_investigation");
    }

    #[test]
    fn test_normalize_strips_hyphens() {
        assert_eq!(normalize_label("anti-social-behaviour"), "antisocialbehaviour");
        assert_eq!(normalize_label("Vehicle - crime"), "vehicle_crime");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_label(""), "");
        assert_eq!(normalize_label("   "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Violence  (with injury)", "ROAD-side", "a b\tc", "already_clean", ""] {
            let once = normalize_label(raw);
            assert_eq!(normalize_label(&once), once, "not idempotent for {:?}", raw);
        }
    }
}
