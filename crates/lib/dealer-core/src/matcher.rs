//! Matching rules shared by the search tools.
//!
//! Customer ids are pulled out of free text, and vehicle colors are matched
//! through a small alias table so a basic color keyword finds
//! manufacturer trim names.

use std::sync::LazyLock;

use regex::Regex;

static CUSTOMER_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)C\d{3,}").expect("customer id pattern is valid"));

/// Basic color keywords and the display names they stand for.
pub const COLOR_ALIASES: &[(&str, &[&str])] = &[
    ("赤", &["ソウルレッド", "レッド", "赤"]),
    ("白", &["ホワイト", "ロジウムホワイト", "白"]),
    ("黒", &["ブラック", "ジェットブラック", "黒"]),
    ("グレー", &["マシングレー", "グレー", "灰"]),
    ("青", &["ブルー", "ディープブルー", "青"]),
];

/// Extracts a customer id such as `C001` from `raw`.
///
/// Surrounding whitespace (including the ideographic space) is trimmed first.
/// When no id-shaped token is present the trimmed input is returned as-is.
#[must_use]
pub fn normalize_customer_id(raw: &str) -> String {
    let trimmed = raw.trim();
    CUSTOMER_ID_PATTERN.find(trimmed).map_or_else(
        || trimmed.to_string(),
        |found| found.as_str().to_uppercase(),
    )
}

/// Bidirectional containment. An absent or empty needle matches everything.
#[must_use]
pub fn contains_substring(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None | Some("") => true,
        Some(needle) => haystack.contains(needle) || needle.contains(haystack),
    }
}

/// Checks whether `vehicle_color` satisfies the color filter `search_color`.
#[must_use]
pub fn matches_color(vehicle_color: &str, search_color: Option<&str>) -> bool {
    let Some(search) = search_color.filter(|value| !value.is_empty()) else {
        return true;
    };

    if contains_substring(vehicle_color, Some(search)) {
        return true;
    }

    let alias_hit = COLOR_ALIASES
        .iter()
        .filter(|(key, _)| contains_substring(key, Some(search)))
        .any(|(_, aliases)| aliases.iter().any(|alias| vehicle_color.contains(alias)));
    if alias_hit {
        return true;
    }

    vehicle_color.contains(search)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_extracts_embedded_id() {
        assert_eq!(normalize_customer_id("C001の顧客情報"), "C001");
        assert_eq!(normalize_customer_id("顧客 c0042 の契約"), "C0042");
    }

    #[test]
    fn normalize_uppercases_bare_id() {
        assert_eq!(normalize_customer_id("c002"), "C002");
        assert_eq!(normalize_customer_id("\u{3000}C003 "), "C003");
    }

    #[test]
    fn normalize_leaves_text_without_id() {
        assert_eq!(normalize_customer_id("no id here"), "no id here");
        assert_eq!(normalize_customer_id("  C12  "), "C12");
    }

    #[test]
    fn contains_substring_is_bidirectional() {
        assert!(contains_substring("ソウルレッド", Some("レッド")));
        assert!(contains_substring("レッド", Some("ソウルレッド")));
        assert!(!contains_substring("ホワイト", Some("レッド")));
        assert!(contains_substring("anything", None));
        assert!(contains_substring("anything", Some("")));
    }

    #[test]
    fn color_alias_matches_trim_name() {
        assert!(matches_color("ソウルレッド", Some("赤")));
        assert!(matches_color("ロジウムホワイト", Some("白")));
        assert!(matches_color("マシングレーメタリック", Some("グレー")));
    }

    #[test]
    fn color_alias_only_consults_keys() {
        // "灰" is a synonym, not a key, so it only matches by containment.
        assert!(!matches_color("マシングレー", Some("灰")));
        assert!(matches_color("灰色", Some("灰")));
    }

    #[test]
    fn color_alias_rejects_other_colors() {
        assert!(!matches_color("ホワイト", Some("赤")));
        assert!(!matches_color("ジェットブラック", Some("青")));
    }

    #[test]
    fn color_without_filter_matches() {
        assert!(matches_color("ディープブルー", None));
        assert!(matches_color("ディープブルー", Some("")));
    }

    #[test]
    fn color_direct_containment_matches() {
        assert!(matches_color("ソウルレッド", Some("レッド")));
        assert!(matches_color("レッド", Some("ソウルレッドクリスタル")));
    }
}
