//! Header normalization
//!
//! Raw header text is basic-cleaned to snake case, then looked up in the
//! fuzzy tier and the common tier of the variant map. Unmapped headers pass
//! through cleaned. Column order and count never change.

mod duplicates;

pub use duplicates::{DuplicatePolicy, NormalizeError, resolve_duplicates};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{COMMON_VARIANTS, FUZZY_VARIANTS};

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());
static UNDERSCORES: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").unwrap());

/// Deterministic text cleaning applied to every header before lookup
///
/// Trims, lowercases, turns every run of characters outside `[a-z0-9]` into a
/// single `_`, then strips leading and trailing underscores. Idempotent.
pub fn basic_clean(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let replaced = NON_ALNUM.replace_all(&lowered, "_");
    let collapsed = UNDERSCORES.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Normalize a single header: clean, then fuzzy tier, then common tier
pub fn normalize_header(raw: &str) -> String {
    let mut key = basic_clean(raw);

    if let Some(mapped) = FUZZY_VARIANTS.get(key.as_str()) {
        key = mapped.to_string();
    }
    if let Some(mapped) = COMMON_VARIANTS.get(key.as_str()) {
        key = mapped.to_string();
    }

    key
}

/// Normalize a full header row, then apply the duplicate policy
pub fn normalize_headers(
    raw: &[String],
    policy: DuplicatePolicy,
) -> Result<Vec<String>, NormalizeError> {
    let normalized: Vec<String> = raw.iter().map(|h| normalize_header(h)).collect();
    resolve_duplicates(normalized, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_clean() {
        assert_eq!(basic_clean("  First Name "), "first_name");
        assert_eq!(basic_clean("What's your LinkedIn?"), "what_s_your_linkedin");
        assert_eq!(basic_clean("__Total -- Count__"), "total_count");
        assert_eq!(basic_clean("Unnamed: 2"), "unnamed_2");
        assert_eq!(basic_clean("%"), "");
        assert_eq!(basic_clean(""), "");
    }

    #[test]
    fn test_basic_clean_is_idempotent() {
        let samples = [
            "Kindly provide the name of the person who invited you to this e",
            "Total RSVP Approved ",
            "E-mail",
            "Ünïcödé Header",
            "a__b",
            "___",
            "Colour / Label (2024)",
        ];
        for raw in samples {
            let once = basic_clean(raw);
            assert_eq!(basic_clean(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_unmapped_headers_are_clean_snake_case() {
        let shape = Regex::new(r"^[a-z0-9_]*$").unwrap();
        for raw in ["Favourite Snack", "  ID#  ", "Région", "x--y--z", "2024 Budget ($)"] {
            let header = normalize_header(raw);
            assert!(shape.is_match(&header), "{:?} -> {:?}", raw, header);
            assert!(!header.starts_with('_') && !header.ends_with('_'));
            assert!(!header.contains("__"));
        }
    }

    #[test]
    fn test_mapped_headers_resolve_to_canonical() {
        // Keys with a trailing '_' reach their target through the common tier
        for (key, target) in FUZZY_VARIANTS.iter() {
            assert_eq!(normalize_header(key), *target);
        }
        for (key, target) in COMMON_VARIANTS.iter() {
            assert_eq!(normalize_header(key), *target);
        }
    }

    #[test]
    fn test_raw_spellings() {
        assert_eq!(normalize_header("Color"), "color_label");
        assert_eq!(normalize_header("What's your Linked In?"), "linkedin");
        assert_eq!(normalize_header("Percentage Increase"), "pct_increase");
        assert_eq!(normalize_header("Total Sign-Ups "), "total_sign_ups");
        assert_eq!(
            normalize_header("Kindly provide the name of the person who invited you to this e"),
            "inviter_name"
        );
        assert_eq!(normalize_header("Unnamed: 2"), "pct_increase");
        assert_eq!(normalize_header("Unnamed: 3"), "unnamed_3");
    }

    #[test]
    fn test_normalize_headers_preserves_order_and_length() {
        let raw: Vec<String> = ["Email", "Notes", "Name"].iter().map(|s| s.to_string()).collect();
        let headers = normalize_headers(&raw, DuplicatePolicy::Suffix).unwrap();
        assert_eq!(headers, vec!["email", "notes", "name"]);
    }
}
