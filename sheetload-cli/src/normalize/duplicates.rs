//! Collision handling for headers that normalize to the same name

use std::collections::HashSet;

/// What to do when two headers in one sheet normalize to the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// First occurrence keeps the name, later ones get `_2`, `_3`, ...
    #[default]
    Suffix,
    /// Reject the sheet
    Error,
    /// Keep identical names (the database will refuse the table)
    Keep,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::Suffix => write!(f, "suffix"),
            DuplicatePolicy::Error => write!(f, "error"),
            DuplicatePolicy::Keep => write!(f, "keep"),
        }
    }
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suffix" => Ok(DuplicatePolicy::Suffix),
            "error" => Ok(DuplicatePolicy::Error),
            "keep" => Ok(DuplicatePolicy::Keep),
            other => Err(format!(
                "unknown duplicate header policy '{}' (expected suffix, error or keep)",
                other
            )),
        }
    }
}

/// Error raised while normalizing a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Two columns share a normalized name and the policy forbids it
    DuplicateHeader {
        name: String,
        first: usize,
        second: usize,
    },
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::DuplicateHeader {
                name,
                first,
                second,
            } => write!(
                f,
                "columns {} and {} both normalize to '{}'",
                first + 1,
                second + 1,
                name
            ),
        }
    }
}

impl std::error::Error for NormalizeError {}

/// Apply `policy` to a normalized header row
pub fn resolve_duplicates(
    headers: Vec<String>,
    policy: DuplicatePolicy,
) -> Result<Vec<String>, NormalizeError> {
    match policy {
        DuplicatePolicy::Keep => Ok(headers),
        DuplicatePolicy::Error => {
            for (i, name) in headers.iter().enumerate() {
                if let Some(j) = headers[i + 1..].iter().position(|h| h == name) {
                    return Err(NormalizeError::DuplicateHeader {
                        name: name.clone(),
                        first: i,
                        second: i + 1 + j,
                    });
                }
            }
            Ok(headers)
        }
        DuplicatePolicy::Suffix => {
            // Reserve every original name first so a suffix never steals a
            // name that appears later in the row
            let mut taken: HashSet<String> = headers.iter().cloned().collect();
            let mut seen: HashSet<String> = HashSet::new();
            let mut resolved = Vec::with_capacity(headers.len());

            for name in headers {
                if seen.insert(name.clone()) {
                    resolved.push(name);
                    continue;
                }

                let mut n = 2;
                let mut candidate = format!("{}_{}", name, n);
                while taken.contains(&candidate) {
                    n += 1;
                    candidate = format!("{}_{}", name, n);
                }
                log::warn!("Duplicate column '{}' renamed to '{}'", name, candidate);
                taken.insert(candidate.clone());
                seen.insert(candidate.clone());
                resolved.push(candidate);
            }

            Ok(resolved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_suffix_renames_later_occurrences() {
        let out = resolve_duplicates(row(&["name", "email", "name", "name"]), DuplicatePolicy::Suffix)
            .unwrap();
        assert_eq!(out, row(&["name", "email", "name_2", "name_3"]));
    }

    #[test]
    fn test_suffix_skips_names_already_present() {
        let out = resolve_duplicates(
            row(&["color_label", "color_label", "color_label_2"]),
            DuplicatePolicy::Suffix,
        )
        .unwrap();
        assert_eq!(out, row(&["color_label", "color_label_3", "color_label_2"]));
    }

    #[test]
    fn test_error_policy_reports_positions() {
        let err = resolve_duplicates(row(&["a", "b", "a"]), DuplicatePolicy::Error).unwrap_err();
        assert_eq!(
            err,
            NormalizeError::DuplicateHeader {
                name: "a".to_string(),
                first: 0,
                second: 2
            }
        );
        assert_eq!(err.to_string(), "columns 1 and 3 both normalize to 'a'");
    }

    #[test]
    fn test_keep_policy_is_passthrough() {
        let out = resolve_duplicates(row(&["a", "a"]), DuplicatePolicy::Keep).unwrap();
        assert_eq!(out, row(&["a", "a"]));
    }

    #[test]
    fn test_no_duplicates_untouched_under_every_policy() {
        for policy in [DuplicatePolicy::Suffix, DuplicatePolicy::Error, DuplicatePolicy::Keep] {
            let out = resolve_duplicates(row(&["x", "y"]), policy).unwrap();
            assert_eq!(out, row(&["x", "y"]));
        }
    }
}
