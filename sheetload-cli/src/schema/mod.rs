//! Canonical column vocabulary for the two sheet families
//!
//! Every table written by the loader carries at least the canonical columns of
//! its family. Values are never touched; only the header set is guaranteed.

pub mod variants;

pub use variants::{COMMON_VARIANTS, FUZZY_VARIANTS};

/// Person-level RSVP columns, in output order
pub const RSVP_CANON: [&str; 12] = [
    "name",
    "first_name",
    "last_name",
    "email",
    "approval_status",
    "job_title",
    "company",
    "type_of_company",
    "inviter_name",
    "linkedin",
    "telegram",
    "color_label",
];

/// Aggregate company-level columns, in output order
pub const DATA_CANON: [&str; 8] = [
    "type_of_company",
    "total_count",
    "pct_increase",
    "color_label",
    "total_rsvp_approved",
    "total_pending",
    "total_sign_ups",
    "notable_companies",
];

/// Row semantics of a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// One row per invited person
    Rsvp,
    /// One row per company bucket with totals
    Data,
}

impl Family {
    /// Canonical ordered field list for this family
    pub fn canonical_fields(&self) -> &'static [&'static str] {
        match self {
            Family::Rsvp => &RSVP_CANON,
            Family::Data => &DATA_CANON,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Family::Rsvp => "rsvp",
            Family::Data => "data",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Family {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rsvp" => Ok(Family::Rsvp),
            "data" => Ok(Family::Data),
            other => Err(format!("unknown sheet family '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_canonical_fields_are_unique() {
        for family in [Family::Rsvp, Family::Data] {
            let fields = family.canonical_fields();
            let unique: HashSet<_> = fields.iter().collect();
            assert_eq!(unique.len(), fields.len(), "duplicate in {}", family);
        }
    }

    #[test]
    fn test_family_round_trips_through_str() {
        assert_eq!("rsvp".parse::<Family>(), Ok(Family::Rsvp));
        assert_eq!("DATA".parse::<Family>(), Ok(Family::Data));
        assert!("other".parse::<Family>().is_err());
        assert_eq!(Family::Data.to_string(), "data");
    }
}
