//! Sheet family detection from the sheet name and its normalized columns

use std::collections::HashSet;

use crate::schema::Family;

const RSVP_SIGNAL_COLUMNS: [&str; 3] = ["job_title", "approval_status", "company"];
const DATA_SIGNAL_COLUMNS: [&str; 3] = ["total_count", "notable_companies", "pct_increase"];

/// Which rule produced a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Sheet name contains "rsvp" or "data"
    SheetName,
    /// A signal column was present
    Columns,
    /// Nothing matched, defaulted to rsvp
    Fallback,
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::SheetName => write!(f, "sheet name"),
            Reason::Columns => write!(f, "columns"),
            Reason::Fallback => write!(f, "fallback"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub family: Family,
    pub reason: Reason,
}

/// Raised in strict mode when no rule matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyError {
    Unclassified { sheet_name: String },
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyError::Unclassified { sheet_name } => write!(
                f,
                "sheet '{}' matches neither family by name or columns",
                sheet_name
            ),
        }
    }
}

impl std::error::Error for ClassifyError {}

/// Classify a sheet; first matching rule wins
pub fn classify(sheet_name: &str, columns: &HashSet<&str>) -> Classification {
    let lower = sheet_name.to_lowercase();

    let (family, reason) = if lower.contains("rsvp") {
        (Family::Rsvp, Reason::SheetName)
    } else if lower.contains("data") {
        (Family::Data, Reason::SheetName)
    } else if RSVP_SIGNAL_COLUMNS.iter().any(|c| columns.contains(c)) {
        (Family::Rsvp, Reason::Columns)
    } else if DATA_SIGNAL_COLUMNS.iter().any(|c| columns.contains(c)) {
        (Family::Data, Reason::Columns)
    } else {
        (Family::Rsvp, Reason::Fallback)
    };

    Classification { family, reason }
}

/// Like [`classify`], but a fallback decision is an error when `strict`
pub fn detect_family(
    sheet_name: &str,
    headers: &[String],
    strict: bool,
) -> Result<Classification, ClassifyError> {
    let columns: HashSet<&str> = headers.iter().map(String::as_str).collect();
    let classification = classify(sheet_name, &columns);

    if classification.reason == Reason::Fallback {
        if strict {
            return Err(ClassifyError::Unclassified {
                sheet_name: sheet_name.to_string(),
            });
        }
        log::warn!(
            "Sheet '{}' has no family signal, defaulting to {}",
            sheet_name,
            classification.family
        );
    }

    Ok(classification)
}
