//! Backfill canonical columns missing from a sheet

use crate::schema::Family;
use crate::workbook::Sheet;

/// Append every canonical column of `family` that the sheet lacks, as an
/// all-NULL column, in canonical order. Returns the names that were added.
///
/// Existing columns, canonical or not, are left exactly where they are.
pub fn complete_schema(sheet: &mut Sheet, family: Family) -> Vec<&'static str> {
    let mut added = Vec::new();

    for &field in family.canonical_fields() {
        if sheet.column_index(field).is_none() {
            sheet.push_null_column(field);
            added.push(field);
        }
    }

    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DATA_CANON, RSVP_CANON};

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> Sheet {
        let mut sheet = Sheet::new("test", headers.iter().map(|h| h.to_string()).collect());
        for row in rows {
            sheet.push_row(row.iter().map(|v| Some(v.to_string())).collect());
        }
        sheet
    }

    #[test]
    fn test_rsvp_completion_is_superset() {
        let mut s = sheet(&["name", "email", "notes"], &[&["Ada", "ada@example.com", "vip"]]);
        let added = complete_schema(&mut s, Family::Rsvp);

        assert_eq!(added.len(), 10);
        for field in RSVP_CANON {
            assert!(s.column_index(field).is_some(), "missing {}", field);
        }
        // Originals keep their place, extras are kept
        assert_eq!(&s.headers[..3], &["name", "email", "notes"]);
        assert_eq!(s.column_count(), 13);
    }

    #[test]
    fn test_data_completion_is_superset() {
        let mut s = sheet(&["type_of_company", "total_count"], &[&["Studio", "12"]]);
        let added = complete_schema(&mut s, Family::Data);

        assert_eq!(added.len(), 6);
        for field in DATA_CANON {
            assert!(s.column_index(field).is_some(), "missing {}", field);
        }
        assert_eq!(s.column_count(), 8);
    }

    #[test]
    fn test_completion_never_overwrites_or_duplicates() {
        let mut s = sheet(&["color_label", "email"], &[&["red", "a@b.c"]]);
        complete_schema(&mut s, Family::Rsvp);

        let color_cols = s.headers.iter().filter(|h| *h == "color_label").count();
        assert_eq!(color_cols, 1);
        assert_eq!(s.rows[0][0], Some("red".to_string()));
        assert_eq!(s.rows[0][1], Some("a@b.c".to_string()));
    }

    #[test]
    fn test_completion_is_idempotent() {
        let mut s = sheet(&["name"], &[&["Ada"]]);
        complete_schema(&mut s, Family::Rsvp);
        let before = s.clone();
        assert!(complete_schema(&mut s, Family::Rsvp).is_empty());
        assert_eq!(s, before);
    }

    #[test]
    fn test_completion_on_empty_sheet() {
        let mut s = Sheet::new("blank", Vec::new());
        complete_schema(&mut s, Family::Data);
        assert_eq!(s.headers, DATA_CANON.to_vec());
        assert_eq!(s.row_count(), 0);
    }
}
