//! Load every sheet of a workbook into memory
//!
//! The first row of each sheet's used range is the header row. Cells are
//! rendered to text without any type inference; empty and error cells
//! become NULL.

use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};

use super::{Cell, Sheet, Workbook};

/// Render a cell as opaque text, or `None` for an empty/error cell
pub fn cell_to_text(cell: &Data) -> Cell {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            // Whole numbers print without a trailing ".0"
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(datetime_to_text(dt)),
        Data::DateTimeIso(s) => Some(s.clone()),
        Data::DurationIso(s) => Some(s.clone()),
        Data::Error(_) => None,
    }
}

/// Render a date/time cell the way it reads in the sheet, not as its serial
fn datetime_to_text(dt: &ExcelDateTime) -> String {
    if dt.is_duration() {
        if let Some(duration) = dt.as_duration() {
            return format_duration(duration);
        }
    } else if let Some(datetime) = dt.as_datetime() {
        return datetime.format("%Y-%m-%d %H:%M:%S").to_string();
    }

    // Out of chrono's range; keep the raw serial
    format!("{}", dt)
}

/// `H:MM:SS`, hours unbounded
fn format_duration(duration: chrono::Duration) -> String {
    let total = duration.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{}{}:{:02}:{:02}",
        sign,
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Header label for column `idx`; blank headers get a positional placeholder
fn header_label(cell: &Data, idx: usize) -> String {
    match cell_to_text(cell) {
        Some(text) if !text.trim().is_empty() => text,
        _ => format!("Unnamed: {}", idx),
    }
}

/// Build a [`Sheet`] from a grid of calamine cells
///
/// `first_col` is the zero-based sheet column of the grid's first cell, so
/// blank headers are numbered from column A.
pub(crate) fn sheet_from_rows<'a>(
    name: &str,
    first_col: usize,
    mut rows: impl Iterator<Item = &'a [Data]>,
) -> Sheet {
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| header_label(cell, first_col + idx))
            .collect(),
        None => Vec::new(),
    };

    let mut sheet = Sheet::new(name, headers);

    for row in rows {
        let cells: Vec<Cell> = row.iter().map(cell_to_text).collect();

        // Skip empty rows
        if cells.iter().all(Option::is_none) {
            continue;
        }

        sheet.push_row(cells);
    }

    sheet
}

/// Read all sheets of the workbook at `path`, in workbook order
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in sheet_names {
        let range = workbook
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

        let first_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);
        let sheet = sheet_from_rows(&sheet_name, first_col, range.rows());
        log::debug!(
            "Loaded sheet '{}' ({} columns, {} rows)",
            sheet.name,
            sheet.column_count(),
            sheet.row_count()
        );
        sheets.push(sheet);
    }

    Ok(Workbook { sheets })
}
