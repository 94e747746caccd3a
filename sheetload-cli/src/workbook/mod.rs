//! In-memory workbook model
//!
//! A sheet is a rectangular grid of text-or-null cells under one header row.

mod reader;

pub use reader::read_workbook;

/// A single cell: `None` is SQL NULL
pub type Cell = Option<String>;

/// One worksheet after loading
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    /// Display name as it appears in the workbook
    pub name: String,
    /// Header row, one entry per column
    pub headers: Vec<String>,
    /// Data rows; every row has `headers.len()` cells
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Sheet {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Index of the first column named `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Append a column holding `None` in every row
    pub fn push_null_column(&mut self, name: impl Into<String>) {
        self.headers.push(name.into());
        for row in &mut self.rows {
            row.push(None);
        }
    }

    /// Iterate the values of the first column named `name`
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }
}

/// All sheets of a workbook, in workbook order
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn find_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_row_pads_to_width() {
        let mut sheet = Sheet::new("s", vec!["a".into(), "b".into(), "c".into()]);
        sheet.push_row(vec![Some("1".into())]);
        assert_eq!(sheet.rows[0], vec![Some("1".to_string()), None, None]);
    }

    #[test]
    fn test_push_null_column_extends_every_row() {
        let mut sheet = Sheet::new("s", vec!["a".into()]);
        sheet.push_row(vec![Some("x".into())]);
        sheet.push_row(vec![Some("y".into())]);
        sheet.push_null_column("b");

        assert_eq!(sheet.column_count(), 2);
        assert!(sheet.column("b").unwrap().all(|c| c.is_none()));
        let a: Vec<_> = sheet.column("a").unwrap().cloned().collect();
        assert_eq!(a, vec![Some("x".to_string()), Some("y".to_string())]);
    }
}
