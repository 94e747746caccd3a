//! Sheet name to table identifier

/// PostgreSQL truncates identifiers longer than this many bytes
pub const MAX_IDENTIFIER_BYTES: usize = 63;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableNameError {
    /// The sheet name produced an empty identifier
    Empty { sheet_name: String },
}

impl std::fmt::Display for TableNameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableNameError::Empty { sheet_name } => {
                write!(f, "sheet name '{}' yields an empty table name", sheet_name)
            }
        }
    }
}

impl std::error::Error for TableNameError {}

/// Derive the table identifier for a sheet
///
/// Lowercases, then replaces each character outside `[A-Za-z0-9_]` with `_`
/// one for one. Unlike header cleaning, runs are not collapsed, so existing
/// table names stay stable. Names longer than [`MAX_IDENTIFIER_BYTES`] are
/// truncated here, exactly as PostgreSQL would, so existence checks see the
/// real table.
pub fn table_name(sheet_name: &str) -> Result<String, TableNameError> {
    let mut name: String = sheet_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if name.is_empty() {
        return Err(TableNameError::Empty {
            sheet_name: sheet_name.to_string(),
        });
    }

    if name.len() > MAX_IDENTIFIER_BYTES {
        let mut cut = MAX_IDENTIFIER_BYTES;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        let full = name.clone();
        name.truncate(cut);
        log::warn!(
            "Table name '{}' exceeds {} bytes, truncated to '{}'",
            full,
            MAX_IDENTIFIER_BYTES,
            name
        );
    }

    Ok(name)
}

/// Quote an identifier for use in SQL text
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
