//! TOML configuration file
//!
//! ```toml
//! workbook = "/data/lead_list.xlsx"
//!
//! [database]
//! host = "db.example.com"
//! port = 5432
//! name = "events"
//! user = "loader"
//! ssl_mode = "require"
//!
//! [load]
//! duplicates = "suffix"
//! strict = false
//! sheets = ["RSVP", "Data"]
//! ```
//!
//! A password key is rejected.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub workbook: Option<PathBuf>,
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub load: LoadSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub ssl_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoadSection {
    pub duplicates: Option<String>,
    pub strict: Option<bool>,
    #[serde(default)]
    pub sheets: Vec<String>,
}

/// Default location: `<config dir>/sheetload/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sheetload").join("config.toml"))
}

pub fn parse_config(text: &str) -> Result<FileConfig> {
    toml::from_str(text).context("Invalid configuration file")
}

/// Load an explicit config file; it must exist
pub fn load_config_file(path: &Path) -> Result<FileConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("In config file: {}", path.display()))
}

/// Load the explicit file if given, else the default file if it exists
pub fn discover_config(explicit: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            log::debug!("Using config file {}", path.display());
            load_config_file(&path)
        }
        _ => Ok(FileConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_file() {
        let config = parse_config(
            r#"
            workbook = "/tmp/leads.xlsx"

            [database]
            host = "db.example.com"
            port = 6543
            name = "events"
            user = "loader"
            ssl_mode = "verify-full"

            [load]
            duplicates = "error"
            strict = true
            sheets = ["RSVP"]
            "#,
        )
        .unwrap();

        assert_eq!(config.workbook, Some(PathBuf::from("/tmp/leads.xlsx")));
        assert_eq!(config.database.port, Some(6543));
        assert_eq!(config.database.ssl_mode.as_deref(), Some("verify-full"));
        assert_eq!(config.load.duplicates.as_deref(), Some("error"));
        assert_eq!(config.load.strict, Some(true));
        assert_eq!(config.load.sheets, vec!["RSVP"]);
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config = parse_config("").unwrap();
        assert!(config.workbook.is_none());
        assert!(config.database.host.is_none());
        assert!(config.load.sheets.is_empty());
    }

    #[test]
    fn test_password_key_is_rejected() {
        assert!(parse_config("[database]\npassword = \"x\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[database]\nhost = \"localhost\"").unwrap();

        let config = discover_config(Some(&path)).unwrap();
        assert_eq!(config.database.host.as_deref(), Some("localhost"));

        assert!(discover_config(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
