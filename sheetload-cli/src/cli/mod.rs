//! Command-line surface

mod load;

pub use load::handle_load_command;

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Overrides, SslMode};
use crate::normalize::DuplicatePolicy;

/// Load every sheet of a lead-list workbook into PostgreSQL, one table per
/// sheet, with headers normalized to a canonical vocabulary.
#[derive(Parser, Debug)]
#[command(name = "sheetload", version, about)]
pub struct Cli {
    /// Configuration file (default: <config dir>/sheetload/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Workbook to load (.xlsx, .xlsm, .xlsb, .xls, .ods)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Database host
    #[arg(long)]
    pub host: Option<String>,

    /// Database port [default: 5432]
    #[arg(long)]
    pub port: Option<u16>,

    /// Database name
    #[arg(short, long)]
    pub database: Option<String>,

    /// Database user
    #[arg(short, long)]
    pub user: Option<String>,

    /// TLS mode: disable, allow, prefer, require, verify-ca, verify-full [default: require]
    #[arg(long, value_name = "MODE")]
    pub ssl_mode: Option<SslMode>,

    /// Only load this sheet (repeatable)
    #[arg(short, long = "sheet", value_name = "NAME")]
    pub sheets: Vec<String>,

    /// What to do when two headers normalize to the same name: suffix, error, keep
    #[arg(long, value_name = "POLICY")]
    pub duplicates: Option<DuplicatePolicy>,

    /// Reject sheets that match neither family instead of defaulting to rsvp
    #[arg(long)]
    pub strict: bool,

    /// Replace existing tables without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Transform and report, but do not connect to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            workbook: self.file.clone(),
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.user.clone(),
            ssl_mode: self.ssl_mode,
            sheets: self.sheets.clone(),
            duplicates: self.duplicates,
            strict: self.strict,
            assume_yes: self.yes,
            dry_run: self.dry_run,
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from([
            "sheetload",
            "--file",
            "leads.xlsx",
            "--ssl-mode",
            "verify-full",
            "--duplicates",
            "error",
            "-s",
            "RSVP",
            "--sheet",
            "Data",
            "-vv",
            "--yes",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("leads.xlsx")));
        assert_eq!(cli.ssl_mode, Some(SslMode::VerifyFull));
        assert_eq!(cli.duplicates, Some(DuplicatePolicy::Error));
        assert_eq!(cli.sheets, vec!["RSVP", "Data"]);
        assert_eq!(cli.log_level(), log::LevelFilter::Debug);

        let overrides = cli.overrides();
        assert!(overrides.assume_yes);
        assert!(!overrides.dry_run);
    }

    #[test]
    fn test_bad_policy_is_rejected() {
        assert!(Cli::try_parse_from(["sheetload", "--duplicates", "merge"]).is_err());
    }
}
