//! Run configuration
//!
//! Built once at start-up from four layers, later layers winning: built-in
//! defaults, the TOML file, `SHEETLOAD_*` environment variables, and
//! command-line flags. The database password is not part of any layer; it is
//! prompted for separately (see [`secret`]).

mod file;
pub mod secret;

pub use file::{FileConfig, discover_config};
pub use secret::{Secret, prompt_password};

use std::path::PathBuf;

use crate::normalize::DuplicatePolicy;

pub const DEFAULT_PORT: u16 = 5432;

pub const ENV_WORKBOOK: &str = "SHEETLOAD_WORKBOOK";
pub const ENV_DB_HOST: &str = "SHEETLOAD_DB_HOST";
pub const ENV_DB_PORT: &str = "SHEETLOAD_DB_PORT";
pub const ENV_DB_NAME: &str = "SHEETLOAD_DB_NAME";
pub const ENV_DB_USER: &str = "SHEETLOAD_DB_USER";
pub const ENV_DB_SSLMODE: &str = "SHEETLOAD_DB_SSLMODE";

/// libpq-style TLS negotiation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SslMode {
    Disable,
    Allow,
    Prefer,
    #[default]
    Require,
    VerifyCa,
    VerifyFull,
}

impl std::fmt::Display for SslMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SslMode::Disable => "disable",
            SslMode::Allow => "allow",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
            SslMode::VerifyCa => "verify-ca",
            SslMode::VerifyFull => "verify-full",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "allow" => Ok(SslMode::Allow),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            "verify-ca" | "verify_ca" => Ok(SslMode::VerifyCa),
            "verify-full" | "verify_full" => Ok(SslMode::VerifyFull),
            other => Err(format!("unknown ssl mode '{}'", other)),
        }
    }
}

/// Connection target; the password is supplied separately
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub ssl_mode: SslMode,
}

/// Everything a run needs, resolved up front
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    pub workbook_path: PathBuf,
    pub database: DatabaseConfig,
    /// Only load these sheets; empty means all
    pub sheets: Vec<String>,
    pub duplicate_policy: DuplicatePolicy,
    pub strict_classification: bool,
    /// Replace existing tables without asking
    pub assume_yes: bool,
    /// Transform only, never touch the database
    pub dry_run: bool,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub workbook: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub ssl_mode: Option<SslMode>,
    pub sheets: Vec<String>,
    pub duplicates: Option<DuplicatePolicy>,
    pub strict: bool,
    pub assume_yes: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided by any layer
    Missing {
        setting: &'static str,
        env: &'static str,
        flag: &'static str,
    },
    /// A setting was provided but could not be parsed
    Invalid {
        setting: &'static str,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing { setting, env, flag } => write!(
                f,
                "no {} configured (set it in the config file, {} or {})",
                setting, env, flag
            ),
            ConfigError::Invalid {
                setting,
                value,
                reason,
            } => write!(f, "invalid {} '{}': {}", setting, value, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

fn required<T>(
    value: Option<T>,
    setting: &'static str,
    env: &'static str,
    flag: &'static str,
) -> Result<T, ConfigError> {
    value.ok_or(ConfigError::Missing { setting, env, flag })
}

fn parse_setting<T>(setting: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| ConfigError::Invalid {
            setting,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

impl LoaderConfig {
    /// Merge the layers; `env` looks up an environment variable by name
    pub fn resolve<F>(file: FileConfig, env: F, overrides: Overrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db = file.database;

        let workbook = overrides
            .workbook
            .or_else(|| env(ENV_WORKBOOK).map(PathBuf::from))
            .or(file.workbook);

        let host = overrides.host.or_else(|| env(ENV_DB_HOST)).or(db.host);
        let name = overrides.database.or_else(|| env(ENV_DB_NAME)).or(db.name);
        let user = overrides.user.or_else(|| env(ENV_DB_USER)).or(db.user);

        let port = match overrides.port {
            Some(port) => Some(port),
            None => parse_setting::<u16>("port", env(ENV_DB_PORT))?.or(db.port),
        };

        let ssl_mode = match overrides.ssl_mode {
            Some(mode) => Some(mode),
            None => match parse_setting::<SslMode>("ssl mode", env(ENV_DB_SSLMODE))? {
                Some(mode) => Some(mode),
                None => parse_setting::<SslMode>("ssl mode", db.ssl_mode)?,
            },
        };

        let duplicate_policy = match overrides.duplicates {
            Some(policy) => policy,
            None => parse_setting::<DuplicatePolicy>("duplicate header policy", file.load.duplicates)?
                .unwrap_or_default(),
        };

        let sheets = if overrides.sheets.is_empty() {
            file.load.sheets
        } else {
            overrides.sheets
        };

        let workbook_path = required(workbook, "workbook path", ENV_WORKBOOK, "--file")?;

        // Dry runs never connect, so connection details are optional there
        let database = if overrides.dry_run {
            DatabaseConfig {
                host: host.unwrap_or_default(),
                port: port.unwrap_or(DEFAULT_PORT),
                name: name.unwrap_or_default(),
                user: user.unwrap_or_default(),
                ssl_mode: ssl_mode.unwrap_or_default(),
            }
        } else {
            DatabaseConfig {
                host: required(host, "database host", ENV_DB_HOST, "--host")?,
                port: port.unwrap_or(DEFAULT_PORT),
                name: required(name, "database name", ENV_DB_NAME, "--database")?,
                user: required(user, "database user", ENV_DB_USER, "--user")?,
                ssl_mode: ssl_mode.unwrap_or_default(),
            }
        };

        Ok(LoaderConfig {
            workbook_path,
            database,
            sheets,
            duplicate_policy,
            strict_classification: overrides.strict || file.load.strict.unwrap_or(false),
            assume_yes: overrides.assume_yes,
            dry_run: overrides.dry_run,
        })
    }
}
