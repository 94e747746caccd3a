//! Interactive password acquisition

use anyhow::{Context, Result};

/// A credential that never appears in `Debug` output or logs
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secret(***)")
    }
}

/// Prompt for the database password on the controlling terminal
pub fn prompt_password(user: &str, host: &str) -> Result<Secret> {
    let password = rpassword::prompt_password(format!("Password for {}@{}: ", user, host))
        .context("Failed to read password")?;
    Ok(Secret::new(password))
}
