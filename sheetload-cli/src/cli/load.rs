//! The load command: read, transform, write, report

use anyhow::{Context, Result, bail};
use colored::*;
use dialoguer::Confirm;
use is_terminal::IsTerminal;

use super::Cli;
use crate::config::{LoaderConfig, Secret, discover_config, prompt_password};
use crate::pipeline::{LoadReport, SheetOutcome, SheetStatus, run_pipeline};
use crate::sink::{MemorySink, PostgresSink, TableSink};
use crate::workbook::read_workbook;

pub async fn handle_load_command(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    let file_config = discover_config(cli.config.as_deref())?;
    let config = LoaderConfig::resolve(file_config, |key| std::env::var(key).ok(), cli.overrides())
        .context("Invalid configuration")?;

    // Password is asked at start-up, before the workbook is read
    let password = acquire_password(&config, prompt_password)?;

    let workbook = read_workbook(&config.workbook_path)?;
    println!(
        "Found sheets: {}",
        workbook.sheet_names().join(", ").cyan()
    );

    let Some(password) = password else {
        println!("{}", "Dry run: nothing will be written".yellow());
        let mut sink = MemorySink::new();
        let report = load(workbook, &config, &mut sink).await?;
        print_summary(&report, true);
        return Ok(());
    };

    let mut sink = PostgresSink::connect(&config.database, &password).await?;
    drop(password);

    let report = load(workbook, &config, &mut sink).await?;
    sink.close().await?;

    print_summary(&report, false);
    Ok(())
}

/// Prompt for the database password unless this is a dry run
fn acquire_password<F>(config: &LoaderConfig, prompt: F) -> Result<Option<Secret>>
where
    F: FnOnce(&str, &str) -> Result<Secret>,
{
    if config.dry_run {
        return Ok(None);
    }
    prompt(&config.database.user, &config.database.host).map(Some)
}

async fn load(
    workbook: crate::workbook::Workbook,
    config: &LoaderConfig,
    sink: &mut dyn TableSink,
) -> Result<LoadReport> {
    let assume_yes = config.assume_yes;
    run_pipeline(
        workbook,
        config,
        sink,
        |sheet, table| confirm_replace(sheet, table, assume_yes),
        print_outcome,
    )
    .await
}

/// Ask before dropping an existing table
fn confirm_replace(sheet: &str, table: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    if !std::io::stdin().is_terminal() {
        bail!(
            "Table '{}' already exists; pass --yes to replace it non-interactively",
            table
        );
    }

    Confirm::new()
        .with_prompt(format!(
            "Table '{}' already exists. Drop and replace it with sheet '{}'?",
            table, sheet
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

fn print_outcome(outcome: &SheetOutcome) {
    let family = format!("family={}", outcome.family);
    let family = if outcome.reason == crate::classify::Reason::Fallback {
        format!("{} (fallback)", family).yellow()
    } else {
        family.normal()
    };

    match outcome.status {
        SheetStatus::Written | SheetStatus::DryRun => {
            let verb = if outcome.status == SheetStatus::DryRun {
                "Prepared".blue().bold()
            } else if outcome.replaced_existing {
                "Replaced".green().bold()
            } else {
                "Uploaded".green().bold()
            };
            println!(
                "{} '{}' -> table '{}' ({} rows, {} columns, {})",
                verb,
                outcome.sheet_name,
                outcome.table.bright_white(),
                outcome.rows,
                outcome.columns,
                family
            );
            if !outcome.added_columns.is_empty() {
                println!(
                    "    backfilled: {}",
                    outcome.added_columns.join(", ").dimmed()
                );
            }
        }
        SheetStatus::Declined => {
            println!(
                "{} '{}' -> table '{}' (kept existing table)",
                "Skipped".yellow().bold(),
                outcome.sheet_name,
                outcome.table
            );
        }
    }
}

fn print_summary(report: &LoadReport, dry_run: bool) {
    println!();
    let verb = if dry_run { "Prepared" } else { "Loaded" };
    let mut line = format!(
        "{} {} of {} sheet(s), {} row(s); headers normalized, values untouched",
        verb,
        report.written(),
        report.outcomes.len(),
        report.total_rows()
    );
    if report.declined() > 0 {
        line.push_str(&format!(", {} skipped", report.declined()));
    }
    println!("{}", line.bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, SslMode};
    use crate::normalize::DuplicatePolicy;
    use std::path::PathBuf;

    fn config(dry_run: bool) -> LoaderConfig {
        LoaderConfig {
            workbook_path: PathBuf::from("leads.xlsx"),
            database: DatabaseConfig {
                host: "db.example.com".to_string(),
                port: 5432,
                name: "events".to_string(),
                user: "loader".to_string(),
                ssl_mode: SslMode::Require,
            },
            sheets: Vec::new(),
            duplicate_policy: DuplicatePolicy::Suffix,
            strict_classification: false,
            assume_yes: false,
            dry_run,
        }
    }

    #[test]
    fn test_password_prompted_for_real_runs() {
        let mut asked = None;
        let password = acquire_password(&config(false), |user, host| {
            asked = Some(format!("{}@{}", user, host));
            Ok(Secret::new("hunter2"))
        })
        .unwrap();

        assert_eq!(asked.as_deref(), Some("loader@db.example.com"));
        assert_eq!(password.unwrap().expose(), "hunter2");
    }

    #[test]
    fn test_dry_run_skips_password() {
        let password =
            acquire_password(&config(true), |_, _| panic!("dry run must not prompt")).unwrap();
        assert!(password.is_none());
    }

    #[test]
    fn test_assume_yes_confirms_without_terminal() {
        assert!(confirm_replace("RSVP", "rsvp", true).unwrap());
    }
}
