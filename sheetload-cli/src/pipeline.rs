//! Per-sheet load pipeline
//!
//! For each sheet, in workbook order: normalize headers, classify, backfill
//! canonical columns, then replace the sheet's table in the sink. Sheets are
//! independent; the first error aborts the run and later sheets are left
//! untouched.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};

use crate::classify::{Reason, detect_family};
use crate::complete::complete_schema;
use crate::config::LoaderConfig;
use crate::normalize::{DuplicatePolicy, normalize_headers};
use crate::schema::Family;
use crate::sink::{TableSink, table_name};
use crate::workbook::{Sheet, Workbook};

/// A sheet after the transform stages, ready to be written
#[derive(Debug, Clone)]
pub struct PreparedSheet {
    pub sheet: Sheet,
    pub table: String,
    pub family: Family,
    pub reason: Reason,
    /// Canonical columns appended as all-NULL
    pub added_columns: Vec<&'static str>,
}

/// Run the transform stages on one sheet
pub fn prepare_sheet(
    mut sheet: Sheet,
    policy: DuplicatePolicy,
    strict: bool,
) -> Result<PreparedSheet> {
    sheet.headers = normalize_headers(&sheet.headers, policy)
        .with_context(|| format!("Failed to normalize headers of sheet '{}'", sheet.name))?;

    let classification = detect_family(&sheet.name, &sheet.headers, strict)?;
    let added_columns = complete_schema(&mut sheet, classification.family);
    let table = table_name(&sheet.name)?;

    log::debug!(
        "Sheet '{}' -> {} ({}), backfilled {:?}",
        sheet.name,
        classification.family,
        classification.reason,
        added_columns
    );

    Ok(PreparedSheet {
        sheet,
        table,
        family: classification.family,
        reason: classification.reason,
        added_columns,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetStatus {
    /// Table was replaced in the sink
    Written,
    /// Transformed only
    DryRun,
    /// The user declined to replace the existing table
    Declined,
}

/// What happened to one sheet
#[derive(Debug, Clone)]
pub struct SheetOutcome {
    pub sheet_name: String,
    pub table: String,
    pub rows: usize,
    pub columns: usize,
    pub family: Family,
    pub reason: Reason,
    pub added_columns: Vec<&'static str>,
    pub replaced_existing: bool,
    pub status: SheetStatus,
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub outcomes: Vec<SheetOutcome>,
}

impl LoadReport {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status != SheetStatus::Declined)
            .count()
    }

    pub fn declined(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == SheetStatus::Declined)
            .count()
    }

    pub fn total_rows(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status != SheetStatus::Declined)
            .map(|o| o.rows)
            .sum()
    }
}

/// Pick the sheets to load, failing on names that are not in the workbook
pub fn select_sheets(workbook: Workbook, wanted: &[String]) -> Result<Vec<Sheet>> {
    if wanted.is_empty() {
        return Ok(workbook.sheets);
    }

    let missing: Vec<&str> = wanted
        .iter()
        .filter(|name| workbook.find_sheet(name).is_none())
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        bail!(
            "Sheet(s) not found in workbook: {} (available: {})",
            missing.join(", "),
            workbook.sheet_names().join(", ")
        );
    }

    Ok(workbook
        .sheets
        .into_iter()
        .filter(|s| wanted.contains(&s.name))
        .collect())
}

/// Fail if two sheets would be written to the same table
pub fn check_table_collisions(sheets: &[Sheet]) -> Result<()> {
    let mut owners: HashMap<String, &str> = HashMap::new();

    for sheet in sheets {
        let table = table_name(&sheet.name)?;
        if let Some(first) = owners.insert(table.clone(), &sheet.name) {
            bail!(
                "Sheets '{}' and '{}' both map to table '{}'",
                first,
                sheet.name,
                table
            );
        }
    }

    Ok(())
}

/// Load every selected sheet into `sink`
///
/// `confirm(sheet_name, table)` is asked before an existing table is dropped;
/// returning `false` skips that sheet. `on_sheet` sees each outcome as soon
/// as the sheet is done.
pub async fn run_pipeline<C, P>(
    workbook: Workbook,
    config: &LoaderConfig,
    sink: &mut dyn TableSink,
    mut confirm: C,
    mut on_sheet: P,
) -> Result<LoadReport>
where
    C: FnMut(&str, &str) -> Result<bool>,
    P: FnMut(&SheetOutcome),
{
    let sheets = select_sheets(workbook, &config.sheets)?;
    check_table_collisions(&sheets)?;
    let mut report = LoadReport::default();

    for sheet in sheets {
        let prepared = prepare_sheet(
            sheet,
            config.duplicate_policy,
            config.strict_classification,
        )?;

        let replaced_existing = sink.table_exists(&prepared.table).await?;

        let status = if config.dry_run {
            SheetStatus::DryRun
        } else if replaced_existing && !confirm(&prepared.sheet.name, &prepared.table)? {
            log::info!("Keeping existing table '{}'", prepared.table);
            SheetStatus::Declined
        } else {
            if replaced_existing {
                log::warn!("Replacing existing table '{}'", prepared.table);
            }
            SheetStatus::Written
        };

        if status != SheetStatus::Declined {
            sink.replace_table(&prepared.table, &prepared.sheet)
                .await
                .with_context(|| {
                    format!(
                        "Failed to write sheet '{}' to table '{}'",
                        prepared.sheet.name, prepared.table
                    )
                })?;
        }

        let outcome = SheetOutcome {
            sheet_name: prepared.sheet.name.clone(),
            table: prepared.table,
            rows: prepared.sheet.row_count(),
            columns: prepared.sheet.column_count(),
            family: prepared.family,
            reason: prepared.reason,
            added_columns: prepared.added_columns,
            replaced_existing,
            status,
        };
        on_sheet(&outcome);
        report.outcomes.push(outcome);
    }

    Ok(report)
}
