//! Sink that keeps written tables in memory

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use super::TableSink;
use crate::workbook::Sheet;

/// Records every replaced table; used for `--dry-run` and in tests
#[derive(Debug, Default)]
pub struct MemorySink {
    tables: HashMap<String, Sheet>,
    /// Table names in the order they were (re)written
    order: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with tables that already "exist"
    pub fn with_existing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sink = Self::new();
        for name in names {
            let name = name.into();
            sink.tables.insert(name.clone(), Sheet::new(name, Vec::new()));
        }
        sink
    }

    pub fn table(&self, name: &str) -> Option<&Sheet> {
        self.tables.get(name)
    }

    pub fn written(&self) -> &[String] {
        &self.order
    }
}

#[async_trait]
impl TableSink for MemorySink {
    async fn table_exists(&mut self, table: &str) -> Result<bool> {
        Ok(self.tables.contains_key(table))
    }

    async fn replace_table(&mut self, table: &str, sheet: &Sheet) -> Result<u64> {
        self.tables.insert(table.to_string(), sheet.clone());
        self.order.push(table.to_string());
        Ok(sheet.row_count() as u64)
    }
}
