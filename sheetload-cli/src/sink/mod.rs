//! Destinations for finished sheets
//!
//! A sink replaces a whole table per sheet. `PostgresSink` is the real
//! target; `MemorySink` backs dry runs and tests.

mod memory;
mod postgres;
mod table_name;

pub use memory::MemorySink;
pub use postgres::PostgresSink;
pub use table_name::{quote_ident, table_name};

use anyhow::Result;
use async_trait::async_trait;

use crate::workbook::Sheet;

#[async_trait]
pub trait TableSink: Send {
    /// Whether a table with this identifier already exists
    async fn table_exists(&mut self, table: &str) -> Result<bool>;

    /// Drop `table` if present, recreate it from the sheet's headers with
    /// every column as nullable text, and insert all rows.
    /// Returns the number of rows written.
    async fn replace_table(&mut self, table: &str, sheet: &Sheet) -> Result<u64>;
}
