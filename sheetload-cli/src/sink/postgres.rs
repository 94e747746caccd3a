//! PostgreSQL sink over a single long-lived connection

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::LevelFilter;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgSslMode};
use sqlx::{ConnectOptions, Connection, Postgres, QueryBuilder};

use super::{TableSink, quote_ident};
use crate::config::{DatabaseConfig, Secret, SslMode};
use crate::workbook::Sheet;

/// Bind parameters allowed in one PostgreSQL statement
const MAX_BIND_PARAMS: usize = 65_535;

impl From<SslMode> for PgSslMode {
    fn from(mode: SslMode) -> Self {
        match mode {
            SslMode::Disable => PgSslMode::Disable,
            SslMode::Allow => PgSslMode::Allow,
            SslMode::Prefer => PgSslMode::Prefer,
            SslMode::Require => PgSslMode::Require,
            SslMode::VerifyCa => PgSslMode::VerifyCa,
            SslMode::VerifyFull => PgSslMode::VerifyFull,
        }
    }
}

pub struct PostgresSink {
    conn: PgConnection,
}

impl PostgresSink {
    /// Open the connection used for every sheet in the run
    pub async fn connect(db: &DatabaseConfig, password: &Secret) -> Result<Self> {
        let options = PgConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .database(&db.name)
            .username(&db.user)
            .password(password.expose())
            .ssl_mode(db.ssl_mode.into())
            .log_statements(LevelFilter::Debug);

        log::info!(
            "Connecting to {}@{}:{}/{} (sslmode={})",
            db.user,
            db.host,
            db.port,
            db.name,
            db.ssl_mode
        );

        let conn = options.connect().await.with_context(|| {
            format!(
                "Failed to connect to database '{}' on {}:{}",
                db.name, db.host, db.port
            )
        })?;

        Ok(PostgresSink { conn })
    }

    pub async fn close(self) -> Result<()> {
        self.conn
            .close()
            .await
            .context("Failed to close database connection")
    }
}

/// Rows per INSERT so the statement stays under the bind parameter limit
fn rows_per_batch(column_count: usize) -> usize {
    (MAX_BIND_PARAMS / column_count.max(1)).max(1)
}

fn create_table_sql(table: &str, headers: &[String]) -> String {
    let columns: Vec<String> = headers
        .iter()
        .map(|h| format!("{} TEXT", quote_ident(h)))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), columns.join(", "))
}

fn insert_prefix(table: &str, headers: &[String]) -> String {
    let columns: Vec<String> = headers.iter().map(|h| quote_ident(h)).collect();
    format!("INSERT INTO {} ({}) ", quote_ident(table), columns.join(", "))
}

#[async_trait]
impl TableSink for PostgresSink {
    async fn table_exists(&mut self, table: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM information_schema.tables
                WHERE table_schema = current_schema()
                  AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(&mut self.conn)
        .await
        .with_context(|| format!("Failed to check whether table '{}' exists", table))?;

        Ok(exists)
    }

    async fn replace_table(&mut self, table: &str, sheet: &Sheet) -> Result<u64> {
        if let Some(idx) = sheet.headers.iter().position(|h| h.is_empty()) {
            bail!(
                "Column {} of sheet '{}' has an empty name after normalization",
                idx + 1,
                sheet.name
            );
        }

        let mut tx = self
            .conn
            .begin()
            .await
            .context("Failed to begin transaction")?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to drop table '{}'", table))?;

        sqlx::query(&create_table_sql(table, &sheet.headers))
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to create table '{}'", table))?;

        let mut written = 0u64;
        if !sheet.headers.is_empty() {
            let prefix = insert_prefix(table, &sheet.headers);
            for chunk in sheet.rows.chunks(rows_per_batch(sheet.column_count())) {
                let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(&prefix);
                builder.push_values(chunk, |mut values, row| {
                    for cell in row {
                        values.push_bind(cell.as_deref());
                    }
                });

                let result = builder
                    .build()
                    .execute(&mut *tx)
                    .await
                    .with_context(|| format!("Failed to insert rows into '{}'", table))?;
                written += result.rows_affected();
            }
        }

        tx.commit()
            .await
            .with_context(|| format!("Failed to commit table '{}'", table))?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rows_per_batch_respects_bind_limit() {
        assert_eq!(rows_per_batch(12), 5461);
        assert!(rows_per_batch(12) * 12 <= MAX_BIND_PARAMS);
        assert_eq!(rows_per_batch(0), MAX_BIND_PARAMS);
        assert_eq!(rows_per_batch(100_000), 1);
    }

    #[test]
    fn test_create_table_sql_quotes_everything() {
        let sql = create_table_sql("rsvp___aug__", &headers(&["name", "select"]));
        assert_eq!(
            sql,
            "CREATE TABLE \"rsvp___aug__\" (\"name\" TEXT, \"select\" TEXT)"
        );
    }

    #[test]
    fn test_insert_prefix() {
        assert_eq!(
            insert_prefix("data", &headers(&["a", "b"])),
            "INSERT INTO \"data\" (\"a\", \"b\") "
        );
    }

    #[test]
    fn test_ssl_mode_mapping() {
        assert!(matches!(PgSslMode::from(SslMode::Require), PgSslMode::Require));
        assert!(matches!(PgSslMode::from(SslMode::VerifyFull), PgSslMode::VerifyFull));
    }
}
