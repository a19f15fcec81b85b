// schemasync/src/sync/mysql.rs
use anyhow::Context;
use async_trait::async_trait;
use sqlx::mysql::{MySql, MySqlPool};
use sqlx::{Column, Decode, Executor, Row, Statement, ValueRef};
use tracing::debug;

use crate::errors::{AppError, Result};
use crate::sync::endpoint::{InsertOutcome, SnapshotSink, SnapshotSource};
use crate::sync::snapshot::{Cell, TableSnapshot, quote_identifier};

#[async_trait]
impl SnapshotSource for MySqlPool {
    async fn export_table(&mut self, table: &str) -> Result<TableSnapshot> {
        let pool: &MySqlPool = self;
        let sql = format!("SELECT * FROM {}", quote_identifier(table));
        let export_error = |e: sqlx::Error| AppError::Export {
            table: table.to_string(),
            source: e.into(),
        };

        // Column metadata comes from the prepared statement so that empty
        // tables still report their columns.
        let statement = pool.prepare(&sql).await.map_err(export_error)?;
        let columns: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let mut snapshot = TableSnapshot::new(table, columns)?;

        // A plain string runs over the text protocol, so every non-null value
        // arrives as its textual representation whatever the column type.
        let rows = pool.fetch_all(sql.as_str()).await.map_err(export_error)?;
        debug!("Fetched {} rows from {}", rows.len(), table);

        for row in &rows {
            let mut cells = Vec::with_capacity(snapshot.columns.len());
            for (idx, column) in snapshot.columns.iter().enumerate() {
                let value_error = |source: anyhow::Error| AppError::Value {
                    table: table.to_string(),
                    column: column.clone(),
                    source,
                };
                let raw = row
                    .try_get_raw(idx)
                    .map_err(|e| value_error(e.into()))?;
                if raw.is_null() {
                    cells.push(Cell::Null);
                    continue;
                }
                let bytes = <&[u8] as Decode<MySql>>::decode(raw)
                    .map_err(|e| value_error(anyhow::anyhow!(e)))?;
                cells.push(Cell::from_bytes(bytes));
            }
            snapshot.push_row(cells);
        }

        Ok(snapshot)
    }
}

#[async_trait]
impl SnapshotSink for MySqlPool {
    async fn truncate_table(&mut self, table: &str) -> anyhow::Result<()> {
        let pool: &MySqlPool = self;
        let sql = format!("TRUNCATE TABLE {}", quote_identifier(table));
        pool.execute(sql.as_str())
            .await
            .with_context(|| format!("Failed to execute: {}", sql))?;
        Ok(())
    }

    async fn execute_insert(&mut self, statement: &str) -> anyhow::Result<InsertOutcome> {
        let pool: &MySqlPool = self;
        let result = pool
            .execute(statement)
            .await
            .context("Destination rejected the insert statement")?;
        Ok(InsertOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_id(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::render::render_insert;
    use pretty_assertions::assert_eq;

    const DSN_VAR: &str = "SCHEMASYNC_TEST_MYSQL_DSN";
    const SOURCE_TABLE: &str = "schemasync_roundtrip_src";
    const DEST_TABLE: &str = "schemasync_roundtrip_dst";

    async fn create_table(pool: &MySqlPool, table: &str) -> anyhow::Result<()> {
        pool.execute(format!("DROP TABLE IF EXISTS `{}`", table).as_str())
            .await?;
        pool.execute(
            format!(
                "CREATE TABLE `{}` (\
                   id INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
                   name VARCHAR(64) NULL, \
                   note TEXT NULL, \
                   amount DECIMAL(10,2) NULL\
                 ) DEFAULT CHARSET = utf8mb4",
                table
            )
            .as_str(),
        )
        .await?;
        Ok(())
    }

    /// Needs a scratch MySQL database:
    /// `SCHEMASYNC_TEST_MYSQL_DSN=mysql://root:pw@127.0.0.1/scratch cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_export_and_replay_round_trip() -> anyhow::Result<()> {
        let Ok(dsn) = std::env::var(DSN_VAR) else {
            eprintln!("{} not set, skipping MySQL round trip", DSN_VAR);
            return Ok(());
        };
        let mut pool = MySqlPool::connect(&dsn).await?;

        create_table(&pool, SOURCE_TABLE).await?;
        create_table(&pool, DEST_TABLE).await?;
        pool.execute(
            format!(
                "INSERT INTO `{}` (id, name, note, amount) VALUES \
                 (1, 'Alice', NULL, 10.50), \
                 (2, 'O''Brien', CONCAT('C:', CHAR(92 USING utf8mb4), 'temp'), NULL), \
                 (3, NULL, '', 0.00)",
                SOURCE_TABLE
            )
            .as_str(),
        )
        .await?;
        // Stale row that the overwrite must remove.
        pool.execute(format!("INSERT INTO `{}` (id) VALUES (99)", DEST_TABLE).as_str())
            .await?;

        let mut snapshot = pool.export_table(SOURCE_TABLE).await?;
        assert_eq!(snapshot.columns, vec!["id", "name", "note", "amount"]);
        assert_eq!(snapshot.rows.len(), 3);
        assert_eq!(snapshot.rows[0][2], Cell::Null);
        assert_eq!(snapshot.rows[1][1], Cell::Text("O'Brien".to_string()));
        assert_eq!(snapshot.rows[1][2], Cell::Text(r"C:\temp".to_string()));
        assert_eq!(snapshot.rows[2][2], Cell::Text(String::new()));

        pool.truncate_table(DEST_TABLE).await?;
        snapshot.table = DEST_TABLE.to_string();
        let mut buffer = String::new();
        render_insert(&mut buffer, &snapshot)?;
        let outcome = pool.execute_insert(&buffer).await?;
        assert_eq!(outcome.rows_affected, 3);

        let mut copied = pool.export_table(DEST_TABLE).await?;
        copied.table = SOURCE_TABLE.to_string();
        snapshot.table = SOURCE_TABLE.to_string();
        assert_eq!(copied, snapshot);

        pool.execute(format!("DROP TABLE `{}`, `{}`", SOURCE_TABLE, DEST_TABLE).as_str())
            .await?;
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    async fn test_missing_table_is_an_export_error() -> anyhow::Result<()> {
        let Ok(dsn) = std::env::var(DSN_VAR) else {
            eprintln!("{} not set, skipping MySQL export check", DSN_VAR);
            return Ok(());
        };
        let mut pool = MySqlPool::connect(&dsn).await?;

        let err = pool
            .export_table("schemasync_no_such_table")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Export { ref table, .. } if table == "schemasync_no_such_table"));
        assert!(err.is_recoverable());
        Ok(())
    }
}
