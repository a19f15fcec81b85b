// schemasync/src/sync/logic.rs
use tracing::{error, info, warn};

use crate::errors::{AppError, Result};
use crate::sync::endpoint::{InsertOutcome, SnapshotSink, SnapshotSource};
use crate::sync::render::render_insert;

const DUMP_BUFFER_CAPACITY: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableReport {
    pub table: String,
    pub rows: usize,
    /// `None` when the source table was empty and nothing was inserted.
    pub outcome: Option<InsertOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTable {
    pub table: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub replicated: Vec<TableReport>,
    pub skipped: Vec<SkippedTable>,
}

/// Replaces destination tables with snapshots of the source, one table at a time.
///
/// The statement buffer is owned here and reused for every table: it is
/// filled, executed and cleared before the next table is exported. A
/// replicator must therefore never run two tables at once.
pub struct Replicator<S, D> {
    source: S,
    dest: D,
    buffer: String,
}

impl<S: SnapshotSource, D: SnapshotSink> Replicator<S, D> {
    pub fn new(source: S, dest: D) -> Self {
        Self {
            source,
            dest,
            buffer: String::with_capacity(DUMP_BUFFER_CAPACITY),
        }
    }

    /// Overwrites every table in order.
    ///
    /// Export failures are logged and the table is skipped. Any failure after
    /// the destination has been touched ends the batch with that error.
    pub async fn run(&mut self, tables: &[String]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for table in tables {
            match self.overwrite_table(table).await {
                Ok(report) => summary.replicated.push(report),
                Err(e) if e.is_recoverable() => {
                    warn!("⚠️ Skipping table {}: {}", table, e);
                    summary.skipped.push(SkippedTable {
                        table: table.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    pub async fn overwrite_table(&mut self, table: &str) -> Result<TableReport> {
        let snapshot = self.source.export_table(table).await?;
        let rows = snapshot.rows.len();

        info!("🔄 Overwriting table: {}", table);
        self.dest
            .truncate_table(table)
            .await
            .map_err(|source| AppError::Truncate {
                table: table.to_string(),
                source,
            })?;

        if rows == 0 {
            info!("✓ Table {} is empty in source, left truncated", table);
            return Ok(TableReport {
                table: table.to_string(),
                rows,
                outcome: None,
            });
        }

        render_insert(&mut self.buffer, &snapshot)?;
        drop(snapshot);

        let outcome = match self.dest.execute_insert(&self.buffer).await {
            Ok(outcome) => outcome,
            Err(source) => {
                error!("failed statement for table {}: {}", table, self.buffer);
                let statement = self.buffer.clone();
                self.buffer.clear();
                return Err(AppError::Insert {
                    table: table.to_string(),
                    statement,
                    source,
                });
            }
        };
        self.buffer.clear();

        info!(
            "✓ Table {} inserted {} rows (last insert id {})",
            table, outcome.rows_affected, outcome.last_insert_id
        );
        Ok(TableReport {
            table: table.to_string(),
            rows,
            outcome: Some(outcome),
        })
    }
}
