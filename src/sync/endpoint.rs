// schemasync/src/sync/endpoint.rs
use async_trait::async_trait;

use crate::errors::Result;
use crate::sync::snapshot::TableSnapshot;

/// Where snapshots are read from.
#[async_trait]
pub trait SnapshotSource: Send {
    /// Reads every row of `table`. Any failure here is confined to that table.
    async fn export_table(&mut self, table: &str) -> Result<TableSnapshot>;
}

/// Where snapshots are replayed.
#[async_trait]
pub trait SnapshotSink: Send {
    async fn truncate_table(&mut self, table: &str) -> anyhow::Result<()>;

    async fn execute_insert(&mut self, statement: &str) -> anyhow::Result<InsertOutcome>;
}

/// Result metadata reported by the destination driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    pub rows_affected: u64,
    /// Only meaningful for tables with a single auto-increment key.
    pub last_insert_id: u64,
}
