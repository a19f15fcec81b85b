// schemasync/src/sync/mod.rs
pub(crate) mod endpoint;
pub(crate) mod logic;
pub(crate) mod mysql;
pub(crate) mod render;
pub(crate) mod snapshot;

use tracing::info;

use crate::config::Config;
use crate::errors::Result;
use crate::utils::setting::check_db_connection;

pub use logic::RunSummary;

/// Public entry point for the overwrite-data process.
/// Connects to both databases and replays every `[overwrite_data]` table.
pub async fn run_overwrite_flow(config: &Config) -> Result<RunSummary> {
    let tables = &config.overwrite_data.tables;
    if tables.is_empty() {
        info!("No tables listed under [overwrite_data]. Nothing to overwrite.");
        return Ok(RunSummary::default());
    }

    info!("⚙️ Overwriting {} tables: {:?}", tables.len(), tables);
    let source = check_db_connection(&config.source).await?;
    let dest = check_db_connection(&config.dest).await?;

    let mut replicator = logic::Replicator::new(source, dest);
    let summary = replicator.run(tables).await?;

    info!(
        "✅ Overwrite finished: {} replicated, {} skipped",
        summary.replicated.len(),
        summary.skipped.len()
    );
    for report in &summary.replicated {
        match report.outcome {
            Some(outcome) => info!(
                "   {}: {} rows read, {} rows affected",
                report.table, report.rows, outcome.rows_affected
            ),
            None => info!("   {}: empty, truncated only", report.table),
        }
    }
    for skipped in &summary.skipped {
        info!("   skipped {}: {}", skipped.table, skipped.reason);
    }
    Ok(summary)
}
