use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{error, info};

use crate::errors::Result;
use crate::utils::dsn::redact_dsn;

/// Opens a single-connection pool and proves it with a round trip.
///
/// One connection keeps every statement of a batch on the same session, so
/// `TRUNCATE` and the following `INSERT` observe the same server state.
pub async fn check_db_connection(db_url: &str) -> Result<MySqlPool> {
    let shown = redact_dsn(db_url);
    let pool = match MySqlPoolOptions::new().max_connections(1).connect(db_url).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Failed to connect to {}: {}", shown, e);
            return Err(e.into());
        }
    };

    sqlx::query("SELECT 1").execute(&pool).await?;
    info!("✅ Successfully connected to {}", shown);
    Ok(pool)
}
