// schemasync/src/sync/render.rs
use std::fmt::Write;

use crate::errors::{AppError, Result};
use crate::sync::snapshot::{TableSnapshot, quote_identifier};

/// Writes `INSERT INTO <table>(<fields>) VALUES <values>` into `buffer`,
/// which must have been drained by the previous table.
pub fn render_insert(buffer: &mut String, snapshot: &TableSnapshot) -> Result<()> {
    debug_assert!(buffer.is_empty(), "insert buffer was not drained");
    write!(
        buffer,
        "INSERT INTO {}({}) VALUES {}",
        quote_identifier(&snapshot.table),
        snapshot.render_columns(),
        snapshot.render_values()
    )
    .map_err(|source| AppError::Template {
        table: snapshot.table.clone(),
        source,
    })
}
