use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Export of table {table} failed: {source:#}")]
    Export {
        table: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("No columns in table {0}")]
    NoColumns(String),

    #[error("Unreadable value in {table}.{column}: {source:#}")]
    Value {
        table: String,
        column: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Truncate of table {table} failed: {source:#}")]
    Truncate {
        table: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Rendering insert statement for table {table} failed")]
    Template {
        table: String,
        #[source]
        source: std::fmt::Error,
    },

    #[error("Insert into table {table} failed: {source:#}")]
    Insert {
        table: String,
        statement: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Notification failed: {0}")]
    Notify(String),
}

impl AppError {
    /// Per-table export failures only cost the table they happened on.
    /// Everything else stops the batch.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Export { .. } | AppError::NoColumns(_) | AppError::Value { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
