// schemasync/src/sync/snapshot.rs
use crate::errors::{AppError, Result};

/// One value of a snapshot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Null,
    Text(String),
    /// Anything the server sent that is not valid UTF-8.
    Bytes(Vec<u8>),
}

impl Cell {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Cell::Text(text.to_string()),
            Err(_) => Cell::Bytes(bytes.to_vec()),
        }
    }
}

impl From<Option<&str>> for Cell {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(text) => Cell::Text(text.to_string()),
            None => Cell::Null,
        }
    }
}

/// Full contents of a table at the time it was read.
/// Every row holds one cell per column, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableSnapshot {
    pub fn new(table: &str, columns: Vec<String>) -> Result<Self> {
        if columns.is_empty() {
            return Err(AppError::NoColumns(table.to_string()));
        }
        Ok(Self {
            table: table.to_string(),
            columns,
            rows: Vec::new(),
        })
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Column list for the insert statement: `` `id`,`name` ``.
    pub fn render_columns(&self) -> String {
        self.columns
            .iter()
            .map(|c| quote_name(c))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Row tuples for the insert statement: `('1','Alice'),('2',null)`.
    pub fn render_values(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('(');
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    out.push(',');
                }
                push_literal(&mut out, cell);
            }
            out.push(')');
        }
        out
    }
}

/// Delimits a possibly schema-qualified table name: `app.users` -> `` `app`.`users` ``.
pub fn quote_identifier(name: &str) -> String {
    name.trim()
        .split('.')
        .map(quote_name)
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_name(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn push_literal(out: &mut String, cell: &Cell) {
    match cell {
        Cell::Null => out.push_str("null"),
        // Backslash and NUL mean different things depending on the server's
        // NO_BACKSLASH_ESCAPES mode; a hex literal reads the same under both.
        Cell::Text(text) if text.contains(['\\', '\0']) => push_hex(out, text.as_bytes()),
        Cell::Text(text) => {
            out.push('\'');
            out.push_str(&text.replace('\'', "''"));
            out.push('\'');
        }
        Cell::Bytes(bytes) => push_hex(out, bytes),
    }
}

fn push_hex(out: &mut String, bytes: &[u8]) {
    out.push_str("0x");
    out.push_str(&hex::encode(bytes));
}
