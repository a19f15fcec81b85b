// schemasync/src/scope/mod.rs
//! Decides which tables and table objects a sync operation touches.
//!
//! Inclusion (`tables`) and exclusion (`tables_ignore`) apply to whole tables;
//! `alter_ignore` protects columns, indexes and foreign keys of the tables its
//! keys match. Absent sections are permissive: everything included, nothing
//! excluded or ignored.

pub mod pattern;

pub use pattern::simple_match;

use crate::config::{AlterIgnoreTable, Config};

pub struct ScopeMatcher<'a> {
    config: &'a Config,
}

impl<'a> ScopeMatcher<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn matches_table_scope(&self, name: &str) -> bool {
        self.config.tables.is_empty() || any_match(&self.config.tables, name)
    }

    pub fn is_table_excluded(&self, name: &str) -> bool {
        any_match(&self.config.tables_ignore, name)
    }

    pub fn is_column_ignored(&self, table: &str, column: &str) -> bool {
        self.ignored_by_rule(table, column, |rule| &rule.column)
    }

    pub fn is_index_ignored(&self, table: &str, index: &str) -> bool {
        self.ignored_by_rule(table, index, |rule| &rule.index)
    }

    pub fn is_foreign_key_ignored(&self, table: &str, fk_name: &str) -> bool {
        self.ignored_by_rule(table, fk_name, |rule| &rule.foreign)
    }

    /// Several table patterns may cover the same table; any of them can ignore the object.
    fn ignored_by_rule<F>(&self, table: &str, name: &str, patterns: F) -> bool
    where
        F: Fn(&AlterIgnoreTable) -> &Vec<String>,
    {
        self.config
            .alter_ignore
            .iter()
            .filter(|(table_pattern, _)| simple_match(table_pattern, table))
            .any(|(_, rule)| any_match(patterns(rule), name))
    }
}

fn any_match(patterns: &[String], name: &str) -> bool {
    patterns.iter().any(|p| simple_match(p, name))
}
