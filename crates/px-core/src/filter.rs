//! Query filters applied to each schema's SQL before it is persisted.
//!
//! A filter may rewrite a query or return `None` to omit it. Omitted queries
//! are dropped from the extraction result and never written.

use crate::direction::Direction;
use crate::error::CoreResult;
use crate::migration::{Migration, SchemaId};
use crate::migration_code::MigrationCode;
use std::collections::HashSet;

/// Default name of Propel's migration history table
pub const DEFAULT_BOOKKEEPING_TABLE: &str = "propel_migration";

/// Transforms one raw query into the SQL to persist.
pub trait QueryFilter {
    /// Filter `sql` for `schema` in `direction`.
    ///
    /// Returns `Ok(None)` to omit the query.
    fn filter(
        &self,
        sql: &str,
        schema: &SchemaId,
        direction: Direction,
        migration: &dyn Migration,
        code: &MigrationCode,
    ) -> CoreResult<Option<String>>;
}

impl<F: QueryFilter + ?Sized> QueryFilter for &F {
    fn filter(
        &self,
        sql: &str,
        schema: &SchemaId,
        direction: Direction,
        migration: &dyn Migration,
        code: &MigrationCode,
    ) -> CoreResult<Option<String>> {
        (**self).filter(sql, schema, direction, migration, code)
    }
}

impl<F: QueryFilter + ?Sized> QueryFilter for Box<F> {
    fn filter(
        &self,
        sql: &str,
        schema: &SchemaId,
        direction: Direction,
        migration: &dyn Migration,
        code: &MigrationCode,
    ) -> CoreResult<Option<String>> {
        (**self).filter(sql, schema, direction, migration, code)
    }
}

/// Tags SQL with its migration code and keeps Propel's history table in sync.
///
/// Output layout:
///
/// ```text
/// # <code>
/// <original sql>
///
/// <bookkeeping statement>
/// ```
///
/// Going up, the statement records the code as applied; going down, it
/// removes it. Propel therefore still sees an accurate history even though a
/// different runner applies the SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookkeepingFilter {
    table: String,
}

impl BookkeepingFilter {
    /// Filter writing to the given history table.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Name of the history table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Statement recording `code` as applied.
    pub fn up_statement(&self, code: &MigrationCode) -> String {
        format!("INSERT INTO {} (version) VALUES ({});", self.table, code)
    }

    /// Statement removing `code` from the history.
    pub fn down_statement(&self, code: &MigrationCode) -> String {
        format!("DELETE FROM {} WHERE version = {};", self.table, code)
    }

    /// Bookkeeping statement for a direction.
    pub fn statement(&self, direction: Direction, code: &MigrationCode) -> String {
        match direction {
            Direction::Up => self.up_statement(code),
            Direction::Down => self.down_statement(code),
        }
    }
}

impl Default for BookkeepingFilter {
    fn default() -> Self {
        Self::new(DEFAULT_BOOKKEEPING_TABLE)
    }
}

impl QueryFilter for BookkeepingFilter {
    fn filter(
        &self,
        sql: &str,
        _schema: &SchemaId,
        direction: Direction,
        _migration: &dyn Migration,
        code: &MigrationCode,
    ) -> CoreResult<Option<String>> {
        Ok(Some(format!(
            "# {}\n{}\n\n{}\n",
            code,
            sql,
            self.statement(direction, code)
        )))
    }
}

/// Read the migration code back from a `# <code>` header line.
pub fn header_code(contents: &str) -> Option<MigrationCode> {
    contents
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("# "))
        .and_then(|digits| MigrationCode::try_new(digits.trim()))
}

/// Omits every schema outside an allow-list, delegating the rest.
#[derive(Debug, Clone)]
pub struct SchemaAllowList<F> {
    schemas: HashSet<String>,
    inner: F,
}

impl<F: QueryFilter> SchemaAllowList<F> {
    /// Allow only `schemas`, filtering them with `inner`.
    pub fn new<I, S>(schemas: I, inner: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            schemas: schemas.into_iter().map(Into::into).collect(),
            inner,
        }
    }

    /// Whether `schema` passes the allow-list.
    pub fn allows(&self, schema: &str) -> bool {
        self.schemas.contains(schema)
    }
}

impl<F: QueryFilter> QueryFilter for SchemaAllowList<F> {
    fn filter(
        &self,
        sql: &str,
        schema: &SchemaId,
        direction: Direction,
        migration: &dyn Migration,
        code: &MigrationCode,
    ) -> CoreResult<Option<String>> {
        if !self.allows(schema) {
            log::debug!("Omitting {} SQL for schema '{}'", direction, schema);
            return Ok(None);
        }
        self.inner.filter(sql, schema, direction, migration, code)
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
