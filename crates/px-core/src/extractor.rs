//! The extraction pipeline.
//!
//! `extract` resolves the migration code, filters every query of both
//! directions, then persists each surviving query into its numbered slot.
//! Resolution and write for a slot happen back to back, one query at a time,
//! since the next free slot depends on what the previous write left behind.

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::filter::{BookkeepingFilter, QueryFilter};
use crate::fs::{FileSystem, LocalFileSystem};
use crate::migration::{Migration, SchemaId, SqlMap};
use crate::migration_code::{resolve_migration_code, MigrationCode};
use crate::slot::{normalize_root, DirectionDirs, NumberedSlotResolver, PathResolver};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What happened to one filtered query during persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SlotOutcome {
    /// Written to a fresh slot
    Written {
        schema: SchemaId,
        direction: Direction,
        path: PathBuf,
    },
    /// Already present in an existing slot; nothing written
    Skipped {
        schema: SchemaId,
        direction: Direction,
    },
}

impl SlotOutcome {
    /// Schema the outcome belongs to.
    pub fn schema(&self) -> &SchemaId {
        match self {
            SlotOutcome::Written { schema, .. } | SlotOutcome::Skipped { schema, .. } => schema,
        }
    }

    /// Direction the outcome belongs to.
    pub fn direction(&self) -> Direction {
        match self {
            SlotOutcome::Written { direction, .. } | SlotOutcome::Skipped { direction, .. } => {
                *direction
            }
        }
    }

    /// Path written, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SlotOutcome::Written { path, .. } => Some(path),
            SlotOutcome::Skipped { .. } => None,
        }
    }
}

/// Result of extracting one migration.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Type name of the migration
    pub migration: String,
    /// Code resolved from the type name
    pub code: MigrationCode,
    /// Filtered up SQL per schema; omitted schemas are absent
    pub up: SqlMap,
    /// Filtered down SQL per schema; omitted schemas are absent
    pub down: SqlMap,
    /// One outcome per filtered query, in processing order
    pub outcomes: Vec<SlotOutcome>,
}

impl Extraction {
    /// Filtered SQL for a direction.
    pub fn queries(&self, direction: Direction) -> &SqlMap {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Paths written by this extraction.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(SlotOutcome::path)
    }

    /// Number of queries skipped because they were already materialized.
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SlotOutcome::Skipped { .. }))
            .count()
    }
}

/// Relocates migration SQL into numbered per-schema files.
///
/// Generic over the query filter, the slot resolver and the file system so
/// each can be replaced independently.
#[derive(Debug)]
pub struct Extractor<F = BookkeepingFilter, R = NumberedSlotResolver, S = LocalFileSystem> {
    root: PathBuf,
    filter: F,
    resolver: R,
    fs: S,
}

impl Extractor {
    /// Extractor writing to disk under `root` with the default bookkeeping
    /// filter and `up`/`down` directories.
    pub fn propel(root: impl AsRef<Path>) -> Self {
        Self::new(
            root,
            BookkeepingFilter::default(),
            NumberedSlotResolver::default(),
            LocalFileSystem,
        )
    }

    /// Like [`Extractor::propel`] with custom direction directory names.
    pub fn with_dirs(root: impl AsRef<Path>, dirs: DirectionDirs) -> Self {
        Self::new(
            root,
            BookkeepingFilter::default(),
            NumberedSlotResolver::new(dirs),
            LocalFileSystem,
        )
    }
}

impl<F, R, S> Extractor<F, R, S>
where
    F: QueryFilter,
    R: PathResolver,
    S: FileSystem,
{
    /// Assemble an extractor. Trailing separators on `root` are stripped.
    pub fn new(root: impl AsRef<Path>, filter: F, resolver: R, fs: S) -> Self {
        Self {
            root: normalize_root(root),
            filter,
            resolver,
            fs,
        }
    }

    /// Output root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The file system in use.
    pub fn fs(&self) -> &S {
        &self.fs
    }

    /// Extract one migration: filter both directions, then persist.
    ///
    /// Fails with `InvalidMigration` before anything is filtered or written
    /// when the type name carries no migration code. File system errors abort
    /// the call; files already written stay in place.
    pub fn extract(&self, migration: &dyn Migration) -> CoreResult<Extraction> {
        let code = resolve_migration_code(migration.type_name()).ok_or_else(|| {
            CoreError::InvalidMigration {
                type_name: migration.type_name().to_string(),
            }
        })?;
        log::debug!("Extracting {} (code {})", migration.type_name(), code);

        let up = self.filter_queries(migration, Direction::Up, &code)?;
        let down = self.filter_queries(migration, Direction::Down, &code)?;

        let mut outcomes = Vec::with_capacity(up.len() + down.len());
        self.persist(migration, Direction::Up, &up, &code, &mut outcomes)?;
        self.persist(migration, Direction::Down, &down, &code, &mut outcomes)?;

        Ok(Extraction {
            migration: migration.type_name().to_string(),
            code,
            up,
            down,
            outcomes,
        })
    }

    /// Extract a batch in ascending migration-code order.
    ///
    /// Earlier migrations therefore claim lower slots whatever order they
    /// were supplied in. Every type name is checked before anything is
    /// written; the first failure aborts the batch.
    pub fn extract_all<M: Migration>(&self, migrations: &[M]) -> CoreResult<Vec<Extraction>> {
        let mut ordered = Vec::with_capacity(migrations.len());
        for migration in migrations {
            let code = resolve_migration_code(migration.type_name()).ok_or_else(|| {
                CoreError::InvalidMigration {
                    type_name: migration.type_name().to_string(),
                }
            })?;
            ordered.push((code, migration));
        }
        ordered.sort_by(|a, b| a.0.cmp(&b.0));

        ordered
            .into_iter()
            .map(|(_, migration)| self.extract(migration))
            .collect()
    }

    fn filter_queries(
        &self,
        migration: &dyn Migration,
        direction: Direction,
        code: &MigrationCode,
    ) -> CoreResult<SqlMap> {
        let mut filtered = SqlMap::new();
        for (schema, sql) in migration.sql(direction) {
            match self.filter.filter(sql, schema, direction, migration, code)? {
                Some(query) => {
                    filtered.insert(schema.clone(), query);
                }
                None => log::debug!("Filter omitted {} SQL for schema '{}'", direction, schema),
            }
        }
        Ok(filtered)
    }

    fn persist(
        &self,
        migration: &dyn Migration,
        direction: Direction,
        queries: &SqlMap,
        code: &MigrationCode,
        outcomes: &mut Vec<SlotOutcome>,
    ) -> CoreResult<()> {
        for (schema, sql) in queries {
            let resolved = self.resolver.resolve(
                &self.fs, &self.root, schema, direction, sql, migration, code,
            )?;

            let outcome = match resolved {
                Some(path) => {
                    self.fs.write(&path, sql)?;
                    log::info!("Wrote {} {} SQL to {}", code, direction, path.display());
                    SlotOutcome::Written {
                        schema: schema.clone(),
                        direction,
                        path,
                    }
                }
                None => {
                    log::info!(
                        "Skipped {} {} SQL for schema '{}': already extracted",
                        code,
                        direction,
                        schema
                    );
                    SlotOutcome::Skipped {
                        schema: schema.clone(),
                        direction,
                    }
                }
            };
            outcomes.push(outcome);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
