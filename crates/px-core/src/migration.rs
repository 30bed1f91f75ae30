//! Migration objects and their YAML definitions.
//!
//! The extraction pipeline only needs three things from a migration: its type
//! name and its up/down SQL keyed by schema. [`Migration`] captures exactly
//! that. [`MigrationDefinition`] is the file-backed implementation used by the
//! CLI: one YAML document per migration.

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::migration_code::{resolve_migration_code, MigrationCode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::path::{Component, Path};

/// Name of the database/connection a block of SQL targets.
///
/// Used verbatim as the first directory level under the output root, so it
/// must be a single plain path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SchemaId(String);

impl SchemaId {
    /// Validate a schema id.
    ///
    /// Rejects empty values, separators, `.`/`..` and anything
    /// `Path` does not read as one normal component (absolute paths,
    /// drive prefixes).
    pub fn try_new(value: impl Into<String>) -> CoreResult<Self> {
        let value = value.into();
        let reason = if value.is_empty() {
            Some("must not be empty")
        } else if value.contains(['/', '\\']) {
            Some("must not contain path separators")
        } else if value == "." || value == ".." {
            Some("must not be a relative path component")
        } else {
            let mut components = Path::new(&value).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(_)), None) => None,
                _ => Some("must be a single directory name"),
            }
        };

        match reason {
            Some(reason) => Err(CoreError::InvalidSchema { value, reason }),
            None => Ok(Self(value)),
        }
    }

    /// The schema id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for SchemaId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        SchemaId::try_new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for SchemaId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SchemaId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// SQL keyed by schema, in the order the migration supplied it.
pub type SqlMap = IndexMap<SchemaId, String>;

/// A migration object as produced by the upstream generator.
pub trait Migration {
    /// Type name carrying the migration identity, e.g. `PropelMigration_4821`.
    fn type_name(&self) -> &str;

    /// SQL applying the migration, per schema.
    fn up_sql(&self) -> &SqlMap;

    /// SQL reverting the migration, per schema.
    fn down_sql(&self) -> &SqlMap;

    /// SQL for the given direction.
    fn sql(&self, direction: Direction) -> &SqlMap {
        match direction {
            Direction::Up => self.up_sql(),
            Direction::Down => self.down_sql(),
        }
    }

    /// Migration code derived from the type name, if it has one.
    fn code(&self) -> Option<MigrationCode> {
        resolve_migration_code(self.type_name())
    }
}

/// On-disk form of a migration definition file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionFile {
    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    up: SqlMap,

    #[serde(default)]
    down: SqlMap,
}

/// A migration loaded from (or built like) a YAML definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationDefinition {
    /// Type name; defaults to the file stem when loaded from disk
    pub name: String,

    /// Up SQL per schema
    pub up: SqlMap,

    /// Down SQL per schema
    pub down: SqlMap,
}

impl MigrationDefinition {
    /// Create a definition with empty SQL maps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            up: SqlMap::new(),
            down: SqlMap::new(),
        }
    }

    /// Builder-style helper adding up SQL for a schema.
    pub fn with_up(mut self, schema: &str, sql: impl Into<String>) -> CoreResult<Self> {
        self.up.insert(SchemaId::try_new(schema)?, sql.into());
        Ok(self)
    }

    /// Builder-style helper adding down SQL for a schema.
    pub fn with_down(mut self, schema: &str, sql: impl Into<String>) -> CoreResult<Self> {
        self.down.insert(SchemaId::try_new(schema)?, sql.into());
        Ok(self)
    }

    /// Load a definition from a YAML file.
    ///
    /// When the document has no `name`, the file stem is used.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let file: DefinitionFile =
            serde_yaml::from_str(&content).map_err(|e| CoreError::DefinitionInvalid {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let name = match file.name {
            Some(name) if !name.trim().is_empty() => name,
            Some(_) => {
                return Err(CoreError::DefinitionInvalid {
                    path: path.display().to_string(),
                    message: "'name' must not be empty".to_string(),
                })
            }
            None => path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(String::from)
                .ok_or_else(|| CoreError::DefinitionInvalid {
                    path: path.display().to_string(),
                    message: "file name is not valid UTF-8".to_string(),
                })?,
        };

        Ok(Self {
            name,
            up: file.up,
            down: file.down,
        })
    }

    /// Load every `*.yml`/`*.yaml` definition in a directory.
    ///
    /// Results are ordered by file name. A missing directory yields no
    /// definitions.
    pub fn discover(dir: &Path) -> CoreResult<Vec<Self>> {
        if !dir.exists() {
            log::debug!("Migrations directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(|e| CoreError::io(dir, e))? {
            let path = entry.map_err(|e| CoreError::io(dir, e))?.path();
            let is_yaml = path
                .extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml");
            if path.is_file() && is_yaml {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|p| Self::load(p)).collect()
    }
}

impl Migration for MigrationDefinition {
    fn type_name(&self) -> &str {
        &self.name
    }

    fn up_sql(&self) -> &SqlMap {
        &self.up
    }

    fn down_sql(&self) -> &SqlMap {
        &self.down
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
