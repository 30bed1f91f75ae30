//! Configuration types and parsing for px.yml

use crate::error::{CoreError, CoreResult};
use crate::filter::{BookkeepingFilter, DEFAULT_BOOKKEEPING_TABLE};
use crate::slot::{normalize_root, DirectionDirs, DEFAULT_DOWN_DIR, DEFAULT_UP_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names looked up in a project directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["px.yml", "px.yaml"];

/// Project configuration from px.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Root directory receiving `<schema>/<direction>/NNNNN.sql` files
    pub root_dir: String,

    /// Directory containing migration definition files
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Directory name for up SQL
    #[serde(default = "default_up_dir")]
    pub up_dir: String,

    /// Directory name for down SQL
    #[serde(default = "default_down_dir")]
    pub down_dir: String,

    /// Propel migration history table targeted by bookkeeping statements
    #[serde(default = "default_bookkeeping_table")]
    pub bookkeeping_table: String,

    /// Only extract these schemas (default: all)
    #[serde(default)]
    pub schemas: Option<Vec<String>>,
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_up_dir() -> String {
    DEFAULT_UP_DIR.to_string()
}

fn default_down_dir() -> String {
    DEFAULT_DOWN_DIR.to_string()
}

fn default_bookkeeping_table() -> String {
    DEFAULT_BOOKKEEPING_TABLE.to_string()
}

impl Config {
    /// Configuration with defaults for everything but the root directory.
    pub fn new(root_dir: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            migrations_dir: default_migrations_dir(),
            up_dir: default_up_dir(),
            down_dir: default_down_dir(),
            bookkeeping_table: default_bookkeeping_table(),
            schemas: None,
        }
    }

    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        for warning in config.warnings() {
            log::warn!("{}: {}", path.display(), warning);
        }
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for px.yml or px.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.root_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "root_dir cannot be empty".to_string(),
            });
        }

        for (key, value) in [("up_dir", &self.up_dir), ("down_dir", &self.down_dir)] {
            if value.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} cannot be empty", key),
                });
            }
            if value.contains(['/', '\\']) || value == "." || value == ".." {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{} must be a single directory name, got '{}'", key, value),
                });
            }
        }

        if self.bookkeeping_table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "bookkeeping_table cannot be empty".to_string(),
            });
        }

        if let Some(schemas) = &self.schemas {
            if let Some(empty) = schemas.iter().position(|s| s.is_empty()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("schemas[{}] cannot be empty", empty),
                });
            }
        }

        Ok(())
    }

    /// Non-fatal problems worth reporting.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.up_dir == self.down_dir {
            warnings.push(format!(
                "up_dir and down_dir are both '{}'; up and down SQL will share one slot sequence",
                self.up_dir
            ));
        }
        if matches!(&self.schemas, Some(s) if s.is_empty()) {
            warnings.push("schemas is an empty list; nothing will be extracted".to_string());
        }
        warnings
    }

    /// Root directory resolved against a project directory, trailing
    /// separators stripped.
    pub fn root_dir_absolute(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(normalize_root(&self.root_dir))
    }

    /// Migrations directory resolved against a project directory.
    pub fn migrations_dir_absolute(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.migrations_dir)
    }

    /// Direction directory names.
    pub fn direction_dirs(&self) -> DirectionDirs {
        DirectionDirs::new(&self.up_dir, &self.down_dir)
    }

    /// Bookkeeping filter for the configured history table.
    pub fn bookkeeping_filter(&self) -> BookkeepingFilter {
        BookkeepingFilter::new(&self.bookkeeping_table)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
