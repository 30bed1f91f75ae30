//! Numbered slot resolution: where a filtered query is written.
//!
//! Every (schema, direction) pair owns a directory of numbered files:
//!
//! ```text
//! <root>/<schema>/<direction dir>/00001.sql
//!                                 00002.sql
//! ```
//!
//! The directory is an append-only ledger. A migration claims the lowest free
//! slot, unless some slot already mentions its code, in which case it was
//! extracted before and nothing is written.

use crate::direction::Direction;
use crate::error::{CoreError, CoreResult};
use crate::fs::FileSystem;
use crate::migration::{Migration, SchemaId};
use crate::migration_code::MigrationCode;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Extension of slot files
pub const SLOT_EXTENSION: &str = "sql";

/// Minimum digits in a slot file name
const SLOT_WIDTH: usize = 5;

/// Default directory name for up SQL
pub const DEFAULT_UP_DIR: &str = "up";

/// Default directory name for down SQL
pub const DEFAULT_DOWN_DIR: &str = "down";

/// Resolves the file a filtered query should be written to.
pub trait PathResolver {
    /// Returns `Ok(None)` when the query is already materialized and the write
    /// must be skipped.
    #[allow(clippy::too_many_arguments)]
    fn resolve(
        &self,
        fs: &dyn FileSystem,
        root: &Path,
        schema: &SchemaId,
        direction: Direction,
        sql: &str,
        migration: &dyn Migration,
        code: &MigrationCode,
    ) -> CoreResult<Option<PathBuf>>;
}

/// Directory names used for each direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionDirs {
    up: String,
    down: String,
}

impl DirectionDirs {
    /// Use `up` and `down` as the per-direction directory names.
    ///
    /// Identical names are allowed but logged: up and down files then share
    /// one ledger and the dedup scan no longer separates them.
    pub fn new(up: impl Into<String>, down: impl Into<String>) -> Self {
        let dirs = Self {
            up: up.into(),
            down: down.into(),
        };
        if dirs.is_merged() {
            log::warn!(
                "Up and down SQL share the directory '{}'; their slots will be interleaved",
                dirs.up
            );
        }
        dirs
    }

    /// Directory name for a direction.
    pub fn for_direction(&self, direction: Direction) -> &str {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
        }
    }

    /// Whether both directions resolve to the same folder.
    pub fn is_merged(&self) -> bool {
        self.up == self.down
    }
}

impl Default for DirectionDirs {
    fn default() -> Self {
        Self {
            up: DEFAULT_UP_DIR.to_string(),
            down: DEFAULT_DOWN_DIR.to_string(),
        }
    }
}

/// File name of a slot, e.g. `00001.sql`.
pub fn slot_file_name(number: u64) -> String {
    format!("{:0width$}.{}", number, SLOT_EXTENSION, width = SLOT_WIDTH)
}

/// Parse a slot file name back into its number.
///
/// Only all-digit stems of at least five characters count as slots.
pub fn parse_slot_number(file_name: &str) -> Option<u64> {
    let stem = file_name.strip_suffix(&format!(".{}", SLOT_EXTENSION))?;
    if stem.len() < SLOT_WIDTH || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

/// Strip trailing `/` and `\` from a configured root directory.
///
/// A root made only of separators keeps its first character. Non-UTF-8 roots
/// are kept byte for byte; only `Path`-level trailing separators go.
pub fn normalize_root(root: impl AsRef<Path>) -> PathBuf {
    let root = root.as_ref();
    let Some(text) = root.to_str() else {
        return root.components().collect();
    };
    let trimmed = text.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() && !text.is_empty() {
        PathBuf::from(&text[..1])
    } else {
        PathBuf::from(trimmed)
    }
}

/// Scans `00001.sql`, `00002.sql`, ... for a free or matching slot.
#[derive(Debug, Clone, Default)]
pub struct NumberedSlotResolver {
    dirs: DirectionDirs,
}

impl NumberedSlotResolver {
    /// Resolver using the given direction directory names.
    pub fn new(dirs: DirectionDirs) -> Self {
        Self { dirs }
    }

    /// Directory names in use.
    pub fn dirs(&self) -> &DirectionDirs {
        &self.dirs
    }

    /// `<root>/<schema>/<direction dir>`
    pub fn target_dir(&self, root: &Path, schema: &SchemaId, direction: Direction) -> PathBuf {
        root.join(schema.as_str())
            .join(self.dirs.for_direction(direction))
    }
}

impl PathResolver for NumberedSlotResolver {
    fn resolve(
        &self,
        fs: &dyn FileSystem,
        root: &Path,
        schema: &SchemaId,
        direction: Direction,
        _sql: &str,
        _migration: &dyn Migration,
        code: &MigrationCode,
    ) -> CoreResult<Option<PathBuf>> {
        let dir = self.target_dir(root, schema, direction);

        let mut number: u64 = 1;
        loop {
            let candidate = dir.join(slot_file_name(number));

            if !fs.exists(&candidate)? {
                log::debug!("Slot {} is free for {}", candidate.display(), code);
                return Ok(Some(candidate));
            }

            if fs.read_to_string(&candidate)?.contains(code.as_str()) {
                log::debug!(
                    "Slot {} already holds migration {}",
                    candidate.display(),
                    code
                );
                return Ok(None);
            }

            number += 1;
        }
    }
}

/// One existing slot file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotEntry {
    /// Schema directory the slot lives under
    pub schema: String,
    /// Direction directory name
    pub direction_dir: String,
    /// Slot number parsed from the file name
    pub number: u64,
    /// Full path of the slot file
    pub path: PathBuf,
    /// Migration code from the file's `# <code>` header, if present
    pub code: Option<MigrationCode>,
}

/// List the slot files under `root`, ordered by schema, direction dir and
/// number.
///
/// Only direction directories named in `dirs` are visited. Non-slot files are
/// ignored. A missing root yields no entries.
pub fn list_slots(root: &Path, dirs: &DirectionDirs) -> CoreResult<Vec<SlotEntry>> {
    let mut entries = Vec::new();
    if !root.try_exists().map_err(|e| CoreError::io(root, e))? {
        return Ok(entries);
    }

    let mut direction_dirs = vec![dirs.for_direction(Direction::Up)];
    if !dirs.is_merged() {
        direction_dirs.push(dirs.for_direction(Direction::Down));
    }

    for schema_dir in read_dir_sorted(root)? {
        if !is_dir(&schema_dir)? {
            continue;
        }
        let Some(schema) = schema_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };

        for direction_dir in &direction_dirs {
            let dir = schema_dir.join(direction_dir);
            if !is_dir(&dir)? {
                continue;
            }
            let mut slots = Vec::new();
            for path in read_dir_sorted(&dir)? {
                let Some(number) = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .and_then(parse_slot_number)
                else {
                    continue;
                };
                let contents =
                    std::fs::read_to_string(&path).map_err(|e| CoreError::io(&path, e))?;
                slots.push(SlotEntry {
                    schema: schema.to_string(),
                    direction_dir: direction_dir.to_string(),
                    number,
                    code: crate::filter::header_code(&contents),
                    path,
                });
            }
            slots.sort_by_key(|s| s.number);
            entries.extend(slots);
        }
    }

    Ok(entries)
}

/// `Path::is_dir` that only treats "not found" as absent.
fn is_dir(path: &Path) -> CoreResult<bool> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CoreError::io(path, e)),
    }
}

fn read_dir_sorted(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| CoreError::io(dir, e))? {
        paths.push(entry.map_err(|e| CoreError::io(dir, e))?.path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
#[path = "slot_test.rs"]
mod tests;
