//! px-core - Core library for px
//!
//! Takes the up/down SQL of Propel-generated migrations and lays it out as
//! numbered files per schema and direction (`<root>/<schema>/up/00001.sql`)
//! for another migration runner. Re-running an extraction is idempotent:
//! slots already holding a migration's code are left alone.

pub mod config;
pub mod direction;
pub mod error;
pub mod extractor;
pub mod filter;
pub mod fs;
pub mod migration;
pub mod migration_code;
pub mod slot;

pub use config::Config;
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use extractor::{Extraction, Extractor, SlotOutcome};
pub use filter::{BookkeepingFilter, QueryFilter, SchemaAllowList};
pub use fs::{DryRunFileSystem, FileSystem, LocalFileSystem, MemoryFileSystem};
pub use migration::{Migration, MigrationDefinition, SchemaId, SqlMap};
pub use migration_code::{resolve_migration_code, MigrationCode};
pub use slot::{list_slots, DirectionDirs, NumberedSlotResolver, PathResolver, SlotEntry};
