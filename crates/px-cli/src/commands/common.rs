//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use px_core::Config;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// A loaded px project: its directory and configuration.
#[derive(Debug, Clone)]
pub(crate) struct Project {
    pub(crate) dir: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// Output root for slot files.
    pub(crate) fn root_dir(&self) -> PathBuf {
        self.config.root_dir_absolute(&self.dir)
    }

    /// Directory holding migration definitions.
    pub(crate) fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir_absolute(&self.dir)
    }
}

/// Initialize `env_logger`; `RUST_LOG` wins over `--verbose`.
pub(crate) fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

/// Load the project from the global `--project-dir` / `--config` options.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let dir = Path::new(&global.project_dir).to_path_buf();
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&dir),
    }
    .context("Failed to load project config")?;

    Ok(Project { dir, config })
}
