//! Catalog resolution for CLI commands
//!
//! Order: `--catalog` flag, then `[catalog] path` from config, then
//! `lessons.json` in the config directory, then the built-in sample lessons.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lessons_core::StaticCatalog;
use tracing::debug;

use crate::config::LessonsConfig;

/// Sample lessons shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("../assets/lessons.json");

/// Where the lesson catalog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Flag(PathBuf),
    Config(PathBuf),
    Default(PathBuf),
    Builtin,
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag(path) | Self::Config(path) | Self::Default(path) => {
                write!(f, "{}", path.display())
            }
            Self::Builtin => write!(f, "built-in sample lessons"),
        }
    }
}

impl CatalogSource {
    /// Pick the catalog source for this invocation
    pub fn resolve(flag: Option<&Path>, config: &LessonsConfig) -> Self {
        Self::resolve_with_default(flag, config, &lessons_paths::default_catalog_file())
    }

    fn resolve_with_default(flag: Option<&Path>, config: &LessonsConfig, default: &Path) -> Self {
        if let Some(path) = flag {
            Self::Flag(path.to_path_buf())
        } else if let Some(path) = &config.catalog.path {
            Self::Config(path.clone())
        } else if default.exists() {
            Self::Default(default.to_path_buf())
        } else {
            Self::Builtin
        }
    }

    /// Load and validate the catalog
    pub fn load(&self) -> Result<StaticCatalog> {
        debug!(source = %self, "Loading lesson catalog");
        match self {
            Self::Flag(path) | Self::Config(path) | Self::Default(path) => {
                StaticCatalog::from_path(path)
                    .with_context(|| format!("Could not load lessons from {}", path.display()))
            }
            Self::Builtin => StaticCatalog::from_json_str(BUILTIN_CATALOG)
                .context("Built-in lessons are invalid"),
        }
    }
}

/// Resolve and load in one step
pub fn load(flag: Option<&Path>, config: &LessonsConfig) -> Result<StaticCatalog> {
    CatalogSource::resolve(flag, config).load()
}
