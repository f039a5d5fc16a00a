use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::types::{
    DEFAULT_CORRECT_SETTLE_DELAY_MS, DEFAULT_SETTLE_DELAY_MS, CatalogConfig, LessonsConfig,
    ProgressionConfig, RawLessonsConfig, RawProgressionConfig, RawSessionConfig,
    SessionTimingConfig,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<LessonsConfig> {
        Self::load_layers(&[Self::user_config_path(), Self::project_config_path()])
    }

    /// Get user config path
    pub fn user_config_path() -> PathBuf {
        lessons_paths::user_config_file()
    }

    /// Get project config path
    /// Can be overridden with LESSONS_PROJECT_CONFIG_DIR env var (useful for isolated e2e tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("LESSONS_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".lessons/config.toml")
        }
    }

    /// Merge the layers that exist, later paths overriding earlier ones
    fn load_layers(paths: &[PathBuf]) -> Result<LessonsConfig> {
        let mut raw = RawLessonsConfig::default();

        for path in paths {
            if let Some(layer) = Self::read_layer(path)? {
                raw = Self::merge_raw(raw, layer);
            }
        }

        Ok(Self::finalize(raw))
    }

    fn read_layer(path: &Path) -> Result<Option<RawLessonsConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        debug!(path = %path.display(), "Loading config layer");
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let layer = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(Some(layer))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawLessonsConfig, overlay: RawLessonsConfig) -> RawLessonsConfig {
        RawLessonsConfig {
            progression: RawProgressionConfig {
                xp_per_level: overlay
                    .progression
                    .xp_per_level
                    .or(base.progression.xp_per_level),
                completion_bonus: overlay
                    .progression
                    .completion_bonus
                    .or(base.progression.completion_bonus),
                replay_xp: overlay.progression.replay_xp.or(base.progression.replay_xp),
            },
            session: RawSessionConfig {
                settle_delay_ms: overlay
                    .session
                    .settle_delay_ms
                    .or(base.session.settle_delay_ms),
                correct_settle_delay_ms: overlay
                    .session
                    .correct_settle_delay_ms
                    .or(base.session.correct_settle_delay_ms),
            },
            catalog: CatalogConfig {
                path: overlay.catalog.path.or(base.catalog.path),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawLessonsConfig) -> LessonsConfig {
        let defaults = ProgressionConfig::default();
        LessonsConfig {
            progression: ProgressionConfig {
                xp_per_level: raw.progression.xp_per_level.unwrap_or(defaults.xp_per_level),
                completion_bonus: raw
                    .progression
                    .completion_bonus
                    .unwrap_or(defaults.completion_bonus),
                replay_xp: raw.progression.replay_xp.unwrap_or(defaults.replay_xp),
            },
            session: SessionTimingConfig {
                settle_delay_ms: raw.session.settle_delay_ms.unwrap_or(DEFAULT_SETTLE_DELAY_MS),
                correct_settle_delay_ms: raw
                    .session
                    .correct_settle_delay_ms
                    .unwrap_or(DEFAULT_CORRECT_SETTLE_DELAY_MS),
            },
            catalog: raw.catalog,
        }
    }
}
