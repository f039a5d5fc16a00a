use std::path::PathBuf;
use std::time::Duration;

use lessons_core::{DEFAULT_XP_PER_LEVEL, ProgressionStore, SessionConfig};
use serde::{Deserialize, Serialize};

/// Settle delay after an incorrect answer
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 700;

/// Settle delay after a correct answer
pub const DEFAULT_CORRECT_SETTLE_DELAY_MS: u64 = 800;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawLessonsConfig {
    #[serde(default)]
    pub progression: RawProgressionConfig,

    #[serde(default)]
    pub session: RawSessionConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Progression config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawProgressionConfig {
    pub xp_per_level: Option<u64>,
    pub completion_bonus: Option<u64>,
    pub replay_xp: Option<bool>,
}

/// Session config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawSessionConfig {
    pub settle_delay_ms: Option<u64>,
    pub correct_settle_delay_ms: Option<u64>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LessonsConfig {
    #[serde(default)]
    pub progression: ProgressionConfig,

    #[serde(default)]
    pub session: SessionTimingConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl LessonsConfig {
    /// Fresh progression store sized by `xp_per_level`
    pub fn progression_store(&self) -> ProgressionStore {
        ProgressionStore::with_xp_per_level(self.progression.xp_per_level)
    }

    /// Settings for the session manager
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            settle_delay: Duration::from_millis(self.session.settle_delay_ms),
            correct_settle_delay: Duration::from_millis(self.session.correct_settle_delay_ms),
            completion_bonus: self.progression.completion_bonus,
            replay_xp: self.progression.replay_xp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// XP needed per level (0 falls back to the default)
    pub xp_per_level: u64,

    /// XP granted the first time a lesson is completed
    pub completion_bonus: u64,

    /// Award exercise XP again when replaying a completed lesson
    pub replay_xp: bool,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            xp_per_level: DEFAULT_XP_PER_LEVEL,
            completion_bonus: 0,
            replay_xp: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTimingConfig {
    /// How long feedback for an incorrect answer is shown
    pub settle_delay_ms: u64,

    /// How long feedback for a correct answer is shown
    pub correct_settle_delay_ms: u64,
}

impl Default for SessionTimingConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            correct_settle_delay_ms: DEFAULT_CORRECT_SETTLE_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Lesson catalog file
    pub path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = LessonsConfig::default();
        assert_eq!(config.progression.xp_per_level, 100);
        assert_eq!(config.progression.completion_bonus, 0);
        assert!(!config.progression.replay_xp);
        assert_eq!(config.session.settle_delay_ms, 700);
        assert_eq!(config.session.correct_settle_delay_ms, 800);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = LessonsConfig {
            progression: ProgressionConfig {
                xp_per_level: 250,
                completion_bonus: 20,
                replay_xp: true,
            },
            session: SessionTimingConfig {
                settle_delay_ms: 100,
                correct_settle_delay_ms: 200,
            },
            catalog: CatalogConfig {
                path: Some(PathBuf::from("/tmp/lessons.json")),
            },
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: LessonsConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.progression.xp_per_level, 250);
        assert_eq!(parsed.progression.completion_bonus, 20);
        assert!(parsed.progression.replay_xp);
        assert_eq!(parsed.session.correct_settle_delay_ms, 200);
        assert_eq!(parsed.catalog.path, Some(PathBuf::from("/tmp/lessons.json")));
    }

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[progression]
completion_bonus = 5
"#;
        let raw: RawLessonsConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(raw.progression.completion_bonus, Some(5));
        assert!(raw.progression.xp_per_level.is_none());
        assert!(raw.progression.replay_xp.is_none());
        assert!(raw.session.settle_delay_ms.is_none());
    }

    #[test]
    fn test_raw_config_empty_uses_none() {
        let raw: RawLessonsConfig = toml::from_str("").unwrap();

        assert!(raw.progression.xp_per_level.is_none());
        assert!(raw.session.correct_settle_delay_ms.is_none());
        assert!(raw.catalog.path.is_none());
    }

    #[test]
    fn test_session_config_conversion() {
        let mut config = LessonsConfig::default();
        config.session.settle_delay_ms = 10;
        config.progression.completion_bonus = 15;

        let session = config.session_config();

        assert_eq!(session.settle_delay, Duration::from_millis(10));
        assert_eq!(session.correct_settle_delay, Duration::from_millis(800));
        assert_eq!(session.completion_bonus, 15);
        assert!(!session.replay_xp);
    }

    #[test]
    fn test_zero_xp_per_level_falls_back() {
        let mut config = LessonsConfig::default();
        config.progression.xp_per_level = 0;

        assert_eq!(config.progression_store().xp_per_level(), DEFAULT_XP_PER_LEVEL);
    }
}
