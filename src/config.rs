use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::achievements::CompletionPolicy;
use crate::engine::activity::ActivityThresholds;
use crate::engine::bands::{BandError, BandTable};
use crate::engine::level::{LevelTier, SkillTier, XpAwards};
use crate::engine::quiz::{DEFAULT_CELEBRATION_PERCENTAGE, QuizGrade};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {table} table: {source}")]
    InvalidBands {
        table: &'static str,
        #[source]
        source: BandError,
    },

    #[error("activity thresholds overlap: high needs {high} minutes but medium needs {medium}")]
    InvalidActivityThresholds { high: u32, medium: u32 },

    #[error("celebration threshold {0} is above 100%")]
    InvalidCelebration(u32),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub completion_policy: CompletionPolicy,
    #[serde(default = "default_celebration_percentage")]
    pub celebration_percentage: u32,
    #[serde(default = "default_monthly_book_goal")]
    pub monthly_book_goal: u32,
    #[serde(default)]
    pub activity: ActivityThresholds,
    #[serde(default)]
    pub xp_awards: XpAwards,
    #[serde(default = "QuizGrade::defaults")]
    pub quiz_grades: Vec<QuizGrade>,
    #[serde(default = "SkillTier::defaults")]
    pub skill_tiers: Vec<SkillTier>,
    #[serde(default = "LevelTier::defaults")]
    pub level_tiers: Vec<LevelTier>,
}

fn default_celebration_percentage() -> u32 {
    DEFAULT_CELEBRATION_PERCENTAGE
}
fn default_monthly_book_goal() -> u32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            completion_policy: CompletionPolicy::default(),
            celebration_percentage: default_celebration_percentage(),
            monthly_book_goal: default_monthly_book_goal(),
            activity: ActivityThresholds::default(),
            xp_awards: XpAwards::default(),
            quiz_grades: QuizGrade::defaults(),
            skill_tiers: SkillTier::defaults(),
            level_tiers: LevelTier::defaults(),
        }
    }
}

/// Validated lookup tables built from a [`Config`].
#[derive(Clone, Debug)]
pub struct Thresholds {
    pub quiz_grades: BandTable<QuizGrade>,
    pub skill_tiers: BandTable<SkillTier>,
    pub level_tiers: BandTable<LevelTier>,
    pub activity: ActivityThresholds,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!("loaded config from {}", path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("readwise")
            .join("config.toml")
    }

    /// Check every table and build the lookup structures the engine uses.
    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        let quiz_grades = BandTable::new(self.quiz_grades.clone()).map_err(|source| {
            ConfigError::InvalidBands {
                table: "quiz_grades",
                source,
            }
        })?;
        let skill_tiers = BandTable::new(self.skill_tiers.clone()).map_err(|source| {
            ConfigError::InvalidBands {
                table: "skill_tiers",
                source,
            }
        })?;
        let level_tiers = BandTable::new(self.level_tiers.clone()).map_err(|source| {
            ConfigError::InvalidBands {
                table: "level_tiers",
                source,
            }
        })?;

        if self.activity.high_minutes < self.activity.medium_minutes {
            return Err(ConfigError::InvalidActivityThresholds {
                high: self.activity.high_minutes,
                medium: self.activity.medium_minutes,
            });
        }
        if self.celebration_percentage > 100 {
            return Err(ConfigError::InvalidCelebration(self.celebration_percentage));
        }

        Ok(Thresholds {
            quiz_grades,
            skill_tiers,
            level_tiers,
            activity: self.activity,
        })
    }
}
