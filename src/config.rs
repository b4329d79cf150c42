use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub profiles: ProfilesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Hours per day realistically available for activities and transit.
    #[serde(default = "default_waking_hours")]
    pub waking_hours: f64,
    /// Consecutive heavy days tolerated before fatigue is penalized.
    #[serde(default = "default_fatigue_streak_days")]
    pub fatigue_streak_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizerConfig {
    #[serde(default = "default_max_tradeoffs")]
    pub max_tradeoffs: usize,
    #[serde(default = "default_strategies_enabled")]
    pub strategies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfilesConfig {
    /// Optional TOML file merged over the shipped destination baselines.
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub profiles_path: Option<String>,
    pub strategies: Option<Vec<String>>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/trip-feasibility/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.profiles_path {
            self.profiles.path = path;
        }
        if let Some(strategies) = overrides.strategies {
            self.optimizer.strategies = strategies;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_profiles_path(&self) -> Option<PathBuf> {
        let trimmed = self.profiles.path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(expand_tilde(trimmed))
        }
    }

    pub fn default_template() -> String {
        let template = r#"[scoring]
waking_hours = 10.0
fatigue_streak_days = 4

[optimizer]
max_tradeoffs = 3
strategies = ["balanced", "relaxed", "budget"]

[profiles]
# TOML file with [fallback], [[destinations]] and [[categories]] tables
# merged over the built-in baselines, e.g. ~/.config/trip-feasibility/profiles.toml
path = ""
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            optimizer: OptimizerConfig::default(),
            profiles: ProfilesConfig::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            waking_hours: default_waking_hours(),
            fatigue_streak_days: default_fatigue_streak_days(),
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_tradeoffs: default_max_tradeoffs(),
            strategies: default_strategies_enabled(),
        }
    }
}

fn default_waking_hours() -> f64 {
    10.0
}

fn default_fatigue_streak_days() -> u32 {
    4
}

fn default_max_tradeoffs() -> usize {
    3
}

fn default_strategies_enabled() -> Vec<String> {
    vec![
        "balanced".to_string(),
        "relaxed".to_string(),
        "budget".to_string(),
    ]
}
