//! Destination baselines consumed by the scoring model.
//!
//! Baselines are configuration data: the defaults ship as a TOML table and a
//! user file can add or replace entries. Scoring code only sees the
//! [`ProfileLookup`] capability.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_PROFILES: &str = include_str!("defaults.toml");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DestinationProfile {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub daily_base_cost: f64,
    pub activity_cost: f64,
    pub sweet_spot_min: f64,
    pub sweet_spot_max: f64,
    pub max_daily_activities: u32,
    pub ideal_min_days: u32,
    pub ideal_max_days: u32,
    pub activity_hours: f64,
    pub hop_hours: f64,
    pub days_per_area: f64,
}

impl DestinationProfile {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.key
        } else {
            &self.name
        }
    }

    fn matches_destination(&self, normalized: &str, short: &str) -> bool {
        let key = self.key.to_ascii_lowercase();
        if key == normalized || key == short {
            return true;
        }
        self.aliases.iter().any(|alias| {
            let alias = alias.trim().to_ascii_lowercase();
            alias == normalized || alias == short
        })
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        let positive = [
            ("daily_base_cost", self.daily_base_cost),
            ("activity_cost", self.activity_cost),
            ("sweet_spot_min", self.sweet_spot_min),
            ("sweet_spot_max", self.sweet_spot_max),
            ("activity_hours", self.activity_hours),
            ("days_per_area", self.days_per_area),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProfileError::NonPositive {
                    key: self.key.clone(),
                    field,
                });
            }
        }
        if !self.hop_hours.is_finite() || self.hop_hours < 0.0 {
            return Err(ProfileError::NonPositive {
                key: self.key.clone(),
                field: "hop_hours",
            });
        }
        if self.sweet_spot_min > self.sweet_spot_max {
            return Err(ProfileError::InvertedRange {
                key: self.key.clone(),
                field: "sweet_spot",
            });
        }
        if self.ideal_min_days == 0 || self.ideal_min_days > self.ideal_max_days {
            return Err(ProfileError::InvertedRange {
                key: self.key.clone(),
                field: "ideal_days",
            });
        }
        if f64::from(self.max_daily_activities) < self.sweet_spot_max {
            return Err(ProfileError::InvertedRange {
                key: self.key.clone(),
                field: "max_daily_activities",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("profile {key}: {field} must be a positive number")]
    NonPositive { key: String, field: &'static str },
    #[error("profile {key}: {field} range is inverted")]
    InvertedRange { key: String, field: &'static str },
    #[error("profile table has no fallback entry")]
    MissingFallback,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSource {
    Destination,
    Category,
    Fallback,
}

impl Display for ProfileSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Destination => "destination",
            Self::Category => "category",
            Self::Fallback => "fallback",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProfile {
    pub profile: DestinationProfile,
    pub source: ProfileSource,
}

pub trait ProfileLookup: Send + Sync {
    fn resolve(&self, destination: &str, category: Option<&str>) -> ResolvedProfile;
}

/// Raw table layout shared by the shipped defaults and user profile files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileTables {
    #[serde(default)]
    pub fallback: Option<DestinationProfile>,
    #[serde(default)]
    pub destinations: Vec<DestinationProfile>,
    #[serde(default)]
    pub categories: Vec<DestinationProfile>,
}

impl ProfileTables {
    pub fn from_toml_str(data: &str) -> Result<Self> {
        let tables: Self = toml::from_str(data).context("failed parsing profile table")?;
        Ok(tables)
    }
}

#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    destinations: Vec<DestinationProfile>,
    categories: Vec<DestinationProfile>,
    fallback: DestinationProfile,
}

impl ProfileRegistry {
    pub fn with_defaults() -> Result<Self> {
        let tables = ProfileTables::from_toml_str(DEFAULT_PROFILES)?;
        Self::from_tables(tables)
    }

    pub fn from_tables(tables: ProfileTables) -> Result<Self> {
        let fallback = tables.fallback.ok_or(ProfileError::MissingFallback)?;
        let registry = Self {
            destinations: tables.destinations,
            categories: tables.categories,
            fallback,
        };
        registry.validate()?;
        Ok(registry)
    }

    /// Merges a user profile file over the current tables.
    pub fn load_extra(&mut self, path: &Path) -> Result<()> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed reading profile file: {}", path.display()))?;
        let tables = ProfileTables::from_toml_str(&data)
            .with_context(|| format!("invalid profile file: {}", path.display()))?;
        self.merge(tables);
        self.validate()
    }

    pub fn merge(&mut self, tables: ProfileTables) {
        if let Some(fallback) = tables.fallback {
            self.fallback = fallback;
        }
        upsert_all(&mut self.destinations, tables.destinations);
        upsert_all(&mut self.categories, tables.categories);
    }

    pub fn validate(&self) -> Result<()> {
        self.fallback.validate()?;
        for profile in self.destinations.iter().chain(self.categories.iter()) {
            profile.validate()?;
        }
        Ok(())
    }

    pub fn destinations(&self) -> &[DestinationProfile] {
        &self.destinations
    }

    pub fn categories(&self) -> &[DestinationProfile] {
        &self.categories
    }

    pub fn fallback(&self) -> &DestinationProfile {
        &self.fallback
    }

    pub fn by_destination(&self, destination: &str) -> Option<&DestinationProfile> {
        let normalized = destination.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return None;
        }
        let short = normalized
            .split(',')
            .next()
            .unwrap_or(normalized.as_str())
            .trim()
            .to_string();
        self.destinations
            .iter()
            .find(|p| p.matches_destination(&normalized, &short))
    }

    pub fn by_category(&self, category: &str) -> Option<&DestinationProfile> {
        let normalized = category.trim().to_ascii_lowercase();
        self.categories
            .iter()
            .find(|p| p.key.eq_ignore_ascii_case(&normalized))
    }
}

impl ProfileLookup for ProfileRegistry {
    fn resolve(&self, destination: &str, category: Option<&str>) -> ResolvedProfile {
        if let Some(profile) = self.by_destination(destination) {
            return ResolvedProfile {
                profile: profile.clone(),
                source: ProfileSource::Destination,
            };
        }
        if let Some(profile) = category.and_then(|c| self.by_category(c)) {
            return ResolvedProfile {
                profile: profile.clone(),
                source: ProfileSource::Category,
            };
        }
        ResolvedProfile {
            profile: self.fallback.clone(),
            source: ProfileSource::Fallback,
        }
    }
}

fn upsert_all(target: &mut Vec<DestinationProfile>, incoming: Vec<DestinationProfile>) {
    for profile in incoming {
        match target
            .iter_mut()
            .find(|existing| existing.key.eq_ignore_ascii_case(&profile.key))
        {
            Some(existing) => *existing = profile,
            None => target.push(profile),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}
