use crate::calculations::{
    BoundaryPolicy, ConflictDetector, ConflictScan, DEFAULT_AVAILABLE_HOURS, UtilizationCalculator,
};
use crate::calendar::WeekNavigator;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const ENV_AVAILABLE_HOURS: &str = "RESOURCE_SCHEDULE_AVAILABLE_HOURS";
pub const ENV_WEEK_START: &str = "RESOURCE_SCHEDULE_WEEK_START";
pub const ENV_CONFLICT_SCAN: &str = "RESOURCE_SCHEDULE_CONFLICT_SCAN";
pub const ENV_BOUNDARY_POLICY: &str = "RESOURCE_SCHEDULE_BOUNDARY_POLICY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for utilization, conflict detection and week navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingConfig {
    pub available_hours: f64,
    pub week_start: Weekday,
    pub conflict_scan: ConflictScan,
    pub boundary_policy: BoundaryPolicy,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            available_hours: DEFAULT_AVAILABLE_HOURS,
            week_start: Weekday::Sun,
            conflict_scan: ConflictScan::AdjacentPairs,
            boundary_policy: BoundaryPolicy::SharedDayAllowed,
        }
    }
}

impl SchedulingConfig {
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Defaults overlaid with `RESOURCE_SCHEDULE_*` environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_env_overrides()
    }

    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup; unset keys keep their value.
    pub fn with_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_AVAILABLE_HOURS) {
            self.available_hours = parse_override(ENV_AVAILABLE_HOURS, raw)?;
        }
        if let Some(raw) = lookup(ENV_WEEK_START) {
            self.week_start = parse_override::<Weekday>(ENV_WEEK_START, raw)?;
        }
        if let Some(raw) = lookup(ENV_CONFLICT_SCAN) {
            self.conflict_scan = match raw.trim().to_ascii_lowercase().as_str() {
                "adjacent_pairs" | "adjacent" => ConflictScan::AdjacentPairs,
                "all_pairs" | "all" => ConflictScan::AllPairs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_CONFLICT_SCAN,
                        value: raw,
                    });
                }
            };
        }
        if let Some(raw) = lookup(ENV_BOUNDARY_POLICY) {
            self.boundary_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "shared_day_allowed" => BoundaryPolicy::SharedDayAllowed,
                "shared_day_conflicts" => BoundaryPolicy::SharedDayConflicts,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_BOUNDARY_POLICY,
                        value: raw,
                    });
                }
            };
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> ConfigResult<()> {
        if !self.available_hours.is_finite() || self.available_hours <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "available_hours",
                value: self.available_hours.to_string(),
            });
        }
        Ok(())
    }

    pub fn utilization_calculator(&self) -> UtilizationCalculator {
        UtilizationCalculator::new(self.available_hours)
    }

    pub fn conflict_detector(&self) -> ConflictDetector {
        ConflictDetector::new(self.conflict_scan, self.boundary_policy)
    }

    pub fn week_navigator(&self) -> WeekNavigator {
        WeekNavigator::new(self.week_start)
    }
}

fn parse_override<T: FromStr>(key: &'static str, raw: String) -> ConfigResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue { key, value: raw })
}
