use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    pub search: SearchConfig,
    pub ephemeris: EphemerisConfig,
}

impl CalendarConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CalendarConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;
        self.ephemeris.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// How far before the month's first quarter the preceding-quarter search starts.
    pub preceding_backstep_days: f64,
    /// Backward search window for the preceding quarter.
    pub preceding_window_days: f64,
    /// Offset after a quarter from which the next one is searched.
    pub quarter_stride_days: f64,
    pub max_quarters_per_month: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            preceding_backstep_days: 6.0,
            preceding_window_days: 10.0,
            quarter_stride_days: 6.0,
            max_quarters_per_month: 8,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Quarters are at least ~6.5 days apart; a longer stride could skip one.
        if !(self.quarter_stride_days > 0.0 && self.quarter_stride_days <= 6.5) {
            return Err(ConfigError::Invalid(
                "quarter_stride_days must be in (0, 6.5]",
            ));
        }
        if !(self.preceding_backstep_days >= 0.0 && self.preceding_backstep_days <= 6.5) {
            return Err(ConfigError::Invalid(
                "preceding_backstep_days must be in [0, 6.5]",
            ));
        }
        if !(self.preceding_window_days > 0.0) {
            return Err(ConfigError::Invalid("preceding_window_days must be positive"));
        }
        if self.max_quarters_per_month < 6 {
            return Err(ConfigError::Invalid("max_quarters_per_month must be >= 6"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EphemerisConfig {
    pub scan_step_days: f64,
    pub quarter_window_days: f64,
    /// Bisection stops once the bracket is narrower than this.
    pub convergence_seconds: f64,
    pub max_iterations: usize,
    /// Coarse scan step for meridian transit searches.
    pub transit_step_hours: f64,
    pub transit_window_days: f64,
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            scan_step_days: 0.5,
            quarter_window_days: 10.0,
            convergence_seconds: 1.0,
            max_iterations: 60,
            transit_step_hours: 1.0,
            transit_window_days: 1.5,
        }
    }
}

impl EphemerisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // The Moon gains ~15°/day at most on the Sun; keep samples well inside
        // the ±90° band the crossing test relies on.
        if !(self.scan_step_days > 0.0 && self.scan_step_days <= 2.0) {
            return Err(ConfigError::Invalid("scan_step_days must be in (0, 2]"));
        }
        if !(self.quarter_window_days >= 8.5) {
            return Err(ConfigError::Invalid("quarter_window_days must be >= 8.5"));
        }
        if !(self.convergence_seconds > 0.0) {
            return Err(ConfigError::Invalid("convergence_seconds must be positive"));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be >= 1"));
        }
        if !(self.transit_step_hours > 0.0 && self.transit_step_hours <= 6.0) {
            return Err(ConfigError::Invalid("transit_step_hours must be in (0, 6]"));
        }
        if !(self.transit_window_days >= 1.1) {
            return Err(ConfigError::Invalid("transit_window_days must be >= 1.1"));
        }
        Ok(())
    }
}
