//! Simulation Configuration
//!
//! Tunables for the aura timer and the motion controller. Every field has a
//! default matching the live server, so a partial JSON document is enough
//! to override a single value.

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::{DEFAULT_AURA_PERIOD_MS, DEFAULT_WALK_SPEED, TICK_RATE};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Document could not be parsed.
    #[error("invalid config document: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is outside its accepted range.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Offending field path
        field: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
}

/// Aura timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraConfig {
    /// Period assigned to periodic aura kinds loaded with a period of 0.
    pub default_period_ms: u32,
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            default_period_ms: DEFAULT_AURA_PERIOD_MS,
        }
    }
}

/// Motion controller configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Extra path time (seconds) on flight paths, so the rider does not
    /// dismount the instant the last point is reached.
    pub flight_arrival_slack_secs: f32,
    /// Speed used by random wandering when the caller gives none.
    pub default_walk_speed: f32,
    /// Maximum height change accepted for a random wander destination.
    pub random_move_max_z_delta: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            flight_arrival_slack_secs: 1.0,
            default_walk_speed: DEFAULT_WALK_SPEED,
            random_move_max_z_delta: 1.5,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frame rate of the driving loop (Hz).
    pub tick_rate: u32,
    /// Aura timer settings.
    pub aura: AuraConfig,
    /// Motion controller settings.
    pub motion: MotionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            aura: AuraConfig::default(),
            motion: MotionConfig::default(),
        }
    }
}

impl SimConfig {
    /// Config with the server defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON document.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tick_rate",
                reason: "must be positive",
            });
        }
        if self.aura.default_period_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "aura.default_period_ms",
                reason: "must be positive",
            });
        }
        if self.motion.flight_arrival_slack_secs < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "motion.flight_arrival_slack_secs",
                reason: "must not be negative",
            });
        }
        if self.motion.default_walk_speed <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "motion.default_walk_speed",
                reason: "must be positive",
            });
        }
        if self.motion.random_move_max_z_delta < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "motion.random_move_max_z_delta",
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// Duration of one frame of the driving loop, in seconds.
    pub fn frame_secs(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }
}
