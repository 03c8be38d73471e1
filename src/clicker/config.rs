//! Tunables for the Card Clicker engine.
//!
//! Defaults are the reference economy. A host may override any subset from
//! JSON; fields that are left out keep their default.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Each owned unit of a type multiplies the next one's price by this.
    pub cost_growth: f64,
    /// Global payout multiplier applied to every activation.
    pub base_multiplier: f64,
    /// Seconds a unit is immune to the agent after being hit.
    pub cooldown_secs: f64,
    /// Agent edge length before any size upgrade (px).
    pub agent_size: f64,
    /// Purchased units spawn in `[origin, origin + spread)` on each axis.
    pub spawn_origin: (f64, f64),
    pub spawn_spread: f64,
    pub starter_position: (f64, f64),
    /// Unit card size (px), used for clamping and default collision boxes.
    pub card_width: f64,
    pub card_height: f64,
    /// Longest frame delta (seconds) fed into one tick.
    pub max_frame_delta: f64,
    /// Seconds of play between automatic saves.
    pub autosave_secs: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cost_growth: 1.15,
            base_multiplier: 1.0,
            cooldown_secs: 0.5,
            agent_size: 40.0,
            spawn_origin: (50.0, 50.0),
            spawn_spread: 200.0,
            starter_position: (100.0, 100.0),
            card_width: 140.0,
            card_height: 80.0,
            max_frame_delta: 0.5,
            autosave_secs: 30.0,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("cost_growth", self.cost_growth),
            ("base_multiplier", self.base_multiplier),
            ("cooldown_secs", self.cooldown_secs),
            ("agent_size", self.agent_size),
            ("card_width", self.card_width),
            ("card_height", self.card_height),
            ("max_frame_delta", self.max_frame_delta),
            ("autosave_secs", self.autosave_secs),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if !(self.spawn_spread.is_finite() && self.spawn_spread >= 0.0) {
            return Err(ConfigError::NotPositive {
                field: "spawn_spread",
                value: self.spawn_spread,
            });
        }
        Ok(())
    }
}
