//! Simulation tuning
//!
//! Every balance knob lives in one immutable [`SimConfig`] handed to the
//! simulation at construction. JSON overrides are partial: missing fields fall
//! back to the defaults in [`crate::consts`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a [`SimConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("min_per_spawn ({min}) must not exceed max_per_spawn ({max})")]
    SpawnRange { min: u32, max: u32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("base_exp_per_level must be at least 1")]
    ZeroBaseExp,
}

/// Leveling curve: `floor(level^growth_exponent * base_exp_per_level)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub base_exp_per_level: u64,
    pub growth_exponent: f64,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            base_exp_per_level: BASE_EXP_PER_LEVEL,
            growth_exponent: EXP_GROWTH_EXPONENT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: u32,
    pub attack_power: u32,
    /// Seconds between shots
    pub attack_interval: f32,
    pub arrow_speed: f32,
    pub hit_threshold: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            attack_power: PLAYER_ATTACK,
            attack_interval: PLAYER_ATTACK_INTERVAL,
            arrow_speed: ARROW_SPEED,
            hit_threshold: HIT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub max_health: u32,
    /// Melee damage per hit on the player
    pub attack: u32,
    /// Seconds between melee hits
    pub attack_interval: f32,
    /// Seconds between waves
    pub spawn_interval: f32,
    pub min_per_spawn: u32,
    pub max_per_spawn: u32,
    pub speed: f32,
    pub stop_distance: f32,
    pub spawn_margin: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            max_health: MONSTER_HEALTH,
            attack: MONSTER_ATTACK,
            attack_interval: MONSTER_ATTACK_INTERVAL,
            spawn_interval: SPAWN_INTERVAL,
            min_per_spawn: MIN_PER_SPAWN,
            max_per_spawn: MAX_PER_SPAWN,
            speed: MONSTER_SPEED,
            stop_distance: STOP_DISTANCE,
            spawn_margin: SPAWN_MARGIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardTuning {
    pub gold_per_monster: u32,
    pub exp_per_monster: u64,
    pub coin_collect_speed: f32,
    /// Hard cap on an uncollected coin's life
    pub coin_lifetime: f32,
    pub fade_start_delay: f32,
    pub fade_duration: f32,
    pub coin_hit_radius: f32,
}

impl Default for RewardTuning {
    fn default() -> Self {
        Self {
            gold_per_monster: GOLD_PER_MONSTER,
            exp_per_monster: EXP_PER_MONSTER,
            coin_collect_speed: COIN_COLLECT_SPEED,
            coin_lifetime: COIN_LIFETIME,
            fade_start_delay: COIN_FADE_START_DELAY,
            fade_duration: COIN_FADE_DURATION,
            coin_hit_radius: COIN_HIT_RADIUS,
        }
    }
}

impl RewardTuning {
    /// Age at which an untouched coin is consumed.
    ///
    /// The fade schedule and the lifetime cap can disagree; the earlier one wins.
    pub fn expiry(&self) -> f32 {
        (self.fade_start_delay + self.fade_duration).min(self.coin_lifetime)
    }
}

/// Visible play area; origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the spawn RNG
    pub seed: u64,
    pub progression: ProgressionTuning,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub reward: RewardTuning,
    pub arena: ArenaTuning,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            progression: ProgressionTuning::default(),
            player: PlayerTuning::default(),
            enemy: EnemyTuning::default(),
            reward: RewardTuning::default(),
            arena: ArenaTuning::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject tunables that would stall or break the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enemy.min_per_spawn > self.enemy.max_per_spawn {
            return Err(ConfigError::SpawnRange {
                min: self.enemy.min_per_spawn,
                max: self.enemy.max_per_spawn,
            });
        }
        if self.progression.base_exp_per_level == 0 {
            return Err(ConfigError::ZeroBaseExp);
        }

        let positive: [(&'static str, f64); 11] = [
            ("growth_exponent", self.progression.growth_exponent),
            ("player.attack_interval", self.player.attack_interval as f64),
            ("player.arrow_speed", self.player.arrow_speed as f64),
            ("player.max_health", self.player.max_health as f64),
            ("enemy.attack_interval", self.enemy.attack_interval as f64),
            ("enemy.spawn_interval", self.enemy.spawn_interval as f64),
            ("enemy.speed", self.enemy.speed as f64),
            ("enemy.max_health", self.enemy.max_health as f64),
            ("reward.coin_collect_speed", self.reward.coin_collect_speed as f64),
            ("arena.width", self.arena.width as f64),
            ("arena.height", self.arena.height as f64),
        ];
        for (field, value) in positive {
            // NaN fails this too
            if !(value > 0.0) {
                log::warn!("Rejecting config: {} = {}", field, value);
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_override() {
        let json = r#"{"enemy": {"max_per_spawn": 5}, "seed": 7}"#;
        let config = SimConfig::from_json_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.enemy.max_per_spawn, 5);
        assert_eq!(config.enemy.min_per_spawn, MIN_PER_SPAWN);
        assert_eq!(config.player.attack_power, PLAYER_ATTACK);
    }

    #[test]
    fn test_inverted_spawn_range_rejected() {
        let err = SimConfig::from_json_str(r#"{"enemy": {"min_per_spawn": 4, "max_per_spawn": 2}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::SpawnRange { min: 4, max: 2 }));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = SimConfig::default();
        config.enemy.spawn_interval = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotPositive {
                field: "enemy.spawn_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = SimConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_coin_expiry_shorter_cutoff_wins() {
        let reward = RewardTuning::default();
        assert!((reward.expiry() - 5.0).abs() < 1e-6);

        let short_cap = RewardTuning {
            coin_lifetime: 3.0,
            ..RewardTuning::default()
        };
        assert!((short_cap.expiry() - 3.0).abs() < 1e-6);

        let short_fade = RewardTuning {
            fade_start_delay: 1.0,
            fade_duration: 1.5,
            ..RewardTuning::default()
        };
        assert!((short_fade.expiry() - 2.5).abs() < 1e-6);
    }
}
