//! Idle Grind - combat and progression core for an idle grinding game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, combat, rewards, progression)
//! - `session`: Session boundary that owns the player and drives the simulation
//! - `config`: Data-driven game balance
//! - `preferences`: Player-facing feature flags

pub mod config;
pub mod preferences;
pub mod session;
pub mod sim;

pub use config::{ConfigError, SimConfig};
pub use preferences::Preferences;
pub use session::GrindSession;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the clock will accept (longer stalls are dropped)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Progression curve
    pub const BASE_EXP_PER_LEVEL: u64 = 100;
    pub const EXP_GROWTH_EXPONENT: f64 = 2.0;

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    pub const PLAYER_ATTACK: u32 = 10;
    pub const PLAYER_ATTACK_INTERVAL: f32 = 0.5;
    /// Arrow speed (units/s)
    pub const ARROW_SPEED: f32 = 300.0;
    /// Arrow-to-target distance that counts as a hit
    pub const HIT_THRESHOLD: f32 = 10.0;

    /// Monster defaults
    pub const MONSTER_HEALTH: u32 = 50;
    pub const MONSTER_ATTACK: u32 = 5;
    pub const MONSTER_ATTACK_INTERVAL: f32 = 1.0;
    pub const SPAWN_INTERVAL: f32 = 3.0;
    pub const MIN_PER_SPAWN: u32 = 1;
    pub const MAX_PER_SPAWN: u32 = 3;
    /// Glide speed (units/s)
    pub const MONSTER_SPEED: f32 = 100.0;
    /// Monsters halt this far from the player
    pub const STOP_DISTANCE: f32 = 40.0;
    /// How far outside the visible bounds monsters appear
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Rewards
    pub const GOLD_PER_MONSTER: u32 = 10;
    pub const EXP_PER_MONSTER: u64 = 20;
    pub const COIN_COLLECT_SPEED: f32 = 1000.0;
    pub const COIN_LIFETIME: f32 = 5.0;
    pub const COIN_FADE_START_DELAY: f32 = 2.0;
    pub const COIN_FADE_DURATION: f32 = 3.0;
    /// Half the coin sprite size (30x30)
    pub const COIN_HIT_RADIUS: f32 = 15.0;

    /// Play area (player stands at the centre)
    pub const ARENA_WIDTH: f32 = 400.0;
    pub const ARENA_HEIGHT: f32 = 800.0;
}

/// Unit vector from `from` toward `to`, or zero if the points coincide
#[inline]
pub fn direction_or_zero(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Screen-space rotation of a heading (radians, 0 = +x)
#[inline]
pub fn heading_angle(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_of_coincident_points_is_zero() {
        let p = Vec2::new(12.0, -3.0);
        assert_eq!(direction_or_zero(p, p), Vec2::ZERO);
    }

    #[test]
    fn test_direction_is_unit_length() {
        let dir = direction_or_zero(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!((dir.x - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_heading_angle() {
        use std::f32::consts::FRAC_PI_2;
        assert!(heading_angle(Vec2::X).abs() < 1e-6);
        assert!((heading_angle(Vec2::Y) - FRAC_PI_2).abs() < 1e-6);
    }
}
