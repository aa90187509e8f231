//! Player stats and the leveling curve

use serde::{Deserialize, Serialize};

use crate::config::{ProgressionTuning, SimConfig};
use crate::preferences::Preferences;

/// EXP needed to clear `level`: `floor(level^growth_exponent * base_exp_per_level)`.
///
/// Never less than 1, so a level-up loop always consumes experience.
pub fn exp_required(level: u32, curve: &ProgressionTuning) -> u64 {
    let raw = (level as f64).powf(curve.growth_exponent) * curve.base_exp_per_level as f64;
    // Float-to-int casts saturate
    (raw.floor() as u64).max(1)
}

/// The single player owned by the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub health: u32,
    pub max_health: u32,
    pub attack_power: u32,
    pub gold: u64,
    pub experience: u64,
    pub level: u32,
    pub preferences: Preferences,
    curve: ProgressionTuning,
}

impl Player {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            health: config.player.max_health,
            max_health: config.player.max_health,
            attack_power: config.player.attack_power,
            gold: 0,
            experience: 0,
            level: 1,
            preferences: Preferences::default(),
            curve: config.progression,
        }
    }

    /// EXP needed for the next level-up
    pub fn exp_required(&self) -> u64 {
        exp_required(self.level, &self.curve)
    }

    /// Add EXP and roll over into as many levels as it covers.
    ///
    /// Returns the number of levels gained.
    pub fn add_experience(&mut self, amount: u64) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        loop {
            let needed = self.exp_required();
            if self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level = self.level.saturating_add(1);
            gained += 1;
            if self.level == u32::MAX {
                // Curve is flat at the top; clamp instead of spinning
                self.experience = self.experience.min(needed.saturating_sub(1));
                break;
            }
        }
        if gained > 0 {
            log::info!("Level up! Now level {} (+{})", self.level, gained);
        }
        gained
    }

    pub fn add_gold(&mut self, amount: u64) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Subtract health (clamped at 0); returns true when the player is dead
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.health == 0
    }

    /// Refill health between grinding sessions
    pub fn reset_health(&mut self) {
        self.health = self.max_health;
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> Player {
        Player::new(&SimConfig::default())
    }

    #[test]
    fn test_default_curve() {
        let curve = ProgressionTuning::default();
        assert_eq!(exp_required(1, &curve), 100);
        assert_eq!(exp_required(2, &curve), 400);
        assert_eq!(exp_required(3, &curve), 900);
    }

    #[test]
    fn test_single_level_up() {
        let mut p = player();
        assert_eq!(p.add_experience(99), 0);
        assert_eq!(p.level, 1);
        assert_eq!(p.add_experience(1), 1);
        assert_eq!(p.level, 2);
        assert_eq!(p.experience, 0);
    }

    #[test]
    fn test_multi_level_gain_in_one_grant() {
        let mut p = player();
        // 100 (L1) + 400 (L2) + 900 (L3) = 1400, plus 5 spare
        assert_eq!(p.add_experience(1405), 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.experience, 5);
    }

    #[test]
    fn test_gold_accumulates() {
        let mut p = player();
        p.add_gold(10);
        p.add_gold(25);
        assert_eq!(p.gold, 35);
    }

    #[test]
    fn test_damage_and_reset() {
        let mut p = player();
        assert!(!p.apply_damage(30));
        assert_eq!(p.health, 70);
        assert!(p.apply_damage(1000));
        assert_eq!(p.health, 0);
        assert!(p.is_dead());
        p.reset_health();
        assert_eq!(p.health, p.max_health);
    }

    #[test]
    fn test_tiny_curve_still_terminates() {
        let config = SimConfig {
            progression: ProgressionTuning {
                base_exp_per_level: 1,
                growth_exponent: 0.01,
            },
            ..SimConfig::default()
        };
        let mut p = Player::new(&config);
        let gained = p.add_experience(50);
        assert!(gained > 0);
        assert!(p.experience < p.exp_required());
    }

    proptest! {
        #[test]
        fn prop_exp_required_strictly_increasing(
            level in 1u32..500,
            exponent in 1.0f64..3.0,
            base in 1u64..1000,
        ) {
            let curve = ProgressionTuning { base_exp_per_level: base, growth_exponent: exponent };
            prop_assert!(exp_required(level + 1, &curve) > exp_required(level, &curve));
        }

        #[test]
        fn prop_experience_stays_below_threshold(
            grants in prop::collection::vec(0u64..5_000, 1..40)
        ) {
            let mut p = player();
            for amount in grants {
                let before = p.level;
                p.add_experience(amount);
                prop_assert!(p.level >= before);
                prop_assert!(p.experience < p.exp_required());
            }
        }

        #[test]
        fn prop_damage_clamps(health in 1u32..500, damage in 0u32..1000) {
            let mut p = player();
            p.max_health = health;
            p.health = health;
            let dead = p.apply_damage(damage);
            if damage >= health {
                prop_assert_eq!(p.health, 0);
                prop_assert!(dead);
            } else {
                prop_assert_eq!(p.health, health - damage);
                prop_assert!(!dead);
            }
        }
    }
}
