//! Entity types and simulation events
//!
//! Enemies, projectiles and coins are transient: they live only inside the
//! running simulation and are referenced by id, never by pointer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::timer::RepeatingTimer;
use crate::config::RewardTuning;

/// Identity of an enemy in the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u32);

/// Enemy lifecycle. There is no way back to `Approaching`.
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyState {
    /// Gliding in a straight line toward its stand-off point
    Approaching {
        from: Vec2,
        to: Vec2,
        elapsed: f32,
        duration: f32,
    },
    /// Parked at the stand-off point, hitting the player on a timer
    Attacking { melee: RepeatingTimer },
    /// Health reached zero; removed from the active set in the same step
    Dead,
}

/// A single monster
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub state: EnemyState,
}

impl Enemy {
    /// New enemy at `from`, gliding to `to` at `speed` units/s
    pub fn new(id: EnemyId, from: Vec2, to: Vec2, speed: f32, max_health: u32) -> Self {
        let distance = from.distance(to);
        let duration = if speed > 0.0 { distance / speed } else { 0.0 };
        Self {
            id,
            pos: from,
            health: max_health,
            max_health,
            state: EnemyState::Approaching {
                from,
                to,
                elapsed: 0.0,
                duration,
            },
        }
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.state, EnemyState::Dead)
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.state, EnemyState::Attacking { .. })
    }

    /// Subtract health (clamped at 0); returns true on a lethal hit
    pub fn apply_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.state = EnemyState::Dead;
            true
        } else {
            false
        }
    }

    /// Health bar fill (0-1)
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }

    /// Advance the glide or the melee timer; returns melee hits landed this step
    pub fn advance(&mut self, dt: f32, melee_interval: f32) -> u32 {
        match &mut self.state {
            EnemyState::Approaching {
                from,
                to,
                elapsed,
                duration,
            } => {
                *elapsed += dt.max(0.0);
                if *elapsed >= *duration {
                    // Arrived: park exactly on the stand-off point
                    self.pos = *to;
                    self.state = EnemyState::Attacking {
                        melee: RepeatingTimer::new(melee_interval),
                    };
                } else {
                    let t = *elapsed / *duration;
                    self.pos = from.lerp(*to, t);
                }
                0
            }
            EnemyState::Attacking { melee } => melee.tick(dt),
            EnemyState::Dead => 0,
        }
    }
}

/// An arrow flying in a straight line
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec2,
    /// Fixed at launch
    pub vel: Vec2,
    /// Weak binding; a missing id means the target is gone
    pub target: EnemyId,
}

impl Projectile {
    pub fn step(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Rotation for drawing the arrow
    pub fn rotation(&self) -> f32 {
        crate::heading_angle(self.vel)
    }
}

/// Coin lifecycle. `Consumed` coins are removed in the step they consume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenState {
    Idle,
    /// Flying to the player; decay is cancelled
    Collecting { from: Vec2, elapsed: f32, duration: f32 },
    Consumed,
}

/// A gold coin dropped by a dead enemy
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyToken {
    pub id: TokenId,
    pub pos: Vec2,
    pub value: u32,
    /// Seconds since the drop
    pub age: f32,
    pub state: TokenState,
}

impl CurrencyToken {
    pub fn is_idle(&self) -> bool {
        matches!(self.state, TokenState::Idle)
    }

    pub fn is_collecting(&self) -> bool {
        matches!(self.state, TokenState::Collecting { .. })
    }

    /// Draw alpha: 1 until the fade starts, then linear down to 0 at expiry
    pub fn opacity(&self, tuning: &RewardTuning) -> f32 {
        if !self.is_idle() {
            return 1.0;
        }
        let expiry = tuning.expiry();
        let fade_start = tuning.fade_start_delay.min(expiry);
        if self.age <= fade_start {
            return 1.0;
        }
        let fade_len = expiry - fade_start;
        if fade_len <= 0.0 {
            return 0.0;
        }
        (1.0 - (self.age - fade_start) / fade_len).clamp(0.0, 1.0)
    }
}

/// Side effects reported to the host, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    WaveSpawned { count: u32 },
    ShotFired { projectile: ProjectileId, target: EnemyId },
    EnemyDamaged { enemy: EnemyId, amount: u32, lethal: bool },
    /// Floating "-damage" over a surviving monster
    EnemyDamageLabel { enemy: EnemyId, amount: u32, pos: Vec2 },
    PlayerDamaged { amount: u32, dead: bool },
    /// Floating "-damage" over the player
    PlayerDamageLabel { amount: u32 },
    PlayerDefeated,
    ExperienceAdded { amount: u64 },
    LeveledUp { level: u32, gained: u32 },
    CoinDropped { token: TokenId, pos: Vec2, value: u32 },
    CoinExpired { token: TokenId },
    CurrencyCollected { token: TokenId, amount: u32 },
    /// Floating "+value" over the player
    GoldLabel { amount: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_glides_then_attacks() {
        let mut enemy = Enemy::new(EnemyId(1), Vec2::ZERO, Vec2::new(100.0, 0.0), 100.0, 50);
        assert_eq!(enemy.advance(0.5, 1.0), 0);
        assert!((enemy.pos.x - 50.0).abs() < 1e-3);
        assert!(!enemy.is_attacking());

        assert_eq!(enemy.advance(0.5, 1.0), 0);
        assert!(enemy.is_attacking());
        assert_eq!(enemy.pos, Vec2::new(100.0, 0.0));

        // First melee hit lands one interval after arrival
        assert_eq!(enemy.advance(0.9, 1.0), 0);
        assert_eq!(enemy.advance(0.1, 1.0), 1);
    }

    #[test]
    fn test_negative_dt_never_reverses_glide() {
        let mut enemy = Enemy::new(EnemyId(1), Vec2::ZERO, Vec2::new(100.0, 0.0), 100.0, 50);
        enemy.advance(0.5, 1.0);
        enemy.advance(-0.4, 1.0);
        assert!((enemy.pos.x - 50.0).abs() < 1e-3);
        assert!(matches!(enemy.state, EnemyState::Approaching { elapsed, .. } if elapsed == 0.5));
    }

    #[test]
    fn test_zero_length_glide_arrives_immediately() {
        let p = Vec2::new(5.0, 5.0);
        let mut enemy = Enemy::new(EnemyId(1), p, p, 100.0, 50);
        enemy.advance(0.0, 1.0);
        assert!(enemy.is_attacking());
        assert_eq!(enemy.pos, p);
    }

    #[test]
    fn test_enemy_damage_clamps_and_kills() {
        let mut enemy = Enemy::new(EnemyId(1), Vec2::ZERO, Vec2::ZERO, 100.0, 50);
        assert!(!enemy.apply_damage(20));
        assert_eq!(enemy.health, 30);
        assert!((enemy.health_fraction() - 0.6).abs() < 1e-6);
        assert!(enemy.apply_damage(500));
        assert_eq!(enemy.health, 0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_token_opacity_fades_to_expiry() {
        let tuning = RewardTuning::default();
        let mut token = CurrencyToken {
            id: TokenId(1),
            pos: Vec2::ZERO,
            value: 10,
            age: 1.0,
            state: TokenState::Idle,
        };
        assert_eq!(token.opacity(&tuning), 1.0);
        token.age = 3.5;
        assert!((token.opacity(&tuning) - 0.5).abs() < 1e-5);
        token.age = 5.0;
        assert_eq!(token.opacity(&tuning), 0.0);
    }
}
