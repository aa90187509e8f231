//! Wave spawning
//!
//! A repeating timer produces waves of 1..N monsters at random screen edges.
//! Each monster glides straight at the player and parks `stop_distance` short.

use glam::Vec2;
use rand::Rng;

use super::collision::{Edge, spawn_point, stand_off_point};
use super::state::{Enemy, EnemyId};
use super::timer::RepeatingTimer;
use crate::config::{ArenaTuning, EnemyTuning};

#[derive(Debug, Clone)]
pub struct SpawnController {
    timer: RepeatingTimer,
    tuning: EnemyTuning,
    arena: ArenaTuning,
}

impl SpawnController {
    pub fn new(tuning: EnemyTuning, arena: ArenaTuning) -> Self {
        Self {
            timer: RepeatingTimer::new(tuning.spawn_interval),
            tuning,
            arena,
        }
    }

    /// Advance the wave timer; returns how many waves are due
    pub fn tick(&mut self, dt: f32) -> u32 {
        self.timer.tick(dt)
    }

    /// Invalidate the pending wave; the next one is a full interval away
    pub fn reset(&mut self) {
        self.timer.reset();
    }

    /// Seconds until the next wave
    pub fn next_wave_in(&self) -> f32 {
        self.timer.remaining()
    }

    /// Monsters in one wave, uniform in `[min_per_spawn, max_per_spawn]`
    pub fn wave_size<R: Rng>(&self, rng: &mut R) -> u32 {
        let min = self.tuning.min_per_spawn;
        let max = self.tuning.max_per_spawn.max(min);
        rng.random_range(min..=max)
    }

    /// New monster at a random edge, headed for its stand-off point
    pub fn spawn_enemy<R: Rng>(&self, rng: &mut R, id: EnemyId, player: Vec2) -> Enemy {
        let edge = Edge::random(rng);
        let from = spawn_point(rng, edge, &self.arena, self.tuning.spawn_margin);
        self.enemy_at(id, from, player)
    }

    /// New monster at a fixed position, headed for its stand-off point
    pub fn enemy_at(&self, id: EnemyId, from: Vec2, player: Vec2) -> Enemy {
        let to = stand_off_point(from, player, self.tuning.stop_distance);
        Enemy::new(id, from, to, self.tuning.speed, self.tuning.max_health)
    }
}
