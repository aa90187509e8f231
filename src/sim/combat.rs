//! Combat resolution
//!
//! Player side: one arrow per cooldown at the nearest monster, flying a fixed
//! heading. Monster side: melee timers ticking against the player.
//!
//! Arrows hold their target's id only. If the id is gone from the active set
//! when the arrow is resolved, the arrow is dropped without effect, so a dead
//! monster can never take a second hit.

use std::collections::BTreeMap;

use glam::Vec2;

use super::collision::{in_bounds, projectile_hits};
use super::state::{Enemy, EnemyId, Projectile, ProjectileId};
use super::timer::Cooldown;
use crate::config::{ArenaTuning, EnemyTuning, PlayerTuning};
use crate::direction_or_zero;

/// An arrow landing on its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub enemy: EnemyId,
    pub amount: u32,
    pub lethal: bool,
    /// Target position at impact (drop point on a kill)
    pub pos: Vec2,
}

/// A monster landing a melee blow on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeleeHit {
    pub enemy: EnemyId,
    pub amount: u32,
}

/// Nearest monster to `from`.
///
/// Ties go to the lowest id: the map iterates in id order and only a strictly
/// closer monster replaces the current pick.
pub fn nearest_enemy(enemies: &BTreeMap<EnemyId, Enemy>, from: Vec2) -> Option<EnemyId> {
    let mut best: Option<(EnemyId, f32)> = None;
    for (id, enemy) in enemies.iter().filter(|(_, e)| e.is_alive()) {
        let dist = enemy.pos.distance_squared(from);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((*id, dist)),
        }
    }
    best.map(|(id, _)| id)
}

#[derive(Debug, Clone)]
pub struct CombatResolver {
    cooldown: Cooldown,
    projectiles: Vec<Projectile>,
    next_projectile_id: u32,
    player: PlayerTuning,
    melee_damage: u32,
    melee_interval: f32,
    arena: ArenaTuning,
}

impl CombatResolver {
    pub fn new(player: PlayerTuning, enemy: &EnemyTuning, arena: ArenaTuning) -> Self {
        Self {
            cooldown: Cooldown::ready(player.attack_interval),
            projectiles: Vec::new(),
            next_projectile_id: 1,
            player,
            melee_damage: enemy.attack,
            melee_interval: enemy.attack_interval,
            arena,
        }
    }

    /// Arrows in flight, in launch order
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Drop every arrow and re-arm the bow
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.cooldown.reset();
    }

    /// Move monsters along their glides and run their melee timers.
    ///
    /// Every monster advances before any blow is reported, so the caller
    /// applies damage against a settled set.
    pub fn resolve_melee(&self, enemies: &mut BTreeMap<EnemyId, Enemy>, dt: f32) -> Vec<MeleeHit> {
        let mut hits = Vec::new();
        for (id, enemy) in enemies.iter_mut() {
            let blows = enemy.advance(dt, self.melee_interval);
            for _ in 0..blows {
                hits.push(MeleeHit {
                    enemy: *id,
                    amount: self.melee_damage,
                });
            }
        }
        hits
    }

    /// Fire at the nearest monster if the cooldown allows.
    ///
    /// The heading is fixed now, toward where the target stands at launch.
    pub fn try_fire(
        &mut self,
        dt: f32,
        enemies: &BTreeMap<EnemyId, Enemy>,
        player_pos: Vec2,
    ) -> Option<(ProjectileId, EnemyId)> {
        self.cooldown.tick(dt);
        if !self.cooldown.is_ready() {
            return None;
        }
        let target = nearest_enemy(enemies, player_pos)?;
        let target_pos = enemies.get(&target)?.pos;
        self.cooldown.try_trigger();

        let id = ProjectileId(self.next_projectile_id);
        self.next_projectile_id += 1;
        let vel = direction_or_zero(player_pos, target_pos) * self.player.arrow_speed;
        self.projectiles.push(Projectile {
            id,
            pos: player_pos,
            vel,
            target,
        });
        Some((id, target))
    }

    /// Move arrows and resolve hits.
    ///
    /// An arrow is dropped silently if its target is gone or it leaves the
    /// play area; otherwise a hit within the threshold applies `attack_power`.
    /// Killed monsters are removed from `enemies` immediately.
    pub fn resolve_projectiles(
        &mut self,
        dt: f32,
        attack_power: u32,
        enemies: &mut BTreeMap<EnemyId, Enemy>,
    ) -> Vec<Hit> {
        let threshold = self.player.hit_threshold;
        let arena = self.arena;
        let mut hits = Vec::new();

        self.projectiles.retain_mut(|arrow| {
            arrow.step(dt);

            let Some(target) = enemies.get_mut(&arrow.target) else {
                // Target died to an earlier arrow
                return false;
            };

            if projectile_hits(arrow.pos, target.pos, threshold) {
                let lethal = target.apply_damage(attack_power);
                let pos = target.pos;
                if lethal {
                    enemies.remove(&arrow.target);
                }
                hits.push(Hit {
                    enemy: arrow.target,
                    amount: attack_power,
                    lethal,
                    pos,
                });
                return false;
            }

            in_bounds(arrow.pos, &arena)
        });

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::consts::SIM_DT;

    fn parked(id: u32, pos: Vec2) -> Enemy {
        let mut enemy = Enemy::new(EnemyId(id), pos, pos, 100.0, 50);
        enemy.advance(0.0, 1.0);
        enemy
    }

    fn resolver(config: &SimConfig) -> CombatResolver {
        CombatResolver::new(config.player, &config.enemy, config.arena)
    }

    #[test]
    fn test_nearest_enemy_picks_closest() {
        let mut enemies = BTreeMap::new();
        enemies.insert(EnemyId(1), parked(1, Vec2::new(100.0, 0.0)));
        enemies.insert(EnemyId(2), parked(2, Vec2::new(0.0, 30.0)));
        enemies.insert(EnemyId(3), parked(3, Vec2::new(-50.0, 0.0)));
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO), Some(EnemyId(2)));
    }

    #[test]
    fn test_nearest_enemy_tie_goes_to_lowest_id() {
        let mut enemies = BTreeMap::new();
        enemies.insert(EnemyId(9), parked(9, Vec2::new(40.0, 0.0)));
        enemies.insert(EnemyId(4), parked(4, Vec2::new(-40.0, 0.0)));
        enemies.insert(EnemyId(6), parked(6, Vec2::new(0.0, 40.0)));
        assert_eq!(nearest_enemy(&enemies, Vec2::ZERO), Some(EnemyId(4)));
    }

    #[test]
    fn test_nearest_enemy_empty() {
        assert_eq!(nearest_enemy(&BTreeMap::new(), Vec2::ZERO), None);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let config = SimConfig::default();
        let mut combat = resolver(&config);
        let mut enemies = BTreeMap::new();
        enemies.insert(EnemyId(1), parked(1, Vec2::new(200.0, 500.0)));
        let player = Vec2::new(200.0, 400.0);

        assert!(combat.try_fire(SIM_DT, &enemies, player).is_some());
        let mut fired = 1;
        // 0.5 s cooldown: one more shot within the next 61 ticks
        for _ in 0..61 {
            if combat.try_fire(SIM_DT, &enemies, player).is_some() {
                fired += 1;
            }
        }
        assert_eq!(fired, 2);
    }

    #[test]
    fn test_no_target_keeps_cooldown_ready() {
        let config = SimConfig::default();
        let mut combat = resolver(&config);
        let player = Vec2::new(200.0, 400.0);
        assert!(combat.try_fire(SIM_DT, &BTreeMap::new(), player).is_none());

        let mut enemies = BTreeMap::new();
        enemies.insert(EnemyId(1), parked(1, Vec2::new(200.0, 500.0)));
        assert!(combat.try_fire(SIM_DT, &enemies, player).is_some());
    }

    #[test]
    fn test_heading_is_fixed_at_launch() {
        let config = SimConfig::default();
        let mut combat = resolver(&config);
        let player = Vec2::new(200.0, 400.0);
        let mut enemies = BTreeMap::new();
        enemies.insert(EnemyId(1), parked(1, Vec2::new(200.0, 600.0)));
        combat.try_fire(SIM_DT, &enemies, player);
        let vel = combat.projectiles()[0].vel;

        // Target moves sideways; the arrow keeps flying straight up
        enemies.get_mut(&EnemyId(1)).unwrap().pos = Vec2::new(350.0, 600.0);
        combat.resolve_projectiles(SIM_DT, 10, &mut enemies);
        assert_eq!(combat.projectiles()[0].vel, vel);
        assert!((vel - Vec2::new(0.0, config.player.arrow_speed)).length() < 1e-3);
    }

    #[test]
    fn test_arrow_to_vanished_target_is_dropped() {
        let config = SimConfig::default();
        let mut combat = resolver(&config);
        let player = Vec2::new(200.0, 400.0);
        let mut enemies = BTreeMap::new();
        enemies.insert(EnemyId(1), parked(1, Vec2::new(200.0, 405.0)));
        combat.try_fire(SIM_DT, &enemies, player);

        enemies.clear();
        let hits = combat.resolve_projectiles(SIM_DT, 10, &mut enemies);
        assert!(hits.is_empty());
        assert!(combat.projectiles().is_empty());
    }

    #[test]
    fn test_arrow_leaving_bounds_is_dropped() {
        let config = SimConfig::default();
        let mut combat = resolver(&config);
        let player = Vec2::new(200.0, 400.0);
        let mut enemies = BTreeMap::new();
        // Target far outside the arena
        enemies.insert(EnemyId(1), parked(1, Vec2::new(200.0, 2000.0)));
        combat.try_fire(SIM_DT, &enemies, player);

        let mut hits = Vec::new();
        for _ in 0..240 {
            hits.extend(combat.resolve_projectiles(SIM_DT, 10, &mut enemies));
        }
        assert!(hits.is_empty());
        assert!(combat.projectiles().is_empty());
        assert_eq!(enemies[&EnemyId(1)].health, 50);
    }

    #[test]
    fn test_lethal_hit_removes_enemy() {
        let config = SimConfig::default();
        let mut combat = resolver(&config);
        let player = Vec2::new(200.0, 400.0);
        let mut enemies = BTreeMap::new();
        enemies.insert(EnemyId(1), parked(1, Vec2::new(200.0, 440.0)));
        combat.try_fire(SIM_DT, &enemies, player);

        let mut hits = Vec::new();
        for _ in 0..30 {
            hits.extend(combat.resolve_projectiles(SIM_DT, 50, &mut enemies));
        }
        assert_eq!(hits.len(), 1);
        assert!(hits[0].lethal);
        assert_eq!(hits[0].pos, Vec2::new(200.0, 440.0));
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_melee_hits_once_per_interval() {
        let config = SimConfig::default();
        let combat = resolver(&config);
        let mut enemies = BTreeMap::new();
        enemies.insert(EnemyId(1), parked(1, Vec2::ZERO));
        enemies.insert(EnemyId(2), parked(2, Vec2::ONE));

        let mut hits = Vec::new();
        for _ in 0..130 {
            hits.extend(combat.resolve_melee(&mut enemies, SIM_DT));
        }
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.amount == config.enemy.attack));
        assert_eq!(hits[0].enemy, EnemyId(1));
        assert_eq!(hits[1].enemy, EnemyId(2));
    }
}
