//! Fixed timestep simulation tick
//!
//! [`Simulation`] owns every transient entity and advances them in a fixed
//! phase order each step:
//!
//! 1. wave timer (new monsters)
//! 2. monster glides and melee timers
//! 3. targeting (maybe fire an arrow)
//! 4. arrow flight and hits
//! 5. coin decay and collection
//!
//! Each phase finishes before the next one reads the entity sets.

use std::collections::BTreeMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::clock::SimulationClock;
use super::collision::arena_center;
use super::combat::{CombatResolver, Hit};
use super::host::SimHost;
use super::progression::Player;
use super::reward::{RewardPipeline, TokenOutcome};
use super::spawn::SpawnController;
use super::state::{CurrencyToken, Enemy, EnemyId, Projectile, SimEvent, TokenId};
use crate::config::SimConfig;
use crate::consts::SIM_DT;

/// What a step (or a frame of steps) ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// A melee blow emptied the player's health; the rest of the step was skipped
    PlayerDefeated,
    /// The simulation is not running; nothing happened
    Stopped,
}

pub struct Simulation {
    config: SimConfig,
    rng: Pcg32,
    clock: SimulationClock,
    spawner: SpawnController,
    combat: CombatResolver,
    rewards: RewardPipeline,
    /// Active set, iterated in id order
    enemies: BTreeMap<EnemyId, Enemy>,
    player_pos: Vec2,
    next_enemy_id: u32,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(config.seed),
            clock: SimulationClock::new(),
            spawner: SpawnController::new(config.enemy, config.arena),
            combat: CombatResolver::new(config.player, &config.enemy, config.arena),
            rewards: RewardPipeline::new(config.reward),
            enemies: BTreeMap::new(),
            player_pos: arena_center(&config.arena),
            next_enemy_id: 1,
            config,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn player_position(&self) -> Vec2 {
        self.player_pos
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Simulated seconds since the last start
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.values()
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.get(&id)
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len()
    }

    pub fn projectiles(&self) -> &[Projectile] {
        self.combat.projectiles()
    }

    pub fn tokens(&self) -> &[CurrencyToken] {
        self.rewards.tokens()
    }

    /// Begin a session from empty transient state
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.clear_transient();
        self.clock.start();
        log::info!(
            "Simulation started (first wave in {:.1}s)",
            self.spawner.next_wave_in()
        );
    }

    /// End the session: every timer is invalidated and every entity dropped
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.clock.stop();
        log::info!(
            "Simulation stopped after {:.1}s ({} monsters, {} arrows, {} coins cleared)",
            self.clock.elapsed(),
            self.enemies.len(),
            self.combat.projectiles().len(),
            self.rewards.tokens().len()
        );
        self.clear_transient();
    }

    fn clear_transient(&mut self) {
        self.spawner.reset();
        self.combat.clear();
        self.rewards.clear();
        // Melee timers live on the enemies and go with them
        self.enemies.clear();
    }

    /// Feed one frame of real time; runs as many fixed steps as it covers
    pub fn update<H: SimHost>(&mut self, host: &mut H, frame_dt: f32) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Stopped;
        }
        let steps = self.clock.advance(frame_dt);
        for _ in 0..steps {
            match self.tick(host, SIM_DT) {
                TickOutcome::Continue => {}
                other => return other,
            }
        }
        TickOutcome::Continue
    }

    /// Advance the simulation by one step of `dt` seconds
    pub fn tick<H: SimHost>(&mut self, host: &mut H, dt: f32) -> TickOutcome {
        if !self.is_running() {
            return TickOutcome::Stopped;
        }
        self.clock.record_tick(dt);

        // 1. Waves
        let waves = self.spawner.tick(dt);
        for _ in 0..waves {
            let spawned = self.spawn_wave();
            host.on_event(SimEvent::WaveSpawned {
                count: spawned.len() as u32,
            });
        }

        // 2. Glides and melee
        if self.resolve_melee(host, dt) {
            return TickOutcome::PlayerDefeated;
        }

        // 3. Targeting
        let shot = self.combat.try_fire(dt, &self.enemies, self.player_pos);
        if let Some((projectile, target)) = shot {
            host.on_event(SimEvent::ShotFired { projectile, target });
        }

        // 4. Arrows
        let hits = self
            .combat
            .resolve_projectiles(dt, host.attack_power(), &mut self.enemies);
        for hit in hits {
            self.apply_hit(host, hit);
        }

        // 5. Coins
        for outcome in self.rewards.advance(dt, self.player_pos) {
            match outcome {
                TokenOutcome::Collected { token, amount } => {
                    host.add_gold(amount as u64);
                    log::debug!("Collected coin {:?} (+{} gold)", token, amount);
                    host.on_event(SimEvent::CurrencyCollected { token, amount });
                    if host.preferences().show_gold_labels {
                        host.on_event(SimEvent::GoldLabel { amount });
                    }
                }
                TokenOutcome::Expired { token } => {
                    host.on_event(SimEvent::CoinExpired { token });
                }
            }
        }

        TickOutcome::Continue
    }

    /// Apply melee blows in id order; returns true if the player died
    fn resolve_melee<H: SimHost>(&mut self, host: &mut H, dt: f32) -> bool {
        for blow in self.combat.resolve_melee(&mut self.enemies, dt) {
            let dead = host.take_damage(blow.amount);
            host.on_event(SimEvent::PlayerDamaged {
                amount: blow.amount,
                dead,
            });
            if host.preferences().show_player_damage_labels {
                host.on_event(SimEvent::PlayerDamageLabel {
                    amount: blow.amount,
                });
            }
            if dead {
                log::info!("Player defeated by {:?}", blow.enemy);
                host.on_event(SimEvent::PlayerDefeated);
                return true;
            }
        }
        false
    }

    fn apply_hit<H: SimHost>(&mut self, host: &mut H, hit: Hit) {
        host.on_event(SimEvent::EnemyDamaged {
            enemy: hit.enemy,
            amount: hit.amount,
            lethal: hit.lethal,
        });

        if !hit.lethal {
            if host.preferences().show_enemy_damage_labels {
                host.on_event(SimEvent::EnemyDamageLabel {
                    enemy: hit.enemy,
                    amount: hit.amount,
                    pos: hit.pos,
                });
            }
            return;
        }

        log::debug!("Killed {:?} at ({:.0}, {:.0})", hit.enemy, hit.pos.x, hit.pos.y);
        let exp = self.config.reward.exp_per_monster;
        let gained = host.add_experience(exp);
        host.on_event(SimEvent::ExperienceAdded { amount: exp });
        if gained > 0 {
            let level = host.level();
            host.on_event(SimEvent::LeveledUp { level, gained });
        }

        let value = self.config.reward.gold_per_monster;
        let auto_collect = host.preferences().auto_collect;
        if let Some(token) = self.drop_currency(hit.pos, value, auto_collect) {
            host.on_event(SimEvent::CoinDropped {
                token,
                pos: hit.pos,
                value,
            });
        }
    }

    /// Spawn one wave at random edges; returns the new ids
    pub fn spawn_wave(&mut self) -> Vec<EnemyId> {
        if !self.is_running() {
            return Vec::new();
        }
        let count = self.spawner.wave_size(&mut self.rng);
        let mut spawned = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = self.next_enemy_id();
            let enemy = self.spawner.spawn_enemy(&mut self.rng, id, self.player_pos);
            self.enemies.insert(id, enemy);
            spawned.push(id);
        }
        log::info!("Wave spawned: {} monsters ({} active)", count, self.enemies.len());
        spawned
    }

    /// Spawn one monster at `pos`, outside the wave timer
    pub fn spawn_enemy_at(&mut self, pos: Vec2) -> Option<EnemyId> {
        if !self.is_running() {
            return None;
        }
        let id = self.next_enemy_id();
        let enemy = self.spawner.enemy_at(id, pos, self.player_pos);
        self.enemies.insert(id, enemy);
        Some(id)
    }

    /// Drop a coin worth `value` at `pos`
    pub fn drop_currency(
        &mut self,
        pos: Vec2,
        value: u32,
        auto_collect: bool,
    ) -> Option<TokenId> {
        if !self.is_running() {
            return None;
        }
        let token = self
            .rewards
            .drop_currency(pos, value, auto_collect, self.player_pos)?;
        log::debug!("Dropped coin {:?} worth {}", token, value);
        Some(token)
    }

    /// Player tapped the play area; picks up at most one idle coin
    pub fn tap_at(&mut self, point: Vec2) -> Option<TokenId> {
        if !self.is_running() {
            return None;
        }
        self.rewards.tap_at(point, self.player_pos)
    }

    fn next_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        id
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self, player: &Player) -> Snapshot {
        let reward = self.rewards.tuning();
        Snapshot {
            player: PlayerView {
                health: player.health,
                max_health: player.max_health,
                health_fraction: player.health_fraction(),
                level: player.level,
                experience: player.experience,
                exp_required: player.exp_required(),
                gold: player.gold,
                pos: self.player_pos,
            },
            enemies: self
                .enemies
                .values()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    health: e.health,
                    max_health: e.max_health,
                    health_fraction: e.health_fraction(),
                    attacking: e.is_attacking(),
                })
                .collect(),
            projectiles: self
                .combat
                .projectiles()
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    rotation: p.rotation(),
                })
                .collect(),
            tokens: self
                .rewards
                .tokens()
                .iter()
                .map(|t| TokenView {
                    id: t.id,
                    pos: t.pos,
                    value: t.value,
                    opacity: t.opacity(reward),
                    collecting: t.is_collecting(),
                })
                .collect(),
            elapsed: self.clock.elapsed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub health: u32,
    pub max_health: u32,
    pub health_fraction: f32,
    pub level: u32,
    pub experience: u64,
    pub exp_required: u64,
    pub gold: u64,
    pub pos: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    /// Health bar fill (0-1)
    pub health_fraction: f32,
    pub attacking: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenView {
    pub id: TokenId,
    pub pos: Vec2,
    pub value: u32,
    /// 1 = solid, 0 = fully faded
    pub opacity: f32,
    pub collecting: bool,
}

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub tokens: Vec<TokenView>,
    pub elapsed: f64,
}
