//! Grinding session
//!
//! The outer boundary around [`Simulation`]: owns the player, refills health
//! between sessions, ends the session when the player falls, and buffers
//! events for whoever draws the game.

use glam::Vec2;

use crate::config::SimConfig;
use crate::preferences::Preferences;
use crate::sim::{Player, RecordingHost, SimEvent, Simulation, Snapshot, TickOutcome, TokenId};

pub struct GrindSession {
    player: Player,
    sim: Simulation,
    events: Vec<SimEvent>,
    sessions_started: u32,
}

impl GrindSession {
    pub fn new(config: SimConfig) -> Self {
        Self {
            player: Player::new(&config),
            sim: Simulation::new(config),
            events: Vec::new(),
            sessions_started: 0,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn preferences(&self) -> Preferences {
        self.player.preferences
    }

    /// Flags take effect on the next tick
    pub fn set_preferences(&mut self, preferences: Preferences) {
        self.player.preferences = preferences;
    }

    pub fn is_running(&self) -> bool {
        self.sim.is_running()
    }

    pub fn sessions_started(&self) -> u32 {
        self.sessions_started
    }

    /// Start grinding with full health
    pub fn start(&mut self) {
        if self.sim.is_running() {
            return;
        }
        self.player.reset_health();
        self.sessions_started += 1;
        log::info!(
            "Session {} started (level {}, {} gold)",
            self.sessions_started,
            self.player.level,
            self.player.gold
        );
        self.sim.start();
    }

    /// Stop grinding; gold, experience and level are kept
    pub fn stop(&mut self) {
        if !self.sim.is_running() {
            return;
        }
        self.sim.stop();
        log::info!(
            "Session {} ended (level {}, {} gold, {}/{} hp)",
            self.sessions_started,
            self.player.level,
            self.player.gold,
            self.player.health,
            self.player.max_health
        );
    }

    /// Feed one frame of real time
    pub fn update(&mut self, frame_dt: f32) -> TickOutcome {
        let mut host = RecordingHost::new(&mut self.player, &mut self.events);
        let outcome = self.sim.update(&mut host, frame_dt);
        if outcome == TickOutcome::PlayerDefeated {
            self.stop();
        }
        outcome
    }

    /// Tap at a point in play-area coordinates; returns the coin picked up, if any
    pub fn tap_at(&mut self, point: Vec2) -> Option<TokenId> {
        self.sim.tap_at(point)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.sim.snapshot(&self.player)
    }

    /// Take every event buffered since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(session: &mut GrindSession, seconds: f32) {
        let frame = 1.0 / 60.0;
        let frames = (seconds / frame).ceil() as usize;
        for _ in 0..frames {
            session.update(frame);
        }
    }

    #[test]
    fn test_idle_session_earns_progress() {
        let mut session = GrindSession::new(SimConfig::default());
        session.set_preferences(Preferences::default().with_auto_collect(true));
        session.start();
        run(&mut session, 20.0);

        let player = session.player();
        assert!(player.gold > 0, "no gold after 20s");
        assert!(player.experience > 0 || player.level > 1);
        let events = session.drain_events();
        assert!(events.iter().any(|e| matches!(e, SimEvent::WaveSpawned { .. })));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_death_ends_session() {
        let mut config = SimConfig::default();
        config.enemy.attack = 100;
        config.enemy.max_health = 100_000;
        config.enemy.spawn_interval = 0.5;
        let mut session = GrindSession::new(config);
        session.start();

        let mut outcome = TickOutcome::Continue;
        for _ in 0..(30 * 60) {
            outcome = session.update(1.0 / 60.0);
            if outcome != TickOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, TickOutcome::PlayerDefeated);
        assert!(!session.is_running());
        assert_eq!(session.player().health, 0);

        let snapshot = session.snapshot();
        assert!(snapshot.enemies.is_empty());
        assert!(snapshot.projectiles.is_empty());
        assert!(snapshot.tokens.is_empty());
        assert_eq!(session.update(1.0 / 60.0), TickOutcome::Stopped);
    }

    #[test]
    fn test_restart_refills_health_and_keeps_progress() {
        let mut config = SimConfig::default();
        config.enemy.spawn_interval = 1.0;
        let mut session = GrindSession::new(config);
        session.set_preferences(Preferences::default().with_auto_collect(true));
        session.start();
        run(&mut session, 15.0);
        session.stop();

        let gold = session.player().gold;
        let level = session.player().level;
        assert!(session.player().health < session.player().max_health);

        session.start();
        assert_eq!(session.sessions_started(), 2);
        assert_eq!(session.player().health, session.player().max_health);
        assert_eq!(session.player().gold, gold);
        assert_eq!(session.player().level, level);
        assert!(session.snapshot().enemies.is_empty());
    }

    #[test]
    fn test_tap_ignored_while_stopped() {
        let mut session = GrindSession::new(SimConfig::default());
        assert_eq!(session.tap_at(Vec2::new(200.0, 400.0)), None);
        assert_eq!(session.update(0.1), TickOutcome::Stopped);
    }
}
