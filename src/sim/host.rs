//! Host capability interface
//!
//! The simulation never owns the player. Whoever drives it (the session, a
//! test harness, an embedding app) implements [`SimHost`] and passes it into
//! each tick; every read of player stats and every mutation goes through it.

use super::progression::Player;
use super::state::SimEvent;
use crate::preferences::Preferences;

pub trait SimHost {
    /// Damage dealt by each arrow
    fn attack_power(&self) -> u32;

    /// Feature flags, read fresh every time they matter
    fn preferences(&self) -> Preferences;

    fn level(&self) -> u32;

    fn add_gold(&mut self, amount: u64);

    /// Returns the number of levels gained
    fn add_experience(&mut self, amount: u64) -> u32;

    /// Apply melee damage; returns true when the player is dead
    fn take_damage(&mut self, amount: u32) -> bool;

    /// Presentation hook for everything else that happened
    fn on_event(&mut self, _event: SimEvent) {}
}

impl SimHost for Player {
    fn attack_power(&self) -> u32 {
        self.attack_power
    }

    fn preferences(&self) -> Preferences {
        self.preferences
    }

    fn level(&self) -> u32 {
        self.level
    }

    fn add_gold(&mut self, amount: u64) {
        Player::add_gold(self, amount);
    }

    fn add_experience(&mut self, amount: u64) -> u32 {
        Player::add_experience(self, amount)
    }

    fn take_damage(&mut self, amount: u32) -> bool {
        self.apply_damage(amount)
    }
}

/// Player-backed host that records every event
pub struct RecordingHost<'a> {
    pub player: &'a mut Player,
    pub events: &'a mut Vec<SimEvent>,
}

impl<'a> RecordingHost<'a> {
    pub fn new(player: &'a mut Player, events: &'a mut Vec<SimEvent>) -> Self {
        Self { player, events }
    }
}

impl SimHost for RecordingHost<'_> {
    fn attack_power(&self) -> u32 {
        self.player.attack_power
    }

    fn preferences(&self) -> Preferences {
        self.player.preferences
    }

    fn level(&self) -> u32 {
        self.player.level
    }

    fn add_gold(&mut self, amount: u64) {
        self.player.add_gold(amount);
    }

    fn add_experience(&mut self, amount: u64) -> u32 {
        self.player.add_experience(amount)
    }

    fn take_damage(&mut self, amount: u32) -> bool {
        self.player.apply_damage(amount)
    }

    fn on_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }
}
