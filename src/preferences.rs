//! Player preferences
//!
//! Feature flags owned by the session and read by the simulation each tick.
//! They are in-memory only; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// Player-facing toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Coins fly to the player as soon as they drop
    pub auto_collect: bool,
    /// "+value" label when gold is credited
    pub show_gold_labels: bool,
    /// "-damage" label above monsters on non-lethal hits
    pub show_enemy_damage_labels: bool,
    /// "-damage" label above the player on melee hits
    pub show_player_damage_labels: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            // Purchasable later, off until then
            auto_collect: false,

            // Labels - all on by default
            show_gold_labels: true,
            show_enemy_damage_labels: true,
            show_player_damage_labels: true,
        }
    }
}

impl Preferences {
    /// All labels off (quiet mode for headless runs)
    pub fn quiet() -> Self {
        Self {
            auto_collect: false,
            show_gold_labels: false,
            show_enemy_damage_labels: false,
            show_player_damage_labels: false,
        }
    }

    /// Builder-style toggle for auto-collect
    pub fn with_auto_collect(mut self, enabled: bool) -> Self {
        self.auto_collect = enabled;
        self
    }
}
