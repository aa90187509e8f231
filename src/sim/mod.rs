//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod combat;
pub mod host;
pub mod progression;
pub mod reward;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use clock::SimulationClock;
pub use combat::{CombatResolver, Hit, MeleeHit, nearest_enemy};
pub use host::{RecordingHost, SimHost};
pub use progression::{Player, exp_required};
pub use reward::{RewardPipeline, TokenOutcome};
pub use spawn::SpawnController;
pub use state::{
    CurrencyToken, Enemy, EnemyId, EnemyState, Projectile, ProjectileId, SimEvent, TokenId,
    TokenState,
};
pub use tick::{
    EnemyView, PlayerView, ProjectileView, Simulation, Snapshot, TickOutcome, TokenView,
};
pub use timer::{Cooldown, RepeatingTimer};
