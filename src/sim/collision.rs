//! Geometry and hit tests
//!
//! Everything is axis-aligned and point-based: arrows hit when they come
//! within a threshold of their target's centre, coins are tapped inside a
//! circle, and the play area is a rectangle with the origin at bottom-left.

use glam::Vec2;
use rand::Rng;

use crate::config::ArenaTuning;
use crate::direction_or_zero;

/// Screen edge a monster enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Bottom, Edge::Left, Edge::Right];

    /// Uniform pick among the four edges
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Centre of the play area, where the player stands
pub fn arena_center(arena: &ArenaTuning) -> Vec2 {
    Vec2::new(arena.width / 2.0, arena.height / 2.0)
}

/// Whether `pos` is inside the visible play area (edges inclusive)
pub fn in_bounds(pos: Vec2, arena: &ArenaTuning) -> bool {
    pos.x >= 0.0 && pos.x <= arena.width && pos.y >= 0.0 && pos.y <= arena.height
}

/// Random point along `edge`, pushed `margin` units outside the play area
pub fn spawn_point<R: Rng>(rng: &mut R, edge: Edge, arena: &ArenaTuning, margin: f32) -> Vec2 {
    match edge {
        Edge::Top => Vec2::new(rng.random_range(0.0..=arena.width), arena.height + margin),
        Edge::Bottom => Vec2::new(rng.random_range(0.0..=arena.width), -margin),
        Edge::Right => Vec2::new(arena.width + margin, rng.random_range(0.0..=arena.height)),
        Edge::Left => Vec2::new(-margin, rng.random_range(0.0..=arena.height)),
    }
}

/// Point on the line from `spawn` to `player`, `stop_distance` short of the player.
///
/// A spawn exactly on the player has no direction; the player's own position is
/// returned rather than a NaN point.
pub fn stand_off_point(spawn: Vec2, player: Vec2, stop_distance: f32) -> Vec2 {
    let dir = direction_or_zero(spawn, player);
    player - dir * stop_distance
}

/// Arrow close enough to its target to count as a hit
#[inline]
pub fn projectile_hits(projectile: Vec2, target: Vec2, threshold: f32) -> bool {
    projectile.distance(target) < threshold
}

/// Tap inside a coin's circular hit region
#[inline]
pub fn tap_hits(tap: Vec2, center: Vec2, radius: f32) -> bool {
    tap.distance_squared(center) <= radius * radius
}
