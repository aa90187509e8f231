//! Coin drops and collection
//!
//! A dead monster leaves a coin. Left alone it fades and disappears; tapped
//! (or with auto-collect on) it flies to the player and is credited on arrival.
//! Whichever happens first wins, and a coin in flight no longer decays.

use glam::Vec2;

use super::collision::tap_hits;
use super::state::{CurrencyToken, TokenId, TokenState};
use crate::config::RewardTuning;

/// Slack so a coin never outlives its cutoff through f32 accumulation
const AGE_EPSILON: f32 = 1e-3;

/// How a coin left play this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOutcome {
    /// Reached the player; `amount` goes to gold
    Collected { token: TokenId, amount: u32 },
    /// Faded out uncollected
    Expired { token: TokenId },
}

#[derive(Debug, Clone)]
pub struct RewardPipeline {
    tokens: Vec<CurrencyToken>,
    next_id: u32,
    tuning: RewardTuning,
}

impl RewardPipeline {
    pub fn new(tuning: RewardTuning) -> Self {
        Self {
            tokens: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    pub fn tuning(&self) -> &RewardTuning {
        &self.tuning
    }

    /// Live coins in drop order (also the tap hit-test order)
    pub fn tokens(&self) -> &[CurrencyToken] {
        &self.tokens
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Drop a coin at `pos`.
    ///
    /// With `auto_collect` it starts flying to the player right away.
    /// A zero-value coin is never created.
    pub fn drop_currency(
        &mut self,
        pos: Vec2,
        value: u32,
        auto_collect: bool,
        player: Vec2,
    ) -> Option<TokenId> {
        if value == 0 {
            return None;
        }
        let id = TokenId(self.next_id);
        self.next_id += 1;

        let mut token = CurrencyToken {
            id,
            pos,
            value,
            age: 0.0,
            state: TokenState::Idle,
        };
        if auto_collect {
            begin_collect(&mut token, player, self.tuning.coin_collect_speed);
        }
        self.tokens.push(token);
        Some(id)
    }

    /// Handle one tap; at most one coin is picked even if several overlap
    pub fn tap_at(&mut self, tap: Vec2, player: Vec2) -> Option<TokenId> {
        let radius = self.tuning.coin_hit_radius;
        let speed = self.tuning.coin_collect_speed;
        let token = self
            .tokens
            .iter_mut()
            .find(|t| t.is_idle() && tap_hits(tap, t.pos, radius))?;
        begin_collect(token, player, speed);
        Some(token.id)
    }

    /// Age idle coins toward expiry and fly collecting coins home
    pub fn advance(&mut self, dt: f32, player: Vec2) -> Vec<TokenOutcome> {
        let expiry = self.tuning.expiry();
        let mut outcomes = Vec::new();

        self.tokens.retain_mut(|token| {
            token.age += dt;
            match token.state {
                TokenState::Idle => {
                    if token.age + AGE_EPSILON >= expiry {
                        token.state = TokenState::Consumed;
                        outcomes.push(TokenOutcome::Expired { token: token.id });
                        false
                    } else {
                        true
                    }
                }
                TokenState::Collecting {
                    from,
                    elapsed,
                    duration,
                } => {
                    let elapsed = elapsed + dt;
                    if elapsed >= duration {
                        token.pos = player;
                        token.state = TokenState::Consumed;
                        outcomes.push(TokenOutcome::Collected {
                            token: token.id,
                            amount: token.value,
                        });
                        false
                    } else {
                        token.pos = from.lerp(player, elapsed / duration);
                        token.state = TokenState::Collecting {
                            from,
                            elapsed,
                            duration,
                        };
                        true
                    }
                }
                TokenState::Consumed => false,
            }
        });

        outcomes
    }
}

/// Cancel decay and start the flight to the player
fn begin_collect(token: &mut CurrencyToken, player: Vec2, speed: f32) {
    let distance = token.pos.distance(player);
    let duration = if speed > 0.0 { distance / speed } else { 0.0 };
    token.state = TokenState::Collecting {
        from: token.pos,
        elapsed: 0.0,
        duration,
    };
}
