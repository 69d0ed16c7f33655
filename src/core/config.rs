//! Battle configuration.
//!
//! Hosts build a `BattleConfig` once per battle. Every field has the value
//! the live game uses as its default; tests override individual fields with
//! the `with_*` builders.

use serde::{Deserialize, Serialize};

/// Presentation pacing between battle steps.
///
/// The core never waits on these; it only records scheduled steps that a
/// host scheduler may honour or cancel. Zero disables a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Delay before the defending side is asked to respond (AI "thinking").
    pub defense_delay_ms: u64,

    /// Delay after a clash resolves before play continues.
    pub settle_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            defense_delay_ms: 1000,
            settle_delay_ms: 1000,
        }
    }
}

impl PacingConfig {
    /// Pacing with every delay disabled.
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            defense_delay_ms: 0,
            settle_delay_ms: 0,
        }
    }
}

/// Battle configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Reputation each side starts with.
    pub initial_reputation: i64,

    /// TP limit on turn 1. The limit grows by one per turn for both sides.
    pub base_tp: u32,

    /// Cards each side draws before the first turn.
    pub initial_hand_size: usize,

    /// Draws are skipped while a hand holds this many cards.
    pub max_hand_size: usize,

    /// The battle is judged on reputation after this turn ends.
    pub turn_limit: u32,

    /// Topic bias is clamped to `[-limit, limit]`; reaching a bound wins.
    pub topic_bias_limit: i64,

    /// Actual character changes allowed per side per turn.
    pub max_rotations_per_turn: u32,

    /// Seed for deck shuffles and chance-based skills.
    pub seed: u64,

    /// Shuffle both decks at initialization.
    pub shuffle_decks: bool,

    /// Presentation pacing.
    pub pacing: PacingConfig,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            initial_reputation: 30,
            base_tp: 2,
            initial_hand_size: 5,
            max_hand_size: 10,
            turn_limit: 12,
            topic_bias_limit: 10,
            max_rotations_per_turn: 1,
            seed: 42,
            shuffle_decks: true,
            pacing: PacingConfig::default(),
        }
    }
}

impl BattleConfig {
    /// TP limit for a given turn: `base_tp + (turn - 1)`.
    #[must_use]
    pub fn tp_limit_for_turn(&self, turn: u32) -> u32 {
        self.base_tp + turn.saturating_sub(1)
    }

    /// Set the starting reputation.
    #[must_use]
    pub fn with_initial_reputation(mut self, reputation: i64) -> Self {
        self.initial_reputation = reputation;
        self
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_initial_hand_size(mut self, size: usize) -> Self {
        self.initial_hand_size = size;
        self
    }

    /// Set the turn limit.
    #[must_use]
    pub fn with_turn_limit(mut self, turns: u32) -> Self {
        self.turn_limit = turns;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Keep decks in the order they were supplied.
    #[must_use]
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle_decks = false;
        self
    }

    /// Set presentation pacing.
    #[must_use]
    pub fn with_pacing(mut self, pacing: PacingConfig) -> Self {
        self.pacing = pacing;
        self
    }
}
