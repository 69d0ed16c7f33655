//! Final strength calculation.
//!
//! Pipeline, in order:
//! 1. base card strength
//! 2. topic-bias advantage for the favored side (never a penalty)
//! 3. passive auras of both active characters, additive stage first
//! 4. strength bonuses from the persistent effect registry
//!
//! The result, plus any strength injected before resolution, is clamped
//! to 0 or more. An aura rule that panics contributes nothing.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::{Deserialize, Serialize};
use tracing::{error, trace};

use crate::cards::Card;
use crate::core::{PlayerId, PlayerMap, PlayerState};
use crate::effects::PersistentEffectRegistry;
use crate::skills::{AuraInput, AuraRegistry, AuraStage};

/// Contributions to a card's strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthBreakdown {
    pub base: i64,
    pub bias: i64,
    pub aura: i64,
    pub bonus: i64,
}

impl StrengthBreakdown {
    /// Final strength with an extra injected amount, clamped to 0 or more.
    #[must_use]
    pub fn total_with(&self, injected: i64) -> i64 {
        self.base
            .saturating_add(self.bias)
            .saturating_add(self.aura)
            .saturating_add(self.bonus)
            .saturating_add(injected)
            .max(0)
    }

    /// Final strength, clamped to 0 or more.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.total_with(0)
    }
}

/// Strength calculator over a read-only view of the battle.
#[derive(Clone, Copy, Debug)]
pub struct StrengthCalculator<'a> {
    pub topic_bias: i64,
    pub players: &'a PlayerMap<PlayerState>,
    pub auras: &'a AuraRegistry,
    pub registry: &'a PersistentEffectRegistry,
}

impl<'a> StrengthCalculator<'a> {
    #[must_use]
    pub fn new(
        topic_bias: i64,
        players: &'a PlayerMap<PlayerState>,
        auras: &'a AuraRegistry,
        registry: &'a PersistentEffectRegistry,
    ) -> Self {
        Self {
            topic_bias,
            players,
            auras,
            registry,
        }
    }

    /// Final strength of `card` played by `owner`.
    #[must_use]
    pub fn calculate_final_strength(&self, card: &Card, owner: PlayerId, wildcard: bool) -> i64 {
        self.breakdown(card, owner, wildcard).total()
    }

    /// Strength contributions of `card` played by `owner`.
    #[must_use]
    pub fn breakdown(&self, card: &Card, owner: PlayerId, wildcard: bool) -> StrengthBreakdown {
        let base = card.strength;
        let bias = owner.bias_advantage(self.topic_bias).max(0);

        let before_auras = base.saturating_add(bias);
        let mut strength = before_auras;
        for stage in AuraStage::ORDER {
            for (effect, rule) in self.auras.stage(stage) {
                for (side, state) in self.players.iter() {
                    let Some(character) = state.active_character() else {
                        continue;
                    };
                    let input = AuraInput {
                        aura_owner: side,
                        aura_owner_tags: &character.synergy_tags,
                        card_owner: owner,
                        card,
                        wildcard,
                    };
                    for _ in character.passives().filter(|s| s.effect == effect) {
                        match catch_unwind(AssertUnwindSafe(|| rule.apply(&input, strength))) {
                            Ok(next) => strength = next,
                            Err(_) => {
                                error!(%effect, aura_owner = %side, card = %card.id, "aura rule panicked");
                            }
                        }
                    }
                }
            }
        }
        let aura = strength - before_auras;

        let bonus = self.registry.get_strength_bonus(owner, card, wildcard);

        let breakdown = StrengthBreakdown {
            base,
            bias,
            aura,
            bonus,
        };
        trace!(card = %card.id, %owner, ?breakdown, "strength breakdown");
        breakdown
    }
}
