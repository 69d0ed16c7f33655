//! Handler context and the commands handlers queue.
//!
//! Handlers never touch battle state. They read what the context exposes and
//! queue `SkillCommand`s, which the battle session applies after the
//! handler returns.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cards::{BattleEvent, Card};
use crate::core::{ClashContext, GameRng, PlayerId};
use crate::effects::{Duration, RestrictionData, RestrictionKind, TemporaryBonus};

/// Side of the open clash a handler acts for.
///
/// Outside a clash (`Activate`, `TurnStart`) the acting side is `Attacker`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Attacker,
    Defender,
}

/// A state change requested by a skill handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillCommand {
    DrawCards { player: PlayerId, count: u32 },
    GainTp { player: PlayerId, amount: u32 },
    /// TP on top of a full pool; the turn's limit rises with it.
    GainBonusTp { player: PlayerId, amount: u32 },
    /// Move the topic bias `amount` points toward `toward`.
    ShiftTopicBias { toward: PlayerId, amount: i64 },
    /// Strength injection for the clash being resolved.
    AddStrengthBonus { role: Role, amount: i64 },
    GrantNextCardAnyType { player: PlayerId },
    AddTemporaryBonus(TemporaryBonus),
    AddRestriction {
        player: PlayerId,
        kind: RestrictionKind,
        data: RestrictionData,
        duration: Duration,
    },
}

/// Everything a handler may read, plus its command queue.
pub struct EffectContext<'a> {
    pub event: BattleEvent,
    /// Side that owns the skill.
    pub player: PlayerId,
    pub role: Role,
    /// Card that caused the event, if any.
    pub card: Option<&'a Card>,
    pub clash: Option<&'a ClashContext>,
    topic_bias: i64,
    rng: &'a mut GameRng,
    commands: Vec<SkillCommand>,
}

impl<'a> EffectContext<'a> {
    #[must_use]
    pub fn new(
        event: BattleEvent,
        player: PlayerId,
        role: Role,
        topic_bias: i64,
        rng: &'a mut GameRng,
    ) -> Self {
        Self {
            event,
            player,
            role,
            card: None,
            clash: None,
            topic_bias,
            rng,
            commands: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_card(mut self, card: &'a Card) -> Self {
        self.card = Some(card);
        self
    }

    #[must_use]
    pub fn with_clash(mut self, clash: &'a ClashContext) -> Self {
        self.clash = Some(clash);
        self
    }

    /// Topic bias at the time of the event (A-positive).
    #[must_use]
    pub fn topic_bias(&self) -> i64 {
        self.topic_bias
    }

    /// The acting side's bias advantage.
    #[must_use]
    pub fn own_bias_advantage(&self) -> i64 {
        self.player.bias_advantage(self.topic_bias)
    }

    /// Roll with probability `p` of success.
    pub fn roll(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p)
    }

    pub fn draw_cards(&mut self, count: u32) {
        self.push(SkillCommand::DrawCards {
            player: self.player,
            count,
        });
    }

    pub fn gain_tp(&mut self, amount: u32) {
        self.push(SkillCommand::GainTp {
            player: self.player,
            amount,
        });
    }

    pub fn gain_bonus_tp(&mut self, amount: u32) {
        self.push(SkillCommand::GainBonusTp {
            player: self.player,
            amount,
        });
    }

    /// Move the bias `amount` points toward `toward`.
    pub fn shift_topic_bias(&mut self, toward: PlayerId, amount: i64) {
        self.push(SkillCommand::ShiftTopicBias { toward, amount });
    }

    /// Inject strength for `role`. Only honoured during `BeforeResolve`.
    pub fn add_strength_bonus(&mut self, role: Role, amount: i64) {
        if self.event != BattleEvent::BeforeResolve {
            warn!(event = ?self.event, ?role, amount, "strength injection outside beforeResolve ignored");
            return;
        }
        self.push(SkillCommand::AddStrengthBonus { role, amount });
    }

    pub fn grant_next_card_any_type(&mut self) {
        self.push(SkillCommand::GrantNextCardAnyType {
            player: self.player,
        });
    }

    pub fn add_temporary_bonus(&mut self, bonus: TemporaryBonus) {
        self.push(SkillCommand::AddTemporaryBonus(bonus));
    }

    pub fn add_restriction(
        &mut self,
        player: PlayerId,
        kind: RestrictionKind,
        data: RestrictionData,
        duration: Duration,
    ) {
        self.push(SkillCommand::AddRestriction {
            player,
            kind,
            data,
            duration,
        });
    }

    fn push(&mut self, command: SkillCommand) {
        self.commands.push(command);
    }

    /// Commands queued so far.
    #[must_use]
    pub fn commands(&self) -> &[SkillCommand] {
        &self.commands
    }

    pub(crate) fn rollback_to(&mut self, mark: usize) {
        self.commands.truncate(mark);
    }

    /// Consume the context, returning the queued commands.
    #[must_use]
    pub fn into_commands(self) -> Vec<SkillCommand> {
        self.commands
    }
}

impl std::fmt::Debug for EffectContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectContext")
            .field("event", &self.event)
            .field("player", &self.player)
            .field("role", &self.role)
            .field("card", &self.card.map(|c| c.id))
            .field("topic_bias", &self.topic_bias)
            .field("commands", &self.commands)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strength_injection_only_before_resolve() {
        let mut rng = GameRng::new(1);
        let mut ctx = EffectContext::new(BattleEvent::OnPlay, PlayerId::A, Role::Attacker, 0, &mut rng);
        ctx.add_strength_bonus(Role::Attacker, 2);
        assert!(ctx.commands().is_empty());

        let mut ctx =
            EffectContext::new(BattleEvent::BeforeResolve, PlayerId::A, Role::Defender, 0, &mut rng);
        ctx.add_strength_bonus(Role::Defender, 2);
        assert_eq!(
            ctx.into_commands(),
            vec![SkillCommand::AddStrengthBonus { role: Role::Defender, amount: 2 }]
        );
    }

    #[test]
    fn test_rollback() {
        let mut rng = GameRng::new(1);
        let mut ctx = EffectContext::new(BattleEvent::Activate, PlayerId::B, Role::Attacker, -3, &mut rng);
        ctx.gain_tp(1);
        let mark = ctx.commands().len();
        ctx.draw_cards(2);
        ctx.rollback_to(mark);

        assert_eq!(ctx.own_bias_advantage(), 3);
        assert_eq!(ctx.into_commands(), vec![SkillCommand::GainTp { player: PlayerId::B, amount: 1 }]);
    }
}
