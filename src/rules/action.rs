//! Battle actions.
//!
//! Every move a player can make as a value, so AI callers and playout tests
//! can enumerate and apply moves through one entry point.

use serde::{Deserialize, Serialize};

use crate::cards::{CardId, SkillId};
use crate::core::{AttackStyle, DefenseStyle, PlayerId};

/// A player move.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleAction {
    /// Open a clash (active side, `Action` phase).
    Attack { card: CardId, style: AttackStyle },
    /// Answer the open clash (defending side, `Defense` phase).
    Defend { card: CardId, style: DefenseStyle },
    /// Answer the open clash without a card.
    PassDefense,
    /// Use an active skill of the active character.
    UseSkill(SkillId),
    /// Rotate to the next character at this side's next turn start.
    FlagRotation,
    /// Switch the active character now.
    SetActiveCharacter(usize),
    /// End the turn.
    EndTurn,
}

impl BattleAction {
    /// Check whether the action is a defense response.
    #[must_use]
    pub fn is_defense(&self) -> bool {
        matches!(self, BattleAction::Defend { .. } | BattleAction::PassDefense)
    }
}

/// An applied action, kept in the battle's action log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: BattleAction,
    pub turn: u32,
}
