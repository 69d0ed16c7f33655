//! Error types.
//!
//! - `ActionError`: a caller asked for something the rules don't allow. The
//!   battle is unchanged and the rejection is also sent to the notification
//!   sink.
//! - `ClashError`: a clash was resolved without the data it needs. This is a
//!   control-flow bug in the caller, not user input.
//! - `DataError`: authoring data could not be resolved into value objects.

use thiserror::Error;

use super::clash::AttackStyle;
use super::player::PlayerId;
use super::state::Phase;
use crate::cards::{CardId, CharacterId, SkillId};

/// A rejected player action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("The battle is over")]
    GameOver,

    #[error("Action requires the {expected:?} phase, battle is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("It is not {0}'s move")]
    NotYourTurn(PlayerId),

    #[error("{0} is not in hand")]
    CardNotInHand(CardId),

    #[error("Not enough TP: need {needed}, have {available}")]
    InsufficientTp { needed: u32, available: u32 },

    #[error("Attack style {0:?} is restricted this turn")]
    StyleRestricted(AttackStyle),

    #[error("Active character has no skill {0}")]
    UnknownSkill(SkillId),

    #[error("Skill {0} is passive")]
    SkillNotActive(SkillId),

    #[error("Skill {skill} is on cooldown for {remaining} more turn(s)")]
    SkillOnCooldown { skill: SkillId, remaining: u32 },

    #[error("Skill {0} is disabled")]
    SkillDisabled(SkillId),

    #[error("No character at roster index {0}")]
    InvalidCharacter(usize),

    #[error("Character rotation limit reached for this turn")]
    RotationLimitReached,

    #[error("A clash is already open")]
    ClashAlreadyOpen,
}

/// A clash that cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClashError {
    #[error("No clash is open")]
    NoOpenClash,

    #[error("Clash is missing {0}")]
    Incomplete(&'static str),
}

/// Authoring data that cannot be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Unknown effect id: {0}")]
    UnknownEffect(String),

    #[error("Unknown skill kind: {0}")]
    UnknownSkillKind(String),

    #[error("Unknown battle event: {0}")]
    UnknownEvent(String),

    #[error("{0} already registered")]
    DuplicateCard(CardId),

    #[error("{0} already registered")]
    DuplicateCharacter(CharacterId),

    #[error("{0} not found in registry")]
    UnknownCard(CardId),

    #[error("{0} not found in registry")]
    UnknownCharacter(CharacterId),
}

/// Any failure of a battle operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Clash(#[from] ClashError),
}

pub type BattleResult<T> = std::result::Result<T, BattleError>;
