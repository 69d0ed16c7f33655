//! # debate-clash
//!
//! Battle resolution engine for a two-player debate card game.
//!
//! Two sides take turns attacking with cards. The defender answers with a
//! card of their own or passes, and a fixed reward table turns the strength
//! difference into reputation changes and a shift of the shared topic bias.
//! A side wins when the opponent's reputation reaches 0 or the bias reaches
//! its limit; after the last turn the higher reputation wins.
//!
//! ## Design Principles
//!
//! 1. **Single Writer**: Only `Battle` mutates battle state. Skill handlers
//!    queue `SkillCommand`s and the effect registry returns hook actions as
//!    data; the battle applies both in order, checking victory after each.
//!
//! 2. **Deterministic**: One seeded `GameRng` drives deck shuffles and
//!    chance-based skills. The same seed and inputs replay the same battle.
//!
//! 3. **Fault Isolated**: A failing or panicking skill handler is logged
//!    and its queued commands are discarded; the battle continues.
//!
//! ## Modules
//!
//! - `core`: Players, configuration, game and player state, clash records, RNG, errors
//! - `cards`: Cards, characters, skills, effect ids and the card registry
//! - `effects`: Duration-scoped persistent effects, bonuses and restrictions
//! - `skills`: Skill effect dispatch and passive aura rules
//! - `calc`: Final strength and reward calculation
//! - `rules`: Victory conditions and the action vocabulary
//! - `battle`: The battle session (turn manager and clash controller)
//!
//! ## Logging
//!
//! The crate emits `tracing` events and never installs a subscriber; the
//! host decides where they go.

pub mod battle;
pub mod calc;
pub mod cards;
pub mod core;
pub mod effects;
pub mod rules;
pub mod skills;

// Re-export commonly used types
pub use crate::core::{
    ActionError, AttackStyle, BattleConfig, BattleError, BattleResult, ClashContext, ClashError,
    DataError, DefenseStyle, GameRng, GameState, PacingConfig, Phase, PlayerId, PlayerMap,
    PlayerState,
};

pub use crate::cards::{
    BattleEvent, Card, CardId, CardMatch, CardRegistry, CharacterCard, CharacterId, Deck,
    EffectId, Skill, SkillId, SkillKind,
};

pub use crate::effects::{Duration, PersistentEffect, PersistentEffectRegistry, TemporaryBonus};

pub use crate::skills::{EffectContext, Role, SkillCommand, SkillDispatcher};

pub use crate::calc::{calculate_rewards, Rewards, StrengthCalculator, StrengthCategory};

pub use crate::rules::{BattleAction, GameOutcome, GameResult, VictoryReason};

pub use crate::battle::{Battle, ClashOutcome, Notification, NotificationSink, Severity};
