//! Character skills and their authoring-data form.
//!
//! The core only consumes resolved `Skill` values. `RawSkill` mirrors the
//! shape the data-loading layer hands over and is converted with `TryFrom`,
//! which is where free-form effect keys become `EffectId`s.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::effect_id::EffectId;
use crate::core::DataError;

/// Identifier of a skill definition.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(pub String);

impl SkillId {
    /// Create a new skill ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SkillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a skill is activated or always on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    /// Used explicitly; costs TP and has a cooldown.
    Active,
    /// On while the owning character is active.
    PassiveAura,
}

impl FromStr for SkillKind {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Active" | "active" | "主动技能" => Ok(SkillKind::Active),
            "PassiveAura" | "passive" | "passive_aura" | "aura" | "被动光环" => {
                Ok(SkillKind::PassiveAura)
            }
            other => Err(DataError::UnknownSkillKind(other.to_string())),
        }
    }
}

/// Battle events at which skill effects run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleEvent {
    /// A card was played to open a clash.
    OnPlay,
    /// A clash is about to be scored; strength injections are accepted.
    BeforeResolve,
    /// A clash has been scored and rewards applied.
    AfterResolve,
    /// An active skill was used.
    Activate,
    /// The owner's turn started.
    TurnStart,
}

impl FromStr for BattleEvent {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "onplay" => Ok(BattleEvent::OnPlay),
            "beforeresolve" => Ok(BattleEvent::BeforeResolve),
            "afterresolve" => Ok(BattleEvent::AfterResolve),
            "activate" => Ok(BattleEvent::Activate),
            "turnstart" | "onturnstart" => Ok(BattleEvent::TurnStart),
            _ => Err(DataError::UnknownEvent(s.to_string())),
        }
    }
}

/// Event a passive with this effect reacts to when the data names none.
#[must_use]
pub const fn default_trigger(effect: EffectId) -> Option<BattleEvent> {
    match effect {
        EffectId::HaruhiCommand => Some(BattleEvent::TurnStart),
        EffectId::StrengthPlus1 | EffectId::StrengthPlus2 => Some(BattleEvent::BeforeResolve),
        EffectId::TopicBiasPlus1 => Some(BattleEvent::AfterResolve),
        _ => None,
    }
}

/// A resolved character skill.
///
/// ## Example
///
/// ```
/// use debate_clash::cards::{EffectId, Skill, SkillKind};
///
/// let skill = Skill::active("TPL_DRAW_1", "Inspiration", EffectId::Draw1, 2, 1);
/// assert_eq!(skill.kind, SkillKind::Active);
/// assert_eq!(skill.cooldown, 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill identifier.
    pub id: SkillId,

    /// Display name.
    pub name: String,

    /// Active or passive.
    pub kind: SkillKind,

    /// TP cost (active skills).
    pub cost: u32,

    /// Turns before the skill can be used again (active skills).
    pub cooldown: u32,

    /// Cooldown at battle start (active skills).
    pub initial_cooldown: u32,

    /// Handler the skill dispatches to.
    pub effect: EffectId,

    /// Event a passive reacts to. `None` for strength-only auras.
    pub trigger: Option<BattleEvent>,
}

impl Skill {
    /// Create an active skill.
    #[must_use]
    pub fn active(
        id: impl Into<String>,
        name: impl Into<String>,
        effect: EffectId,
        cost: u32,
        cooldown: u32,
    ) -> Self {
        Self {
            id: SkillId::new(id),
            name: name.into(),
            kind: SkillKind::Active,
            cost,
            cooldown,
            initial_cooldown: 0,
            effect,
            trigger: Some(BattleEvent::Activate),
        }
    }

    /// Create a passive skill using the effect's default trigger.
    #[must_use]
    pub fn passive(id: impl Into<String>, name: impl Into<String>, effect: EffectId) -> Self {
        Self {
            id: SkillId::new(id),
            name: name.into(),
            kind: SkillKind::PassiveAura,
            cost: 0,
            cooldown: 0,
            initial_cooldown: 0,
            effect,
            trigger: default_trigger(effect),
        }
    }

    /// Set the trigger event (builder pattern).
    #[must_use]
    pub fn with_trigger(mut self, trigger: BattleEvent) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Set the cooldown at battle start (builder pattern).
    #[must_use]
    pub fn with_initial_cooldown(mut self, turns: u32) -> Self {
        self.initial_cooldown = turns;
        self
    }

    /// Check whether this is an active skill.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.kind == SkillKind::Active
    }
}

/// Skill as delivered by the data-loading layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSkill {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub initial_cooldown: u32,
    /// Effect key. Defaults to the skill id.
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub trigger: Option<String>,
}

impl TryFrom<RawSkill> for Skill {
    type Error = DataError;

    fn try_from(raw: RawSkill) -> Result<Self, Self::Error> {
        let kind: SkillKind = raw.kind.parse()?;
        let effect: EffectId = raw.effect.as_deref().unwrap_or(&raw.id).parse()?;
        let trigger = match (raw.trigger.as_deref(), kind) {
            (Some(t), _) => Some(t.parse()?),
            (None, SkillKind::Active) => Some(BattleEvent::Activate),
            (None, SkillKind::PassiveAura) => default_trigger(effect),
        };

        Ok(Self {
            id: SkillId(raw.id),
            name: raw.name,
            kind,
            cost: raw.cost,
            cooldown: raw.cooldown,
            initial_cooldown: raw.initial_cooldown,
            effect,
            trigger,
        })
    }
}
