//! Persistent effects, temporary bonuses and restrictions.
//!
//! Hooks are data. The registry returns `HookFiring`s and the battle session
//! applies them, so nothing here writes player or game state.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, SkillId};
use crate::core::{AttackStyle, PlayerId};

/// How long an entry lives, counted in turn starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duration {
    /// Never decays.
    Permanent,
    /// Removed at the turn start that brings the count to 0.
    /// `Turns(0)` fires immediately and is never stored.
    Turns(u32),
}

impl Duration {
    /// Check whether the entry is spent on arrival.
    #[must_use]
    pub const fn is_immediate(self) -> bool {
        matches!(self, Duration::Turns(0))
    }

    /// Decay by one turn. Returns `true` when the entry has expired.
    pub fn tick(&mut self) -> bool {
        match self {
            Duration::Permanent => false,
            Duration::Turns(n) => {
                *n = n.saturating_sub(1);
                *n == 0
            }
        }
    }
}

/// Unique identifier for a persistent effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersistentEffectId(pub u32);

impl PersistentEffectId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PersistentEffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect({})", self.0)
    }
}

/// A state change requested by a hook.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookAction {
    /// Gain (positive) or lose (negative) TP, bounded by 0 and the TP limit.
    ModifyTp { player: PlayerId, amount: i64 },
    /// Change reputation.
    ModifyReputation { player: PlayerId, amount: i64 },
    /// Move the topic bias `amount` points toward `toward`.
    ShiftTopicBias { toward: PlayerId, amount: i64 },
    /// Draw cards.
    DrawCards { player: PlayerId, count: u32 },
}

/// Hook lists of a persistent effect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectHooks {
    pub on_apply: Vec<HookAction>,
    pub on_expire: Vec<HookAction>,
    pub on_turn_start: Vec<HookAction>,
    pub on_turn_end: Vec<HookAction>,
}

/// Which hook fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookPhase {
    Apply,
    Expire,
    TurnStart,
    TurnEnd,
}

/// Actions of one hook invocation, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookFiring {
    pub effect: PersistentEffectId,
    pub phase: HookPhase,
    pub actions: Vec<HookAction>,
}

/// A duration-scoped effect with turn-boundary hooks.
///
/// ## Example
///
/// ```
/// use debate_clash::core::PlayerId;
/// use debate_clash::effects::{Duration, HookAction, PersistentEffect};
///
/// let effect = PersistentEffect::new(PlayerId::A, "Morale", Duration::Turns(2))
///     .on_turn_start(HookAction::ModifyTp { player: PlayerId::A, amount: 1 });
///
/// assert_eq!(effect.hooks.on_turn_start.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentEffect {
    /// Assigned by the registry on insertion.
    pub id: PersistentEffectId,
    pub owner: PlayerId,
    pub description: String,
    pub duration: Duration,
    pub hooks: EffectHooks,
    /// Free-form payload for hosts and skill handlers.
    pub data: FxHashMap<String, i64>,
}

impl PersistentEffect {
    #[must_use]
    pub fn new(owner: PlayerId, description: impl Into<String>, duration: Duration) -> Self {
        Self {
            id: PersistentEffectId::new(0),
            owner,
            description: description.into(),
            duration,
            hooks: EffectHooks::default(),
            data: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn on_apply(mut self, action: HookAction) -> Self {
        self.hooks.on_apply.push(action);
        self
    }

    #[must_use]
    pub fn on_expire(mut self, action: HookAction) -> Self {
        self.hooks.on_expire.push(action);
        self
    }

    #[must_use]
    pub fn on_turn_start(mut self, action: HookAction) -> Self {
        self.hooks.on_turn_start.push(action);
        self
    }

    #[must_use]
    pub fn on_turn_end(mut self, action: HookAction) -> Self {
        self.hooks.on_turn_end.push(action);
        self
    }

    /// Attach a payload value (builder pattern).
    #[must_use]
    pub fn with_data(mut self, key: impl Into<String>, value: i64) -> Self {
        self.data.insert(key.into(), value);
        self
    }

    pub(crate) fn hooks_for(&self, phase: HookPhase) -> &[HookAction] {
        match phase {
            HookPhase::Apply => &self.hooks.on_apply,
            HookPhase::Expire => &self.hooks.on_expire,
            HookPhase::TurnStart => &self.hooks.on_turn_start,
            HookPhase::TurnEnd => &self.hooks.on_turn_end,
        }
    }

    /// The firing for a hook, or `None` when the hook is empty.
    pub(crate) fn fire(&self, phase: HookPhase) -> Option<HookFiring> {
        let actions = self.hooks_for(phase);
        (!actions.is_empty()).then(|| HookFiring {
            effect: self.id,
            phase,
            actions: actions.to_vec(),
        })
    }
}

/// Unique identifier for a temporary bonus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BonusId(pub u32);

impl BonusId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// What a temporary bonus modifies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Added to battle strength.
    Strength,
    /// Subtracted from card cost.
    Cost,
}

/// A strength or cost modifier for one side, optionally limited to a tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryBonus {
    /// Assigned by the registry on insertion.
    pub id: BonusId,
    pub owner: PlayerId,
    pub kind: BonusKind,
    /// Only cards carrying this tag qualify. `None` matches every card.
    pub tag: Option<String>,
    pub amount: i64,
    pub duration: Duration,
    pub description: String,
}

impl TemporaryBonus {
    #[must_use]
    pub fn new(owner: PlayerId, kind: BonusKind, amount: i64, duration: Duration) -> Self {
        Self {
            id: BonusId::new(0),
            owner,
            kind,
            tag: None,
            amount,
            duration,
            description: String::new(),
        }
    }

    /// Limit the bonus to cards with a tag (builder pattern).
    #[must_use]
    pub fn for_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check whether the bonus applies to `card` played by `player`.
    ///
    /// A wildcard card matches every tag filter.
    #[must_use]
    pub fn applies_to(&self, player: PlayerId, card: &Card, wildcard: bool) -> bool {
        self.owner == player
            && match &self.tag {
                None => true,
                Some(tag) => wildcard || card.has_tag(tag),
            }
    }
}

/// Kinds of restriction. At most one restriction per side and kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RestrictionKind {
    /// Active skills may not be used.
    SkillDisabled,
    /// Attacks must use a given style.
    ForcedAttackStyle,
}

/// Restriction payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestrictionData {
    /// Every skill.
    AllSkills,
    Skill(SkillId),
    AttackStyle(AttackStyle),
}

/// A restriction on one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restriction {
    pub kind: RestrictionKind,
    pub data: RestrictionData,
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    #[test]
    fn test_duration_tick() {
        let mut d = Duration::Turns(2);
        assert!(!d.tick());
        assert!(d.tick());
        assert_eq!(d, Duration::Turns(0));

        let mut p = Duration::Permanent;
        assert!(!p.tick());
        assert!(Duration::Turns(0).is_immediate());
    }

    #[test]
    fn test_empty_hook_does_not_fire() {
        let effect = PersistentEffect::new(PlayerId::B, "Quiet", Duration::Permanent)
            .on_turn_end(HookAction::DrawCards { player: PlayerId::B, count: 1 });
        assert!(effect.fire(HookPhase::TurnStart).is_none());

        let firing = effect.fire(HookPhase::TurnEnd).unwrap();
        assert_eq!(firing.actions.len(), 1);
    }

    #[test]
    fn test_bonus_tag_filter() {
        let mecha = Card::new(CardId::new(1), "Mecha", 1, 3).with_tag("mecha");
        let idol = Card::new(CardId::new(2), "Idol", 1, 3).with_tag("idol");
        let bonus = TemporaryBonus::new(PlayerId::A, BonusKind::Strength, 2, Duration::Turns(1))
            .for_tag("mecha");

        assert!(bonus.applies_to(PlayerId::A, &mecha, false));
        assert!(!bonus.applies_to(PlayerId::A, &idol, false));
        assert!(bonus.applies_to(PlayerId::A, &idol, true));
        assert!(!bonus.applies_to(PlayerId::B, &mecha, false));
    }
}
