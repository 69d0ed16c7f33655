//! Persistent effect registry.
//!
//! One registry per battle, owned by the battle session. Entries are kept in
//! `im::OrdMap`s so iteration follows insertion id and read-only snapshots
//! are cheap.

use im::OrdMap;
use tracing::debug;

use super::effect::{
    BonusId, BonusKind, Duration, HookFiring, HookPhase, PersistentEffect, PersistentEffectId,
    Restriction, RestrictionData, RestrictionKind, TemporaryBonus,
};
use crate::cards::{Card, SkillId};
use crate::core::{AttackStyle, PlayerId};

/// Time-scoped store of effects, bonuses and restrictions.
///
/// ## Example
///
/// ```
/// use debate_clash::cards::{Card, CardId};
/// use debate_clash::core::PlayerId;
/// use debate_clash::effects::PersistentEffectRegistry;
///
/// let mut registry = PersistentEffectRegistry::new();
/// registry.add_tag_strength_bonus(PlayerId::A, "sci-fi", 2, 1);
///
/// let card = Card::new(CardId::new(1), "Time Leap", 1, 3).with_tag("sci-fi");
/// assert_eq!(registry.get_strength_bonus(PlayerId::A, &card, false), 2);
///
/// registry.on_turn_start(PlayerId::B);
/// assert_eq!(registry.get_strength_bonus(PlayerId::A, &card, false), 0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct PersistentEffectRegistry {
    effects: OrdMap<PersistentEffectId, PersistentEffect>,
    bonuses: OrdMap<BonusId, TemporaryBonus>,
    restrictions: OrdMap<(PlayerId, RestrictionKind), Restriction>,
    next_effect_id: u32,
    next_bonus_id: u32,
}

impl PersistentEffectRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect and fire its apply hook.
    ///
    /// An effect with `Duration::Turns(0)` fires its apply and expire hooks
    /// and is not stored.
    pub fn add_effect(
        &mut self,
        mut effect: PersistentEffect,
    ) -> (PersistentEffectId, Vec<HookFiring>) {
        self.next_effect_id += 1;
        let id = PersistentEffectId::new(self.next_effect_id);
        effect.id = id;

        let mut firings: Vec<HookFiring> = effect.fire(HookPhase::Apply).into_iter().collect();
        if effect.duration.is_immediate() {
            firings.extend(effect.fire(HookPhase::Expire));
            debug!(%id, description = %effect.description, "immediate effect fired");
        } else {
            debug!(%id, owner = %effect.owner, description = %effect.description, "effect added");
            self.effects.insert(id, effect);
        }
        (id, firings)
    }

    /// Add a temporary bonus. A bonus with `Duration::Turns(0)` is not stored.
    pub fn add_temporary_bonus(&mut self, mut bonus: TemporaryBonus) -> BonusId {
        self.next_bonus_id += 1;
        let id = BonusId::new(self.next_bonus_id);
        bonus.id = id;

        if !bonus.duration.is_immediate() {
            debug!(owner = %bonus.owner, kind = ?bonus.kind, amount = bonus.amount, "bonus added");
            self.bonuses.insert(id, bonus);
        }
        id
    }

    /// Add a restriction, replacing any of the same kind on that side.
    pub fn add_restriction(
        &mut self,
        player: PlayerId,
        kind: RestrictionKind,
        data: RestrictionData,
        duration: Duration,
    ) {
        if duration.is_immediate() {
            return;
        }
        debug!(%player, ?kind, ?data, "restriction added");
        self.restrictions.insert(
            (player, kind),
            Restriction {
                kind,
                data,
                duration,
            },
        );
    }

    /// Strength bonus for a side's tagged card for `turns` turns.
    pub fn add_tag_strength_bonus(
        &mut self,
        player: PlayerId,
        tag: &str,
        amount: i64,
        turns: u32,
    ) -> BonusId {
        self.add_temporary_bonus(
            TemporaryBonus::new(player, BonusKind::Strength, amount, Duration::Turns(turns))
                .for_tag(tag)
                .with_description(format!("{tag} cards +{amount} strength ({turns} turns)")),
        )
    }

    /// Cost reduction for a side's tagged card for `turns` turns.
    pub fn add_tag_cost_reduction(
        &mut self,
        player: PlayerId,
        tag: &str,
        amount: i64,
        turns: u32,
    ) -> BonusId {
        self.add_temporary_bonus(
            TemporaryBonus::new(player, BonusKind::Cost, amount, Duration::Turns(turns))
                .for_tag(tag)
                .with_description(format!("{tag} cards -{amount} cost ({turns} turns)")),
        )
    }

    /// Disable one skill, or every skill with `None`, for `turns` turns.
    pub fn add_skill_disable(&mut self, player: PlayerId, skill: Option<SkillId>, turns: u32) {
        let data = skill.map_or(RestrictionData::AllSkills, RestrictionData::Skill);
        self.add_restriction(
            player,
            RestrictionKind::SkillDisabled,
            data,
            Duration::Turns(turns),
        );
    }

    /// Force a side's attacks to use `style` for `turns` turns.
    pub fn add_forced_attack_style(&mut self, player: PlayerId, style: AttackStyle, turns: u32) {
        self.add_restriction(
            player,
            RestrictionKind::ForcedAttackStyle,
            RestrictionData::AttackStyle(style),
            Duration::Turns(turns),
        );
    }

    /// Fire every effect's turn-start hook, then decay all durations.
    ///
    /// Hooks fire for every effect regardless of owner. Entries reaching 0
    /// are removed; expiring effects fire their expire hooks after all
    /// turn-start hooks.
    pub fn on_turn_start(&mut self, player: PlayerId) -> Vec<HookFiring> {
        debug!(%player, effects = self.effects.len(), "effect registry turn start");
        let mut firings: Vec<HookFiring> = self
            .effects
            .values()
            .filter_map(|e| e.fire(HookPhase::TurnStart))
            .collect();
        firings.extend(self.decay());
        firings
    }

    /// Fire every effect's turn-end hook. Durations are unchanged.
    pub fn on_turn_end(&mut self, player: PlayerId) -> Vec<HookFiring> {
        debug!(%player, effects = self.effects.len(), "effect registry turn end");
        self.effects
            .values()
            .filter_map(|e| e.fire(HookPhase::TurnEnd))
            .collect()
    }

    fn decay(&mut self) -> Vec<HookFiring> {
        let mut firings = Vec::new();

        let ids: Vec<_> = self.effects.keys().copied().collect();
        for id in ids {
            let expired = self
                .effects
                .get_mut(&id)
                .is_some_and(|e| e.duration.tick());
            if !expired {
                continue;
            }
            if let Some(effect) = self.effects.remove(&id) {
                debug!(%id, description = %effect.description, "effect expired");
                firings.extend(effect.fire(HookPhase::Expire));
            }
        }

        let ids: Vec<_> = self.bonuses.keys().copied().collect();
        for id in ids {
            if self.bonuses.get_mut(&id).is_some_and(|b| b.duration.tick()) {
                self.bonuses.remove(&id);
            }
        }

        let keys: Vec<_> = self.restrictions.keys().copied().collect();
        for key in keys {
            if self
                .restrictions
                .get_mut(&key)
                .is_some_and(|r| r.duration.tick())
            {
                self.restrictions.remove(&key);
            }
        }

        firings
    }

    /// Remove an effect early, firing its expire hook.
    ///
    /// Returns `None` when no such effect is stored.
    pub fn remove_effect(&mut self, id: PersistentEffectId) -> Option<Vec<HookFiring>> {
        let effect = self.effects.remove(&id)?;
        debug!(%id, description = %effect.description, "effect removed");
        Some(effect.fire(HookPhase::Expire).into_iter().collect())
    }

    /// Sum of strength bonuses applying to `card` played by `player`.
    #[must_use]
    pub fn get_strength_bonus(&self, player: PlayerId, card: &Card, wildcard: bool) -> i64 {
        self.sum_bonuses(BonusKind::Strength, player, card, wildcard)
    }

    /// Sum of cost reductions applying to `card` played by `player`.
    #[must_use]
    pub fn get_cost_reduction(&self, player: PlayerId, card: &Card, wildcard: bool) -> i64 {
        self.sum_bonuses(BonusKind::Cost, player, card, wildcard)
    }

    fn sum_bonuses(&self, kind: BonusKind, player: PlayerId, card: &Card, wildcard: bool) -> i64 {
        self.bonuses
            .values()
            .filter(|b| b.kind == kind && b.applies_to(player, card, wildcard))
            .map(|b| b.amount)
            .sum()
    }

    /// Check whether a side is under a restriction of `kind`.
    #[must_use]
    pub fn has_restriction(&self, player: PlayerId, kind: RestrictionKind) -> bool {
        self.restrictions.contains_key(&(player, kind))
    }

    /// The restriction of `kind` on a side.
    #[must_use]
    pub fn restriction(&self, player: PlayerId, kind: RestrictionKind) -> Option<&Restriction> {
        self.restrictions.get(&(player, kind))
    }

    /// Check whether `skill` is disabled for a side.
    #[must_use]
    pub fn is_skill_disabled(&self, player: PlayerId, skill: &SkillId) -> bool {
        match self.restriction(player, RestrictionKind::SkillDisabled) {
            Some(r) => match &r.data {
                RestrictionData::AllSkills => true,
                RestrictionData::Skill(id) => id == skill,
                RestrictionData::AttackStyle(_) => false,
            },
            None => false,
        }
    }

    /// Style a side's attacks are forced to, if any.
    #[must_use]
    pub fn forced_attack_style(&self, player: PlayerId) -> Option<AttackStyle> {
        match self.restriction(player, RestrictionKind::ForcedAttackStyle)?.data {
            RestrictionData::AttackStyle(style) => Some(style),
            _ => None,
        }
    }

    /// Get an effect by ID.
    #[must_use]
    pub fn get(&self, id: PersistentEffectId) -> Option<&PersistentEffect> {
        self.effects.get(&id)
    }

    /// Effects owned by a side, in insertion order.
    pub fn active_effects(&self, player: PlayerId) -> Vec<&PersistentEffect> {
        self.effects.values().filter(|e| e.owner == player).collect()
    }

    /// Bonuses owned by a side, in insertion order.
    pub fn active_bonuses(&self, player: PlayerId) -> Vec<&TemporaryBonus> {
        self.bonuses.values().filter(|b| b.owner == player).collect()
    }

    /// Drop every entry. Called once when the battle ends.
    pub fn clear_all(&mut self) {
        debug!(
            effects = self.effects.len(),
            bonuses = self.bonuses.len(),
            restrictions = self.restrictions.len(),
            "effect registry cleared"
        );
        self.effects.clear();
        self.bonuses.clear();
        self.restrictions.clear();
    }

    /// Total stored entries of all three kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len() + self.bonuses.len() + self.restrictions.len()
    }

    /// Check if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
