//! Passive aura strength rules.
//!
//! Each rule is registered for one `EffectId` with a stage. The strength
//! calculator runs every `Additive` rule before any `Multiplicative` rule,
//! and within a stage follows registration order.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, EffectId};
use crate::core::PlayerId;

/// When an aura rule runs relative to others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AuraStage {
    Additive,
    Multiplicative,
}

impl AuraStage {
    pub const ORDER: [AuraStage; 2] = [AuraStage::Additive, AuraStage::Multiplicative];
}

/// What an aura rule sees for one card.
#[derive(Clone, Copy, Debug)]
pub struct AuraInput<'a> {
    /// Side whose active character carries the aura.
    pub aura_owner: PlayerId,
    /// Tags of the aura owner's active character.
    pub aura_owner_tags: &'a [String],
    /// Side that played the card.
    pub card_owner: PlayerId,
    pub card: &'a Card,
    /// The card matches any tag.
    pub wildcard: bool,
}

impl AuraInput<'_> {
    /// Check whether the card is the aura owner's own.
    #[must_use]
    pub fn is_own_card(&self) -> bool {
        self.aura_owner == self.card_owner
    }

    /// Tag test honouring the wildcard flag.
    #[must_use]
    pub fn card_has_tag(&self, tag: &str) -> bool {
        self.wildcard || self.card.has_tag(tag)
    }
}

/// A strength rule: takes the strength so far and returns the new value.
pub trait AuraRule: Send + Sync {
    fn apply(&self, input: &AuraInput<'_>, strength: i64) -> i64;
}

impl<F> AuraRule for F
where
    F: Fn(&AuraInput<'_>, i64) -> i64 + Send + Sync,
{
    fn apply(&self, input: &AuraInput<'_>, strength: i64) -> i64 {
        self(input, strength)
    }
}

struct RegisteredAura {
    effect: EffectId,
    stage: AuraStage,
    rule: Box<dyn AuraRule>,
}

/// Aura rules in registration order.
#[derive(Default)]
pub struct AuraRegistry {
    rules: Vec<RegisteredAura>,
}

impl AuraRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a rule for an effect id. Later registrations for the same id
    /// run after earlier ones.
    pub fn register(&mut self, effect: EffectId, stage: AuraStage, rule: impl AuraRule + 'static) {
        self.rules.push(RegisteredAura {
            effect,
            stage,
            rule: Box::new(rule),
        });
    }

    /// Check whether any rule exists for an effect id.
    #[must_use]
    pub fn contains(&self, effect: EffectId) -> bool {
        self.rules.iter().any(|r| r.effect == effect)
    }

    /// Rules of a stage, in registration order.
    pub fn stage(&self, stage: AuraStage) -> impl Iterator<Item = (EffectId, &dyn AuraRule)> {
        self.rules
            .iter()
            .filter(move |r| r.stage == stage)
            .map(|r| (r.effect, r.rule.as_ref()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for AuraRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| (r.effect, r.stage)))
            .finish()
    }
}

/// +1 to the owner's card when it shares a tag with the owner's active
/// character.
pub fn genre_expert(input: &AuraInput<'_>, strength: i64) -> i64 {
    let shares = (input.wildcard && !input.aura_owner_tags.is_empty())
        || input.card.shares_tag_with(input.aura_owner_tags);
    if input.is_own_card() && shares {
        strength + 1
    } else {
        strength
    }
}

/// Tag the slice-of-life aura looks for.
pub const SLICE_OF_LIFE_TAG: &str = "slice-of-life";

/// +1 to the owner's slice-of-life cards.
pub fn slice_of_life_boost(input: &AuraInput<'_>, strength: i64) -> i64 {
    if input.is_own_card() && input.card_has_tag(SLICE_OF_LIFE_TAG) {
        strength + 1
    } else {
        strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardId;

    fn input<'a>(card: &'a Card, tags: &'a [String], card_owner: PlayerId) -> AuraInput<'a> {
        AuraInput {
            aura_owner: PlayerId::A,
            aura_owner_tags: tags,
            card_owner,
            card,
            wildcard: false,
        }
    }

    #[test]
    fn test_genre_expert() {
        let tags = vec!["sci-fi".to_string()];
        let matching = Card::new(CardId::new(1), "Matching", 1, 3).with_tag("sci-fi");
        let other = Card::new(CardId::new(2), "Other", 1, 3).with_tag("sports");

        assert_eq!(genre_expert(&input(&matching, &tags, PlayerId::A), 3), 4);
        assert_eq!(genre_expert(&input(&other, &tags, PlayerId::A), 3), 3);
        assert_eq!(genre_expert(&input(&matching, &tags, PlayerId::B), 3), 3);

        let wild = AuraInput { wildcard: true, ..input(&other, &tags, PlayerId::A) };
        assert_eq!(genre_expert(&wild, 3), 4);
    }

    #[test]
    fn test_slice_of_life_boost() {
        let card = Card::new(CardId::new(1), "Lazy Sunday", 1, 2).with_tag(SLICE_OF_LIFE_TAG);
        assert_eq!(slice_of_life_boost(&input(&card, &[], PlayerId::A), 2), 3);
        assert_eq!(slice_of_life_boost(&input(&card, &[], PlayerId::B), 2), 2);
    }

    #[test]
    fn test_stage_order() {
        let mut auras = AuraRegistry::new();
        auras.register(EffectId::GenreExpert, AuraStage::Multiplicative, |_: &AuraInput<'_>, s: i64| s * 2);
        auras.register(EffectId::SliceOfLifeBoost, AuraStage::Additive, slice_of_life_boost);

        let additive: Vec<_> = auras.stage(AuraStage::Additive).map(|(e, _)| e).collect();
        assert_eq!(additive, vec![EffectId::SliceOfLifeBoost]);
        assert!(auras.contains(EffectId::GenreExpert));
        assert!(!auras.contains(EffectId::Draw1));
    }
}
