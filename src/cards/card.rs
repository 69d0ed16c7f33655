//! Playable cards.
//!
//! A `Card` is an immutable value object supplied by the data-loading layer.
//! Decks may hold several copies of the same card; copies share a `CardId`.
//! Cards may carry their own effects, which run for the side that played
//! the card at `OnPlay`, `BeforeResolve` and `AfterResolve`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::effect_id::EffectId;
use super::skill::BattleEvent;
use crate::core::DataError;

/// Synergy tags carried by cards and characters.
pub type SynergyTags = SmallVec<[String; 4]>;

/// Identifier for a card definition.
///
/// Identifies the card (e.g. "Bocchi Monologue"), not a specific copy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// An effect printed on a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardEffect {
    pub trigger: BattleEvent,
    pub effect: EffectId,
}

impl CardEffect {
    #[must_use]
    pub const fn new(trigger: BattleEvent, effect: EffectId) -> Self {
        Self { trigger, effect }
    }

    /// Effects a card of `rarity` gets when its data names none.
    #[must_use]
    pub fn rarity_defaults(rarity: &str) -> Vec<CardEffect> {
        let (trigger, effect) = match rarity.trim() {
            "R" => (BattleEvent::OnPlay, EffectId::Draw1),
            "SR" => (BattleEvent::OnPlay, EffectId::GainTp1),
            "SSR" => (BattleEvent::BeforeResolve, EffectId::StrengthPlus1),
            "HR" => (BattleEvent::AfterResolve, EffectId::TopicBiasPlus1),
            _ => return Vec::new(),
        };
        vec![CardEffect::new(trigger, effect)]
    }
}

/// Card effect as delivered by the data-loading layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCardEffect {
    pub trigger: String,
    pub effect_id: String,
}

impl TryFrom<RawCardEffect> for CardEffect {
    type Error = DataError;

    fn try_from(raw: RawCardEffect) -> Result<Self, Self::Error> {
        Ok(Self {
            trigger: raw.trigger.parse()?,
            effect: raw.effect_id.parse()?,
        })
    }
}

/// A playable card.
///
/// ## Example
///
/// ```
/// use debate_clash::cards::{Card, CardId};
///
/// let card = Card::new(CardId::new(1), "Endless Eight", 2, 4)
///     .with_tag("slice-of-life")
///     .with_tag("sci-fi");
///
/// assert!(card.has_tag("sci-fi"));
/// assert_eq!(card.cost, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Definition identifier, shared by copies.
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// TP needed to play the card (before style cost and reductions).
    pub cost: u32,

    /// Base battle strength.
    pub strength: i64,

    /// Tags used for match classification and aura conditions.
    pub synergy_tags: SynergyTags,

    /// Effects run for the side that plays this card.
    #[serde(default)]
    pub effects: Vec<CardEffect>,
}

impl Card {
    /// Create a card with no tags.
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, cost: u32, strength: i64) -> Self {
        Self {
            id,
            name: name.into(),
            cost,
            strength,
            synergy_tags: SmallVec::new(),
            effects: Vec::new(),
        }
    }

    /// Add a card effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, trigger: BattleEvent, effect: EffectId) -> Self {
        self.effects.push(CardEffect::new(trigger, effect));
        self
    }

    /// Resolve authoring effects onto the card.
    ///
    /// With no authored effects the card falls back to its rarity defaults.
    pub fn with_raw_effects(
        mut self,
        raw: Vec<RawCardEffect>,
        rarity: Option<&str>,
    ) -> Result<Self, DataError> {
        self.effects = raw
            .into_iter()
            .map(CardEffect::try_from)
            .collect::<Result<_, _>>()?;
        if self.effects.is_empty() {
            self.effects = rarity.map(CardEffect::rarity_defaults).unwrap_or_default();
        }
        Ok(self)
    }

    /// Effects of this card reacting to `event`, in authoring order.
    pub fn effects_for(&self, event: BattleEvent) -> impl Iterator<Item = EffectId> + '_ {
        self.effects
            .iter()
            .filter(move |e| e.trigger == event)
            .map(|e| e.effect)
    }

    /// Add a synergy tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.has_tag(&tag) {
            self.synergy_tags.push(tag);
        }
        self
    }

    /// Check whether the card carries a tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.synergy_tags.iter().any(|t| t == tag)
    }

    /// Check whether the card shares at least one tag with `tags`.
    #[must_use]
    pub fn shares_tag_with(&self, tags: &[String]) -> bool {
        self.synergy_tags.iter().any(|t| tags.contains(t))
    }
}

/// How the attacking and defending cards of a clash relate.
///
/// Reported with each resolved clash; rewards do not depend on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardMatch {
    /// Both sides played the same card.
    SameCard,
    /// The cards share at least one synergy tag.
    SameTag,
    /// No shared tag, or the defense was passed.
    Different,
}

impl CardMatch {
    /// Classify an attacking card against an optional defending card.
    #[must_use]
    pub fn classify(attacking: &Card, defending: Option<&Card>) -> Self {
        match defending {
            Some(d) if d.id == attacking.id => CardMatch::SameCard,
            Some(d) if attacking.shares_tag_with(&d.synergy_tags) => CardMatch::SameTag,
            _ => CardMatch::Different,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(format!("{}", id), "Card(7)");
    }

    #[test]
    fn test_tags_deduplicated() {
        let card = Card::new(CardId::new(1), "Test", 1, 1)
            .with_tag("comedy")
            .with_tag("comedy");
        assert_eq!(card.synergy_tags.len(), 1);
    }

    #[test]
    fn test_card_match() {
        let a = Card::new(CardId::new(1), "A", 1, 3).with_tag("mecha");
        let b = Card::new(CardId::new(2), "B", 1, 3).with_tag("mecha");
        let c = Card::new(CardId::new(3), "C", 1, 3).with_tag("idol");

        assert_eq!(CardMatch::classify(&a, Some(&a.clone())), CardMatch::SameCard);
        assert_eq!(CardMatch::classify(&a, Some(&b)), CardMatch::SameTag);
        assert_eq!(CardMatch::classify(&a, Some(&c)), CardMatch::Different);
        assert_eq!(CardMatch::classify(&a, None), CardMatch::Different);
    }

    #[test]
    fn test_raw_effects_resolve() {
        let json = r#"[
            { "trigger": "onPlay", "effectId": "DRAW_1" },
            { "trigger": "beforeResolve", "effectId": "STRENGTH_PLUS_2" }
        ]"#;
        let raw: Vec<RawCardEffect> = serde_json::from_str(json).unwrap();
        let card = Card::new(CardId::new(847), "Lucky Star", 1, 3)
            .with_raw_effects(raw, Some("SSR"))
            .unwrap();

        assert_eq!(card.effects_for(BattleEvent::OnPlay).collect::<Vec<_>>(), vec![EffectId::Draw1]);
        assert_eq!(
            card.effects_for(BattleEvent::BeforeResolve).collect::<Vec<_>>(),
            vec![EffectId::StrengthPlus2]
        );
        assert_eq!(card.effects_for(BattleEvent::AfterResolve).count(), 0);
    }

    #[test]
    fn test_rarity_defaults_only_without_authored_effects() {
        let card = Card::new(CardId::new(1), "Plain", 1, 3)
            .with_raw_effects(Vec::new(), Some("HR"))
            .unwrap();
        assert_eq!(
            card.effects,
            vec![CardEffect::new(BattleEvent::AfterResolve, EffectId::TopicBiasPlus1)]
        );

        let common = Card::new(CardId::new(2), "Common", 1, 3)
            .with_raw_effects(Vec::new(), Some("N"))
            .unwrap();
        assert!(common.effects.is_empty());
    }

    #[test]
    fn test_unknown_card_effect_rejected() {
        let raw = vec![RawCardEffect {
            trigger: "onPlay".into(),
            effect_id: "SUMMON_DRAGON".into(),
        }];
        let result = Card::new(CardId::new(3), "Broken", 1, 3).with_raw_effects(raw, None);
        assert_eq!(result, Err(DataError::UnknownEffect("SUMMON_DRAGON".into())));
    }

    #[test]
    fn test_serialization() {
        let card = Card::new(CardId::new(4), "Serial", 2, 5)
            .with_tag("isekai")
            .with_effect(BattleEvent::OnPlay, EffectId::GainTp1);
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
