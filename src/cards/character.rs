//! Character cards.
//!
//! Each side fields a roster of characters with one active at a time. The
//! active character's passive skills are "on the field"; its active skills
//! are the ones the player may use.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::SynergyTags;
use super::skill::{Skill, SkillId, SkillKind};

/// Identifier for a character card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

impl CharacterId {
    /// Create a new character ID.
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

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Character({})", self.0)
    }
}

/// A character card with its skills.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterCard {
    pub id: CharacterId,
    pub name: String,
    pub synergy_tags: SynergyTags,
    pub skills: Vec<Skill>,
}

impl CharacterCard {
    #[must_use]
    pub fn new(id: CharacterId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            synergy_tags: SmallVec::new(),
            skills: Vec::new(),
        }
    }

    /// Add a synergy tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into();
        if !self.synergy_tags.contains(&tag) {
            self.synergy_tags.push(tag);
        }
        self
    }

    /// Add a skill (builder pattern).
    #[must_use]
    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skills.push(skill);
        self
    }

    /// Look up a skill by id.
    #[must_use]
    pub fn skill(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.iter().find(|s| &s.id == id)
    }

    /// Passive skills in declaration order.
    pub fn passives(&self) -> impl Iterator<Item = &Skill> {
        self.skills
            .iter()
            .filter(|s| s.kind == SkillKind::PassiveAura)
    }

    /// Active skills in declaration order.
    pub fn actives(&self) -> impl Iterator<Item = &Skill> {
        self.skills.iter().filter(|s| s.kind == SkillKind::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::EffectId;

    fn haruhi() -> CharacterCard {
        CharacterCard::new(CharacterId::new(1), "Haruhi")
            .with_tag("sci-fi")
            .with_skill(Skill::active("TPL_DRAW_1", "Inspiration", EffectId::Draw1, 2, 1))
            .with_skill(Skill::passive("HARUHI_AURA", "Brigade Chief", EffectId::HaruhiCommand))
    }

    #[test]
    fn test_skill_lookup() {
        let c = haruhi();
        assert!(c.skill(&SkillId::new("TPL_DRAW_1")).is_some());
        assert!(c.skill(&SkillId::new("MISSING")).is_none());
    }

    #[test]
    fn test_skill_partition() {
        let c = haruhi();
        assert_eq!(c.actives().count(), 1);
        assert_eq!(c.passives().count(), 1);
        assert_eq!(c.passives().next().unwrap().effect, EffectId::HaruhiCommand);
    }
}
