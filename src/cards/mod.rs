//! Cards, characters, skills and deck assembly.
//!
//! ## Key Types
//!
//! - `Card`: Immutable playable card (cost, strength, synergy tags, card effects)
//! - `CharacterCard`: Roster entry carrying skills
//! - `Skill`: Active or passive skill bound to an `EffectId`
//! - `EffectId`: Stable handler key resolved from authoring strings
//! - `CardRegistry`: Lookup and `Deck` assembly

pub mod card;
pub mod character;
pub mod effect_id;
pub mod registry;
pub mod skill;

pub use card::{Card, CardEffect, CardId, CardMatch, RawCardEffect, SynergyTags};
pub use character::{CharacterCard, CharacterId};
pub use effect_id::EffectId;
pub use registry::{CardRegistry, Deck};
pub use skill::{default_trigger, BattleEvent, RawSkill, Skill, SkillId, SkillKind};
