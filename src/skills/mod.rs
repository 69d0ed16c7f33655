//! Skill effect dispatch.
//!
//! - `SkillDispatcher`: `EffectId` → handler table plus aura rules
//! - `EffectContext`: What a handler sees, and its command queue
//! - `SkillCommand`: State changes handlers request
//! - `AuraRegistry`: Staged strength rules for passive auras

mod aura;
mod context;
mod dispatcher;
mod handlers;

pub use aura::{
    genre_expert, slice_of_life_boost, AuraInput, AuraRegistry, AuraRule, AuraStage,
    SLICE_OF_LIFE_TAG,
};
pub use context::{EffectContext, Role, SkillCommand};
pub use dispatcher::{EffectHandler, RunOutcome, SkillDispatcher, SkillFault};
pub use handlers::register_builtins;
