//! Duration-scoped persistent effects.
//!
//! - `PersistentEffect`: Effect with apply/expire/turn hooks
//! - `TemporaryBonus`: Strength or cost modifier, optionally tag-filtered
//! - `Restriction`: Per-side limit keyed by `RestrictionKind`
//! - `PersistentEffectRegistry`: The per-battle store
//!
//! Durations count turn starts. Hooks come back as `HookFiring` data for
//! the battle session to apply.

mod effect;
mod registry;

pub use effect::{
    BonusId, BonusKind, Duration, EffectHooks, HookAction, HookFiring, HookPhase,
    PersistentEffect, PersistentEffectId, Restriction, RestrictionData, RestrictionKind,
    TemporaryBonus,
};
pub use registry::PersistentEffectRegistry;
