//! Skill effect dispatcher.
//!
//! Maps each `EffectId` to a handler. Running an effect never fails the
//! battle: an id with no handler logs a warning and does nothing, and a
//! handler that returns a fault or panics is logged and its queued commands
//! are discarded.

use std::panic::{catch_unwind, AssertUnwindSafe};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{error, trace, warn};

use super::aura::{AuraRegistry, AuraRule, AuraStage};
use super::context::EffectContext;
use super::handlers;
use crate::cards::EffectId;

/// A handler's runtime failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkillFault {
    #[error("Handler precondition failed: {0}")]
    Precondition(String),

    #[error("Handler failed: {0}")]
    Failed(String),
}

/// A skill effect handler.
pub trait EffectHandler: Send + Sync {
    fn run(&self, ctx: &mut EffectContext<'_>) -> Result<(), SkillFault>;
}

impl<F> EffectHandler for F
where
    F: Fn(&mut EffectContext<'_>) -> Result<(), SkillFault> + Send + Sync,
{
    fn run(&self, ctx: &mut EffectContext<'_>) -> Result<(), SkillFault> {
        self(ctx)
    }
}

/// How a single `run_effect` call ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// No handler is registered for the id.
    Unhandled,
    /// The handler returned a fault.
    Faulted(SkillFault),
    /// The handler panicked.
    Panicked,
}

/// Registry of effect handlers and aura rules.
///
/// ## Example
///
/// ```
/// use debate_clash::cards::{BattleEvent, EffectId};
/// use debate_clash::core::{GameRng, PlayerId};
/// use debate_clash::skills::{EffectContext, Role, SkillCommand, SkillDispatcher};
///
/// let dispatcher = SkillDispatcher::with_builtins();
/// let mut rng = GameRng::new(42);
/// let mut ctx = EffectContext::new(BattleEvent::Activate, PlayerId::A, Role::Attacker, 0, &mut rng);
///
/// dispatcher.run_effect(EffectId::GainTp2, &mut ctx);
/// assert_eq!(ctx.commands(), &[SkillCommand::GainTp { player: PlayerId::A, amount: 2 }]);
/// ```
#[derive(Default)]
pub struct SkillDispatcher {
    handlers: FxHashMap<EffectId, Box<dyn EffectHandler>>,
    auras: AuraRegistry,
}

impl SkillDispatcher {
    /// Create a dispatcher with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dispatcher with every built-in handler and aura rule.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut dispatcher = Self::new();
        handlers::register_builtins(&mut dispatcher);
        dispatcher
    }

    /// Register a handler, replacing any previous one for the id.
    pub fn register(&mut self, effect: EffectId, handler: impl EffectHandler + 'static) {
        self.handlers.insert(effect, Box::new(handler));
    }

    /// Register an aura rule.
    pub fn register_aura(
        &mut self,
        effect: EffectId,
        stage: AuraStage,
        rule: impl AuraRule + 'static,
    ) {
        self.auras.register(effect, stage, rule);
    }

    /// Aura rules, for the strength calculator.
    #[must_use]
    pub fn auras(&self) -> &AuraRegistry {
        &self.auras
    }

    /// Check whether an id has a handler.
    #[must_use]
    pub fn has_handler(&self, effect: EffectId) -> bool {
        self.handlers.contains_key(&effect)
    }

    /// Check whether an id has a handler or an aura rule.
    #[must_use]
    pub fn is_registered(&self, effect: EffectId) -> bool {
        self.has_handler(effect) || self.auras.contains(effect)
    }

    /// Run the handler for `effect` against `ctx`.
    ///
    /// Commands queued by a handler that faults or panics are removed from
    /// the context; commands queued earlier are kept.
    pub fn run_effect(&self, effect: EffectId, ctx: &mut EffectContext<'_>) -> RunOutcome {
        let Some(handler) = self.handlers.get(&effect) else {
            warn!(%effect, event = ?ctx.event, "effect handler not found");
            return RunOutcome::Unhandled;
        };

        let mark = ctx.commands().len();
        let result = catch_unwind(AssertUnwindSafe(|| handler.run(ctx)));
        match result {
            Ok(Ok(())) => {
                trace!(%effect, player = %ctx.player, event = ?ctx.event, "effect ran");
                RunOutcome::Completed
            }
            Ok(Err(fault)) => {
                error!(%effect, player = %ctx.player, event = ?ctx.event, %fault, "effect handler error");
                ctx.rollback_to(mark);
                RunOutcome::Faulted(fault)
            }
            Err(_) => {
                error!(%effect, player = %ctx.player, event = ?ctx.event, "effect handler panicked");
                ctx.rollback_to(mark);
                RunOutcome::Panicked
            }
        }
    }
}

impl std::fmt::Debug for SkillDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.handlers.keys().copied().collect();
        ids.sort();
        f.debug_struct("SkillDispatcher")
            .field("handlers", &ids)
            .field("auras", &self.auras)
            .finish()
    }
}
